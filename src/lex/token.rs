//! Unidades léxicas de Solar IR.
//!
//! Este módulo define qué es un token y contiene las tablas fijas de
//! palabras clave, tipos, directivas de alineamiento y puntuadores.
//! Las búsquedas en estas tablas distinguen mayúsculas de minúsculas.

use std::{
    fmt::{self, Display},
    rc::Rc,
    str::FromStr,
};

/// Un identificador.
///
/// El prefijo `@` opcional de la sintaxis fuente ya ha sido removido.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(Rc<str>);

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier(Rc::from(name))
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(&self.0)
    }
}

/// Objeto resultante del análisis léxico.
///
/// Un token contiene suficiente información para describir completamente
/// a una entidad léxica en el programa fuente. Los valores de un token
/// son independientes del texto original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Palabra clave.
    Keyword(Keyword),

    /// Identificador.
    Name(Identifier),

    /// Nombre de tipo con tamaño de palabra.
    Type(WordType),

    /// Literal entero o de carácter.
    ///
    /// `was_char` solo indica si el literal se escribió como `'a'`.
    /// No tiene efecto semántico alguno.
    Integer { value: u64, was_char: bool },

    /// Literal de string, ya con secuencias de escape resueltas y
    /// codificado como UTF-8.
    Str(Vec<u8>),

    /// Directiva de alineamiento, como `align4`.
    Align(Alignment),

    /// Operador binario o unario.
    Op(BinOp),

    /// Operador relacional.
    RelOp(RelOp),

    /// `(`
    OpenParen,

    /// `)`
    CloseParen,

    /// `{`
    OpenCurly,

    /// `}`
    CloseCurly,

    /// `[`
    OpenSquare,

    /// `]`
    CloseSquare,

    /// `;`
    Semicolon,

    /// `:`
    Colon,

    /// `,`
    Comma,

    /// `=`
    Assign,

    /// `$`, marcador de conversión con signo.
    Signed,

    /// Fin del flujo de tokens. Aparece exactamente una vez, al final.
    Eof,
}

impl Token {
    /// Obtiene la clase de este token.
    pub fn kind(&self) -> TokenKind {
        use Token::*;

        match self {
            Keyword(_) => TokenKind::Keyword,
            Name(_) => TokenKind::Name,
            Type(_) => TokenKind::Type,
            Integer { .. } => TokenKind::Integer,
            Str(_) => TokenKind::Str,
            Align(_) => TokenKind::Align,
            Op(_) => TokenKind::Op,
            RelOp(_) => TokenKind::RelOp,
            OpenParen => TokenKind::OpenParen,
            CloseParen => TokenKind::CloseParen,
            OpenCurly => TokenKind::OpenCurly,
            CloseCurly => TokenKind::CloseCurly,
            OpenSquare => TokenKind::OpenSquare,
            CloseSquare => TokenKind::CloseSquare,
            Semicolon => TokenKind::Semicolon,
            Colon => TokenKind::Colon,
            Comma => TokenKind::Comma,
            Assign => TokenKind::Assign,
            Signed => TokenKind::Signed,
            Eof => TokenKind::Eof,
        }
    }

    /// Resuelve la grafía exacta de un puntuador.
    pub fn punctuator(spelling: &str) -> Option<Token> {
        use Token::*;

        let token = match spelling {
            "(" => OpenParen,
            ")" => CloseParen,
            "{" => OpenCurly,
            "}" => CloseCurly,
            "[" => OpenSquare,
            "]" => CloseSquare,
            ";" => Semicolon,
            ":" => Colon,
            "," => Comma,
            "=" => Assign,
            "$" => Signed,

            _ => match (spelling.parse(), spelling.parse()) {
                (Ok(op), _) => Op(op),
                (_, Ok(relop)) => RelOp(relop),
                _ => return None,
            },
        };

        Some(token)
    }
}

impl Display for Token {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Token::*;

        match self {
            Keyword(keyword) => write!(fmt, "keyword `{}`", keyword),
            Name(name) => write!(fmt, "name `{}`", name),
            Type(typ) => write!(fmt, "type `{}`", typ),
            Integer {
                value,
                was_char: true,
            } => match char::from_u32(*value as u32) {
                Some(c) => write!(fmt, "character {:?}", c),
                None => write!(fmt, "character literal `{}`", value),
            },
            Integer { value, .. } => write!(fmt, "integer `{}`", value),
            Str(bytes) => write!(fmt, "string {:?}", String::from_utf8_lossy(bytes)),
            Align(align) => write!(fmt, "alignment `{}`", align),
            Op(op) => write!(fmt, "operator `{}`", op),
            RelOp(relop) => write!(fmt, "relational operator `{}`", relop),
            Eof => fmt.write_str("end of file"),

            OpenParen | CloseParen | OpenCurly | CloseCurly | OpenSquare | CloseSquare
            | Semicolon | Colon | Comma | Assign | Signed => self.kind().fmt(fmt),
        }
    }
}

/// Clase de un token, sin su valor.
///
/// Se utiliza para describir qué se esperaba en un error sintáctico.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Name,
    Type,
    Integer,
    Str,
    Align,
    Op,
    RelOp,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenSquare,
    CloseSquare,
    Semicolon,
    Colon,
    Comma,
    Assign,
    Signed,
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;

        let string = match self {
            Keyword => "keyword",
            Name => "name",
            Type => "type",
            Integer => "integer",
            Str => "string",
            Align => "alignment directive",
            Op => "operator",
            RelOp => "relational operator",
            OpenParen => "`(`",
            CloseParen => "`)`",
            OpenCurly => "`{`",
            CloseCurly => "`}`",
            OpenSquare => "`[`",
            CloseSquare => "`]`",
            Semicolon => "`;`",
            Colon => "`:`",
            Comma => "`,`",
            Assign => "`=`",
            Signed => "`$`",
            Eof => "end of file",
        };

        fmt.write_str(string)
    }
}

/// Una palabra clave.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Keyword {
    Const,
    Data,
    Else,
    Export,
    Foreign,
    Goto,
    If,
    Import,
    Jump,
    Pass,
    Return,
    Weak,
}

#[rustfmt::skip]
const KEYWORDS: &[(&str, Keyword)] = &[
    ("const",   Keyword::Const),
    ("data",    Keyword::Data),
    ("else",    Keyword::Else),
    ("export",  Keyword::Export),
    ("foreign", Keyword::Foreign),
    ("goto",    Keyword::Goto),
    ("if",      Keyword::If),
    ("import",  Keyword::Import),
    ("jump",    Keyword::Jump),
    ("pass",    Keyword::Pass),
    ("return",  Keyword::Return),
    ("weak",    Keyword::Weak),
];

impl Display for Keyword {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(spelling_of(KEYWORDS, *self))
    }
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        lookup(KEYWORDS, string)
    }
}

/// Tipo con tamaño de palabra explícito.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WordType {
    Word1,
    Word2,
    Word4,
    Word8,

    /// Ancho nativo de un puntero en la plataforma objetivo.
    Ptr,
}

#[rustfmt::skip]
const TYPES: &[(&str, WordType)] = &[
    ("word1", WordType::Word1),
    ("word2", WordType::Word2),
    ("word4", WordType::Word4),
    ("word8", WordType::Word8),
    ("ptr",   WordType::Ptr),
];

impl WordType {
    /// Tamaño en bytes, excepto para [`WordType::Ptr`], el cual
    /// depende del objetivo.
    pub fn bytes(self) -> Option<u32> {
        match self {
            WordType::Word1 => Some(1),
            WordType::Word2 => Some(2),
            WordType::Word4 => Some(4),
            WordType::Word8 => Some(8),
            WordType::Ptr => None,
        }
    }
}

impl Display for WordType {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(spelling_of(TYPES, *self))
    }
}

impl FromStr for WordType {
    type Err = ();

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        lookup(TYPES, string)
    }
}

/// Frontera de alineamiento de una directiva `alignN`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Alignment {
    Align1,
    Align2,
    Align4,
    Align8,
    AlignPtr,
}

#[rustfmt::skip]
const ALIGNMENTS: &[(&str, Alignment)] = &[
    ("align1", Alignment::Align1),
    ("align2", Alignment::Align2),
    ("align4", Alignment::Align4),
    ("align8", Alignment::Align8),
    ("alignp", Alignment::AlignPtr),
];

impl Display for Alignment {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(spelling_of(ALIGNMENTS, *self))
    }
}

impl FromStr for Alignment {
    type Err = ();

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        lookup(ALIGNMENTS, string)
    }
}

/// Operador aritmético o lógico a nivel de bits.
///
/// `-` es a la vez resta binaria y el único operador unario.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    SignedDiv,
    Mod,
    SignedMod,
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
    Shl,
    Shr,
    Sar,
}

#[rustfmt::skip]
const OPERATORS: &[(&str, BinOp)] = &[
    ("+",   BinOp::Add),
    ("-",   BinOp::Sub),
    ("*",   BinOp::Mul),
    ("/",   BinOp::Div),
    ("/$",  BinOp::SignedDiv),
    ("%",   BinOp::Mod),
    ("%$",  BinOp::SignedMod),
    ("&",   BinOp::And),
    ("|",   BinOp::Or),
    ("^",   BinOp::Xor),
    ("~&",  BinOp::Nand),
    ("~|",  BinOp::Nor),
    ("~^",  BinOp::Xnor),
    ("<<",  BinOp::Shl),
    (">>",  BinOp::Shr),
    (">>$", BinOp::Sar),
];

impl BinOp {
    /// Precedencia como operador binario; mayor significa que liga
    /// con más fuerza. Todos asocian por la izquierda.
    pub fn precedence(self) -> u32 {
        use BinOp::*;

        match self {
            Or | Nor => 1,
            Xor | Xnor => 2,
            And | Nand => 3,
            Shl | Shr | Sar => 4,
            Add | Sub => 5,
            Mul | Div | SignedDiv | Mod | SignedMod => 6,
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(spelling_of(OPERATORS, *self))
    }
}

impl FromStr for BinOp {
    type Err = ();

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        lookup(OPERATORS, string)
    }
}

/// Operador relacional. Las variantes `Signed*` comparan con signo.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RelOp {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    SignedGreater,
    SignedLess,
    SignedGreaterOrEqual,
    SignedLessOrEqual,
}

#[rustfmt::skip]
const RELATIONS: &[(&str, RelOp)] = &[
    ("==",  RelOp::Equal),
    ("!=",  RelOp::NotEqual),
    (">",   RelOp::Greater),
    ("<",   RelOp::Less),
    (">=",  RelOp::GreaterOrEqual),
    ("<=",  RelOp::LessOrEqual),
    (">$",  RelOp::SignedGreater),
    ("<$",  RelOp::SignedLess),
    (">=$", RelOp::SignedGreaterOrEqual),
    ("<=$", RelOp::SignedLessOrEqual),
];

impl Display for RelOp {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(spelling_of(RELATIONS, *self))
    }
}

impl FromStr for RelOp {
    type Err = ();

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        lookup(RELATIONS, string)
    }
}

/// Grafías de todos los puntuadores registrados.
///
/// Ninguna grafía se repite, por lo cual la coincidencia más larga
/// siempre es única.
#[rustfmt::skip]
pub const PUNCTUATORS: &[&str] = &[
    "+", "-", "*", "/", "/$", "%", "%$",
    "&", "|", "^", "~&", "~|", "~^",
    "<<", ">>", ">>$",
    "==", "!=", ">", "<", ">=", "<=", ">$", "<$", ">=$", "<=$",
    "(", ")", "{", "}", "[", "]", ";", ":", ",", "=", "$",
];

/// Caracteres que pueden iniciar un puntuador.
///
/// Algunos de ellos no inician ninguna grafía por sí solos, lo cual
/// se reporta como un puntuador inválido en vez de un carácter
/// desconocido.
pub const PUNCTUATOR_CHARS: &str = "(){}[];:,=!<>+-*/%&|^~#?$";

fn lookup<T: Copy>(table: &[(&str, T)], string: &str) -> Result<T, ()> {
    table
        .iter()
        .find(|&&(name, _)| name == string)
        .map(|&(_, value)| value)
        .ok_or(())
}

fn spelling_of<T: Copy + PartialEq>(table: &[(&'static str, T)], value: T) -> &'static str {
    table
        .iter()
        .find(|&&(_, candidate)| candidate == value)
        .map(|&(name, _)| name)
        .unwrap_or("?")
}
