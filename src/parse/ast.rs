//! Árbol sintáctico de Solar IR.
//!
//! El árbol es estrictamente jerárquico: cada nodo es dueño exclusivo
//! de sus hijos y no existen referencias hacia nodos padre. Una vez
//! construido, el front end no vuelve a modificarlo.

use crate::{
    lex::{Alignment, BinOp, Identifier, RelOp, WordType},
    source::Located,
};

/// Raíz del árbol: un programa completo.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Program {
    /// Directivas `data { ... }` de nivel superior, en orden.
    pub data: Vec<DataDirective>,

    /// Declaraciones `const nombre = expr;`, en orden.
    pub constants: Vec<Constant>,

    /// Nombres importados con `import`.
    pub imports: Vec<Located<Identifier>>,

    /// Nombres exportados con `export` o `export weak`.
    pub exports: Vec<Export>,

    /// Declaraciones de función, en orden.
    pub functions: Vec<Function>,
}

/// Declaración `const`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: Located<Identifier>,
    pub value: Located<Expr>,
}

/// Un símbolo exportado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub name: Located<Identifier>,

    /// El símbolo puede quedar sin resolver al enlazar.
    pub weak: bool,
}

/// Bloque `data { ... }`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DataDirective {
    pub data: Vec<Located<Datum>>,
}

/// Una entrada de una directiva de datos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datum {
    /// `nombre:`
    Label(Located<Identifier>),

    /// `alignN;`
    Align(Alignment),

    /// Reserva de memoria con tipo, tamaño e inicializadores.
    ///
    /// `size` siempre está resuelto: si no se escribió, vale la
    /// cantidad de inicializadores (al menos 1). Para strings, los
    /// inicializadores incluyen el terminador nulo implícito.
    Alloc {
        of: WordType,
        label: Option<Located<Identifier>>,
        size: Located<Expr>,
        values: Vec<Located<Expr>>,
    },
}

/// Declaración de función.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Convención de llamada, `None` para la convención por defecto.
    pub convention: Option<Located<Identifier>>,
    pub returns: Option<Located<WordType>>,
    pub name: Located<Identifier>,
    pub parameters: Vec<Parameter>,
    pub static_data: Option<DataDirective>,
    pub body: Vec<Located<Statement>>,
}

/// Argumento formal de una función.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub of: Located<WordType>,
    pub name: Located<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `pass;`
    Empty,

    /// `word4 a, b;`
    Decl {
        of: WordType,
        names: Vec<Located<Identifier>>,
    },

    /// `a = expr;`
    Def {
        name: Located<Identifier>,
        value: Located<Expr>,
    },

    /// `word4[addr] = expr;`
    MemWrite {
        of: WordType,
        address: Located<Expr>,
        value: Located<Expr>,
    },

    /// `if (left relop right) { ... } else { ... }`
    If {
        left: Located<Expr>,
        relation: RelOp,
        right: Located<Expr>,
        then: Vec<Located<Statement>>,
        otherwise: Vec<Located<Statement>>,
    },

    /// `goto etiqueta;`
    Goto(Located<Identifier>),

    /// `jump f(args);`, llamada de cola sin retorno.
    Jump {
        convention: Option<Located<Identifier>>,
        target: Located<Expr>,
        args: Vec<Located<Expr>>,
    },

    /// `(tipo) registro = f(args);`
    Call {
        convention: Option<Located<Identifier>>,
        returns: Option<WordType>,
        output: Option<Located<Identifier>>,
        target: Located<Expr>,
        args: Vec<Located<Expr>>,
    },

    /// `return expr;`
    Return(Option<Located<Expr>>),

    /// `etiqueta:`
    Label(Located<Identifier>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Constant(Literal),

    /// `tipo[addr]`
    MemRead {
        of: WordType,
        address: Box<Located<Expr>>,
    },

    /// `tipo(expr)`
    UnsignedCast {
        of: WordType,
        inner: Box<Located<Expr>>,
    },

    /// `tipo$(expr)`
    SignedCast {
        of: WordType,
        inner: Box<Located<Expr>>,
    },

    Binary(Box<Located<Expr>>, BinOp, Box<Located<Expr>>),
    Unary(UnaryOp, Box<Located<Expr>>),
}

/// Constante literal o referencia a un nombre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(u64),
    Name(Identifier),
    Str(Vec<u8>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
}

impl Expr {
    /// Constante entera.
    pub fn int(value: u64) -> Self {
        Expr::Constant(Literal::Int(value))
    }

    /// Valor entero, si esta expresión es una constante entera.
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Expr::Constant(Literal::Int(value)) => Some(*value),
            _ => None,
        }
    }
}
