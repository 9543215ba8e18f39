//! Análisis léxico.
//!
//! # Tokenization
//! Esta es la primera fase del front end. Descompone el texto fuente en
//! unidades léxicas denominadas tokens. Los espacios en blanco y los
//! comentarios de bloque (`/* ... */`) se descartan durante esta operación.
//! Cada token emitido está asociado a una ubicación en el código fuente
//! original, lo cual permite rastrear errores tanto en los mismos como en
//! constructos más elevados de fases posteriores.
//!
//! # Contenido de un token
//! Los operadores, la puntuación y las palabras clave se identifican por
//! lo que son y no incluyen lexemas. Los identificadores sí incluyen su
//! lexema original, excepto por un `@` inicial, el cual solo sirve para
//! escribir nombres que de otra forma serían palabras clave (`@data`).
//! Las constantes literales se resuelven a sus valores: enteros en bases
//! 2, 8, 10 y 16, caracteres como `'a'` y strings como secuencias de bytes.
//!
//! # Puntuadores
//! Varios puntuadores comparten prefijos (`>`, `>=`, `>=$`). Siempre gana
//! la coincidencia más larga.
//!
//! # Errores
//! El lexer no se recupera de errores. El primer error termina el
//! análisis y ningún token adicional es emitido.

use crate::source::{Located, Location, Position};
use std::str::Chars;

use thiserror::Error;

mod token;


pub use token::*;

/// Error de escaneo.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    /// Carácter que no puede iniciar ningún token.
    #[error("Unknown token start symbol {0:?}")]
    BadChar(char),

    /// Carácter de puntuación que no inicia ningún puntuador registrado.
    #[error("Invalid punctuator {0:?}")]
    BadPunctuator(String),

    /// Prefijo de base desconocido, como `0z`.
    #[error("Invalid base prefix `0{0}`, expected one of `0b`, `0o` or `0x`")]
    BadBasePrefix(char),

    /// Un prefijo de base no fue seguido por dígitos.
    #[error("Expected base-{0} digits after base prefix")]
    MissingDigits(u32),

    /// Una constante entera termina inmediatamente en una letra.
    #[error("Integer cannot be followed by alphabetic character {0:?}")]
    AlphaAfterInteger(char),

    /// Una constante entera se encuentra fuera de rango.
    #[error("Integer literal overflow, valid range is [0, {}]", u64::MAX)]
    IntOverflow,

    /// Comentario de bloque sin `*/`.
    #[error("Comment unclosed at end of file")]
    UnterminatedComment,

    /// String sin comilla doble de cierre.
    #[error("Expected closing double quote while parsing string")]
    UnterminatedString,

    /// Carácter sin comilla simple de cierre.
    #[error("Expected closing single quote while parsing character")]
    UnterminatedChar,
}

type Lex<T> = Result<T, Located<LexerError>>;

/// Analiza un texto completo.
///
/// El resultado siempre termina con exactamente un [`Token::Eof`].
pub fn lex(text: &str) -> Lex<Vec<Located<Token>>> {
    Lexer::new(text).try_exhaustive()
}

/// Cursor sobre el texto fuente.
///
/// Mantiene la posición línea-columna del siguiente carácter. Los
/// saltos de línea reinician la columna; cualquier otro carácter,
/// incluyendo tabuladores, avanza exactamente una columna.
#[derive(Clone)]
struct Cursor<'a> {
    rest: Chars<'a>,
    position: Position,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor {
            rest: text.chars(),
            position: Position::default(),
        }
    }

    fn position(&self) -> Position {
        self.position
    }

    fn peek(&self) -> Option<char> {
        self.rest.clone().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest.clone().nth(1)
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest.as_str().starts_with(prefix)
    }

    /// Consume un carácter.
    fn bump(&mut self) -> Option<char> {
        let c = self.rest.next()?;
        self.position = match c {
            '\n' => self.position.newline(),
            _ => self.position.advance(),
        };

        Some(c)
    }

    /// Consume una cantidad de caracteres.
    fn skip(&mut self, count: usize) {
        for _ in 0..count {
            self.bump();
        }
    }
}

/// Escáner de un solo paso sobre el texto fuente.
///
/// El lexer es también un iterador. Tras emitir [`Token::Eof`] o el
/// primer error, el iterador termina.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Crea un lexer en estado inicial a partir de un texto.
    pub fn new(text: &'a str) -> Self {
        Lexer {
            cursor: Cursor::new(text),
            done: false,
        }
    }

    /// Reduce la entrada a una secuencia completa de tokens o al
    /// primer error encontrado.
    pub fn try_exhaustive(self) -> Lex<Vec<Located<Token>>> {
        self.collect()
    }

    /// Intenta construir un siguiente token.
    fn lex(&mut self) -> Lex<Located<Token>> {
        self.skip_trivia()?;

        let start = self.cursor.position();
        let token = match self.cursor.peek() {
            None => Token::Eof,

            Some(c) if c.is_ascii_digit() => self.integer()?,
            Some('\'') => self.character()?,
            Some('"') => self.string()?,
            Some(c) if is_word_start(c) => self.word(),
            Some(c) if PUNCTUATOR_CHARS.contains(c) => self.punctuator()?,

            Some(c) => return Err(Located::at(LexerError::BadChar(c), Location::at(start))),
        };

        let end = self.cursor.position();
        let location = match token {
            Token::Eof => Location::new(start, start),
            _ => Location::new(start, end),
        };

        Ok(Located::at(token, location))
    }

    /// Descarta espacios en blanco y comentarios de bloque.
    fn skip_trivia(&mut self) -> Lex<()> {
        loop {
            if self.cursor.starts_with("/*") {
                let opening = self.cursor.position();
                self.cursor.skip(2);

                while !self.cursor.starts_with("*/") {
                    if self.cursor.bump().is_none() {
                        let location = Location::new(opening, opening.advance().advance());
                        return Err(Located::at(LexerError::UnterminatedComment, location));
                    }
                }

                self.cursor.skip(2);
            } else if self.cursor.peek().map_or(false, char::is_whitespace) {
                self.cursor.bump();
            } else {
                break Ok(());
            }
        }
    }

    /// Constante entera, con prefijo de base opcional.
    fn integer(&mut self) -> Lex<Token> {
        let start = self.cursor.position();

        let mut base = 10;
        let has_prefix = self.cursor.peek() == Some('0')
            && self.cursor.peek_second().map_or(false, char::is_alphabetic);

        if has_prefix {
            self.cursor.bump();
            let marker = self.cursor.bump().unwrap_or('0');

            base = match marker {
                'b' => 2,
                'o' => 8,
                'x' => 16,
                _ => {
                    let location = Location::new(start, self.cursor.position());
                    return Err(Located::at(LexerError::BadBasePrefix(marker), location));
                }
            };
        }

        let mut value: u64 = 0;
        let mut digits = 0;
        let mut overflow = false;

        // Los dígitos pertenecen al alfabeto fijo `0-9A-Z`, sin
        // distinguir mayúsculas, truncado según la base
        while let Some(digit) = self.cursor.peek().and_then(|c| c.to_digit(base)) {
            self.cursor.bump();
            digits += 1;

            match value
                .checked_mul(base as u64)
                .and_then(|n| n.checked_add(digit as u64))
            {
                Some(result) => value = result,
                None => overflow = true,
            }
        }

        let here = self.cursor.position();
        match self.cursor.peek() {
            Some(c) if c.is_alphabetic() => {
                let error = LexerError::AlphaAfterInteger(c);
                return Err(Located::at(error, Location::at(here)));
            }

            _ if digits == 0 => {
                let error = LexerError::MissingDigits(base);
                return Err(Located::at(error, Location::new(start, here)));
            }

            _ if overflow => {
                let error = LexerError::IntOverflow;
                return Err(Located::at(error, Location::new(start, here)));
            }

            _ => (),
        }

        Ok(Token::Integer {
            value,
            was_char: false,
        })
    }

    /// Literal de carácter, como `'a'` o `'\n'`.
    fn character(&mut self) -> Lex<Token> {
        let opening = self.cursor.position();
        let unterminated = || Located::at(LexerError::UnterminatedChar, Location::at(opening));

        self.cursor.bump();
        let c = self.escaped_char().ok_or_else(unterminated)?;

        match self.cursor.bump() {
            Some('\'') => Ok(Token::Integer {
                value: c as u64,
                was_char: true,
            }),

            _ => Err(unterminated()),
        }
    }

    /// Literal de string.
    ///
    /// Cada carácter decodificado se recodifica como UTF-8, por lo cual
    /// un solo carácter puede resultar en varios bytes.
    fn string(&mut self) -> Lex<Token> {
        let opening = self.cursor.position();
        let unterminated = || Located::at(LexerError::UnterminatedString, Location::at(opening));

        self.cursor.bump();

        let mut bytes = Vec::new();
        loop {
            match self.cursor.peek() {
                None => return Err(unterminated()),

                Some('"') => {
                    self.cursor.bump();
                    break Ok(Token::Str(bytes));
                }

                Some(_) => {
                    let c = self.escaped_char().ok_or_else(unterminated)?;

                    let mut buffer = [0; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buffer).as_bytes());
                }
            }
        }
    }

    /// Lee un carácter o una secuencia de escape.
    ///
    /// Un escape no reconocido, como `\z`, resulta en el mismo carácter
    /// que sigue a la barra (`z`) y no es un error. Retorna `None` solo
    /// al llegar al fin de la entrada.
    fn escaped_char(&mut self) -> Option<char> {
        let c = self.cursor.bump()?;
        if c != '\\' {
            return Some(c);
        }

        let escaped = match self.cursor.bump()? {
            'a' => '\x07',
            'b' => '\x08',
            'e' => '\x1b',
            'f' => '\x0c',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0b',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            other => other,
        };

        Some(escaped)
    }

    /// Término que puede ser un identificador, una palabra clave,
    /// un tipo o una directiva de alineamiento.
    fn word(&mut self) -> Token {
        let text = self.cursor.rest.as_str();

        let mut length = 0;
        while let Some(c) = self.cursor.peek() {
            if !is_word_char(c) {
                break;
            }

            length += c.len_utf8();
            self.cursor.bump();
        }

        let word = &text[..length];
        if let Ok(keyword) = word.parse() {
            Token::Keyword(keyword)
        } else if let Ok(typ) = word.parse() {
            Token::Type(typ)
        } else if let Ok(align) = word.parse() {
            Token::Align(align)
        } else {
            let name = word.strip_prefix('@').unwrap_or(word);
            Token::Name(Identifier::from(name))
        }
    }

    /// Puntuador por coincidencia más larga.
    fn punctuator(&mut self) -> Lex<Token> {
        let start = self.cursor.position();
        let text = self.cursor.rest.as_str();

        let spelling = PUNCTUATORS
            .iter()
            .filter(|spelling| text.starts_with(*spelling))
            .max_by_key(|spelling| spelling.len());

        match spelling.and_then(|spelling| Some((spelling, Token::punctuator(spelling)?))) {
            Some((spelling, token)) => {
                self.cursor.skip(spelling.chars().count());
                Ok(token)
            }

            None => {
                let context: String = text
                    .chars()
                    .take_while(|c| !c.is_whitespace())
                    .take(10)
                    .collect();

                let error = LexerError::BadPunctuator(context);

                Err(Located::at(error, Location::at(start)))
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Lex<Located<Token>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.lex();
        self.done = match &result {
            Ok(token) => *token.val() == Token::Eof,
            Err(_) => true,
        };

        Some(result)
    }
}

/// Determina si un carácter puede iniciar un término.
fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '.' | '@')
}

/// Determina si un carácter puede pertenecer a un término.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '@')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<Token> {
        lex(text)
            .expect("lexing failed")
            .into_iter()
            .map(Located::into_inner)
            .collect()
    }

    fn error(text: &str) -> (LexerError, u32, u32) {
        let error = lex(text).expect_err("lexing succeeded");
        let start = error.location().start();

        (error.into_inner(), start.line(), start.column())
    }

    fn int(value: u64) -> Token {
        Token::Integer {
            value,
            was_char: false,
        }
    }

    #[test]
    fn empty_input_is_only_eof() {
        let all = lex("").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(*all[0].val(), Token::Eof);
        assert_eq!(all[0].location().start(), Position::new(1, 1));
    }

    #[test]
    fn eof_at_final_position() {
        let all = lex("a\n  b ").unwrap();
        let eof = all.last().unwrap();

        assert_eq!(*eof.val(), Token::Eof);
        assert_eq!(eof.location().start(), Position::new(2, 5));
    }

    #[test]
    fn integer_bases() {
        assert_eq!(
            tokens("0 42 0b1011 0o17 0x1F 0xff 007"),
            vec![int(0), int(42), int(11), int(15), int(31), int(255), int(7), Token::Eof]
        );
    }

    #[test]
    fn integer_limits() {
        assert_eq!(tokens("18446744073709551615")[0], int(u64::MAX));
        assert_eq!(error("18446744073709551616").0, LexerError::IntOverflow);
    }

    #[test]
    fn bad_integers() {
        assert_eq!(error("0z12"), (LexerError::BadBasePrefix('z'), 1, 1));
        assert_eq!(error("0X12").0, LexerError::BadBasePrefix('X'));
        assert_eq!(error("  12ab"), (LexerError::AlphaAfterInteger('a'), 1, 5));
        assert_eq!(error("0xfg"), (LexerError::AlphaAfterInteger('g'), 1, 4));
        assert_eq!(error("0b1a").0, LexerError::AlphaAfterInteger('a'));
        assert_eq!(error("0x;").0, LexerError::MissingDigits(16));
        assert_eq!(error("0b3"), (LexerError::MissingDigits(2), 1, 1));
        assert_eq!(error("0o8").0, LexerError::MissingDigits(8));
    }

    #[test]
    fn digit_outside_base_splits_without_letter() {
        // Un dígito fuera de la base sin letra siguiente termina el literal
        assert_eq!(tokens("0b102"), vec![int(2), int(2), Token::Eof]);
    }

    #[test]
    fn characters() {
        assert_eq!(
            tokens(r"'a' '\n' '\z' '\''"),
            vec![
                Token::Integer { value: 97, was_char: true },
                Token::Integer { value: 10, was_char: true },
                Token::Integer { value: 122, was_char: true },
                Token::Integer { value: 39, was_char: true },
                Token::Eof,
            ]
        );
    }

    #[test]
    fn escape_table() {
        let all = tokens(r#""\a\b\e\f\n\r\t\v\\\'\"\0""#);
        assert_eq!(
            all[0],
            Token::Str(vec![0x07, 0x08, 0x1b, 0x0c, 0x0a, 0x0d, 0x09, 0x0b, b'\\', b'\'', b'"', 0])
        );
    }

    #[test]
    fn unknown_escape_passes_through() {
        // Comportamiento permisivo intencional: `\z` es simplemente `z`
        assert_eq!(tokens(r#""\z\q""#)[0], Token::Str(b"zq".to_vec()));
    }

    #[test]
    fn strings_are_utf8_bytes() {
        assert_eq!(tokens("\"ñ€\"")[0], Token::Str("ñ€".as_bytes().to_vec()));
        assert_eq!(tokens("\"\"")[0], Token::Str(Vec::new()));
    }

    #[test]
    fn unterminated_literals_report_opening() {
        assert_eq!(error("x = \"abc"), (LexerError::UnterminatedString, 1, 5));
        assert_eq!(error("\n  \"abc\\\""), (LexerError::UnterminatedString, 2, 3));
        assert_eq!(error("  'a"), (LexerError::UnterminatedChar, 1, 3));
        assert_eq!(error("'ab'"), (LexerError::UnterminatedChar, 1, 1));
        assert_eq!(error("'"), (LexerError::UnterminatedChar, 1, 1));
        assert_eq!(error("a\n /* x\n\n"), (LexerError::UnterminatedComment, 2, 2));
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            tokens("a /* one\n two */ b/**/c"),
            vec![
                Token::Name("a".into()),
                Token::Name("b".into()),
                Token::Name("c".into()),
                Token::Eof,
            ]
        );

        assert_eq!(error("/*/").0, LexerError::UnterminatedComment);
    }

    #[test]
    fn positions_track_lines() {
        let all = lex("a\n  /* x\n */ b\n\"s\ns\" c").unwrap();
        let starts: Vec<_> = all
            .iter()
            .map(|token| (token.location().start().line(), token.location().start().column()))
            .collect();

        assert_eq!(starts, vec![(1, 1), (3, 5), (4, 1), (5, 4), (5, 5)]);
    }

    #[test]
    fn words() {
        assert_eq!(
            tokens("data word4 alignp foo_1 .L0 @data @x a@b"),
            vec![
                Token::Keyword(Keyword::Data),
                Token::Type(WordType::Word4),
                Token::Align(Alignment::AlignPtr),
                Token::Name("foo_1".into()),
                Token::Name(".L0".into()),
                Token::Name("data".into()),
                Token::Name("x".into()),
                Token::Name("a@b".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(tokens("Data")[0], Token::Name("Data".into()));
    }

    #[test]
    fn longest_punctuator_wins() {
        assert_eq!(
            tokens("a>=$b >= > >>$ >> << <=$ $ /$ ~^"),
            vec![
                Token::Name("a".into()),
                Token::RelOp(RelOp::SignedGreaterOrEqual),
                Token::Name("b".into()),
                Token::RelOp(RelOp::GreaterOrEqual),
                Token::RelOp(RelOp::Greater),
                Token::Op(BinOp::Sar),
                Token::Op(BinOp::Shr),
                Token::Op(BinOp::Shl),
                Token::RelOp(RelOp::SignedLessOrEqual),
                Token::Signed,
                Token::Op(BinOp::SignedDiv),
                Token::Op(BinOp::Xnor),
                Token::Eof,
            ]
        );

        assert_eq!(tokens("==")[0], Token::RelOp(RelOp::Equal));
        assert_eq!(tokens("= =")[0], Token::Assign);
    }

    #[test]
    fn bad_symbols() {
        assert_eq!(error("a ~ b"), (LexerError::BadPunctuator("~".into()), 1, 3));
        assert_eq!(error("#x").0, LexerError::BadPunctuator("#x".into()));
        assert_eq!(error("\n `"), (LexerError::BadChar('`'), 2, 2));
    }

    #[test]
    fn iteration_stops_after_error() {
        let mut lexer = Lexer::new("a ` b");
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }
}
