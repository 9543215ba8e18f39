//! Análisis sintáctico.
//!
//! # Gramática
//! Esta fase consume el flujo de tokens producido por [`crate::lex`]
//! por medio de descenso recursivo y construye un [`Program`]. Las
//! expresiones se analizan por escalado de precedencia, ver
//! [`BinOp::precedence`](crate::lex::BinOp::precedence).
//!
//! El parser nunca retrocede. Basta con observar el token actual y,
//! en dos casos, el siguiente:
//! - Un nombre al inicio de una sentencia es una etiqueta si le sigue
//!   `:` y una asignación si le sigue `=`.
//! - En `(tipo) r = f(...)`, el `=` posterior al nombre distingue una
//!   llamada con registro de retorno de una llamada sin él.
//!
//! # Errores
//! No hay recuperación: la primera violación de la gramática termina el
//! análisis. Los errores se ubican en el token que los provocó.

use thiserror::Error;

use crate::{
    lex::{Identifier, Keyword, Token, TokenKind, WordType},
    source::{Located, Location},
};

mod data;
mod expr;
mod statement;

pub mod ast;

pub use ast::*;

/// Profundidad máxima de anidamiento de expresiones y bloques.
pub const MAX_NESTING: u32 = 128;

/// Error de análisis sintáctico.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("Expected {0}, found {1} instead")]
    UnexpectedToken(TokenKind, Token),

    #[error("Expected keyword `{0}`, found {1} instead")]
    ExpectedKeyword(Keyword, Token),

    #[error("Got unexpected keyword `{0}` at top level")]
    UnexpectedTopLevel(Keyword),

    #[error("Expected a statement, found {0} instead")]
    ExpectedStatement(Token),

    #[error("Expected `:` or `=` after name `{0}`, found {1} instead")]
    ExpectedLabelOrAssign(Identifier, Token),

    #[error("Expected `[` or a name after type `{0}`, found {1} instead")]
    ExpectedWriteOrDecl(WordType, Token),

    #[error("Expected `(` or `jump` after calling convention, found {0} instead")]
    ExpectedCallOrJump(Token),

    #[error("Expected an expression, found {0} instead")]
    ExpectedExpr(Token),

    #[error("Expected `[`, `(` or `$` after type `{0}` in expression, found {1} instead")]
    ExpectedTypeSuffix(WordType, Token),

    #[error("Expected a label, alignment directive or typed allocation, found {0} instead")]
    ExpectedDatum(Token),

    #[error("String in data declaration expected type `word1`, got type `{0}`")]
    StringType(WordType),

    #[error("String in data declaration expected empty allocation size, got expression")]
    StringWithSize,

    #[error("Datum allocation size must be explicitly stated, got empty allocation")]
    MissingAllocationSize,

    #[error("Nesting too deep, the limit is {} levels", MAX_NESTING)]
    TooDeep,

    #[error("Token stream is not terminated by end of file")]
    MissingEof,
}

type Parse<T> = Result<T, Located<ParserError>>;

/// Construye el árbol sintáctico de un programa completo.
///
/// `tokens` debe terminar en [`Token::Eof`], tal como lo produce
/// [`crate::lex::lex`].
pub fn parse(tokens: &[Located<Token>]) -> Parse<Program> {
    Parser::new(tokens)?.program()
}

/// Estado del parser: un cursor sobre tokens ya escaneados.
struct Parser<'a> {
    tokens: &'a [Located<Token>],
    index: usize,
    last_known: Location,
    depth: u32,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Located<Token>]) -> Parse<Self> {
        match tokens.last() {
            Some(last) if *last.val() == Token::Eof => Ok(Parser {
                tokens,
                index: 0,
                last_known: Location::default(),
                depth: 0,
            }),

            Some(last) => Err(Located::at(ParserError::MissingEof, *last.location())),
            None => Err(Located::at(ParserError::MissingEof, Location::default())),
        }
    }

    fn program(&mut self) -> Parse<Program> {
        let mut program = Program::default();

        loop {
            match self.peek() {
                Token::Eof => break Ok(program),

                Token::Keyword(Keyword::Data) => program.data.push(self.data_directive()?),
                Token::Keyword(Keyword::Const) => program.constants.push(self.constant()?),
                Token::Keyword(Keyword::Foreign) => program.functions.push(self.function()?),

                Token::Keyword(Keyword::Import) => {
                    self.next();
                    program.imports.extend(self.name_list()?);
                    self.expect(TokenKind::Semicolon)?;
                }

                Token::Keyword(Keyword::Export) => {
                    self.next();
                    let weak = self.accept_keyword(Keyword::Weak);
                    let names = self.name_list()?;
                    self.expect(TokenKind::Semicolon)?;

                    program
                        .exports
                        .extend(names.into_iter().map(|name| Export { name, weak }));
                }

                Token::Keyword(keyword) => {
                    break self.fail(ParserError::UnexpectedTopLevel(*keyword));
                }

                _ => program.functions.push(self.function()?),
            }
        }
    }

    fn constant(&mut self) -> Parse<Constant> {
        self.keyword(Keyword::Const)?;
        let name = self.id()?;

        self.expect(TokenKind::Assign)?;
        let value = self.expr()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Constant { name, value })
    }

    fn function(&mut self) -> Parse<Function> {
        let convention = self.convention()?;

        self.expect(TokenKind::OpenParen)?;
        let returns = self.optional_type();
        self.expect(TokenKind::CloseParen)?;

        let name = self.id()?;

        self.expect(TokenKind::OpenParen)?;
        let parameters = match self.peek() {
            Token::CloseParen => Vec::new(),
            _ => self.comma_separated(Parser::parameter)?,
        };
        self.expect(TokenKind::CloseParen)?;

        let static_data = match self.peek() {
            Token::Keyword(Keyword::Data) => Some(self.data_directive()?),
            _ => None,
        };

        let body = self.block()?;

        Ok(Function {
            convention,
            returns,
            name,
            parameters,
            static_data,
            body,
        })
    }

    fn parameter(&mut self) -> Parse<Parameter> {
        let of = self.typ()?;
        let name = self.id()?;

        Ok(Parameter { of, name })
    }

    /// Prefijo opcional `foreign <convención>`.
    fn convention(&mut self) -> Parse<Option<Located<Identifier>>> {
        if self.accept_keyword(Keyword::Foreign) {
            Ok(Some(self.id()?))
        } else {
            Ok(None)
        }
    }

    fn block(&mut self) -> Parse<Vec<Located<Statement>>> {
        self.nested(|s| {
            s.expect(TokenKind::OpenCurly)?;

            let mut statements = Vec::new();
            while !s.accept(TokenKind::CloseCurly) {
                statements.push(s.statement()?);
            }

            Ok(statements)
        })
    }

    fn name_list(&mut self) -> Parse<Vec<Located<Identifier>>> {
        self.comma_separated(Parser::id)
    }

    /// Una o más ocurrencias de una regla, separadas por comas.
    fn comma_separated<T, F>(&mut self, mut rule: F) -> Parse<Vec<T>>
    where
        F: FnMut(&mut Self) -> Parse<T>,
    {
        let mut items = vec![rule(self)?];
        while self.accept(TokenKind::Comma) {
            items.push(rule(self)?);
        }

        Ok(items)
    }

    /// Aplica una regla un nivel de anidamiento más adentro.
    fn nested<T, F>(&mut self, rule: F) -> Parse<T>
    where
        F: FnOnce(&mut Self) -> Parse<T>,
    {
        if self.depth >= MAX_NESTING {
            return self.fail(ParserError::TooDeep);
        }

        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;

        result
    }

    fn id(&mut self) -> Parse<Located<Identifier>> {
        match self.peek() {
            Token::Name(name) => {
                let location = *self.next().location();
                Ok(Located::at(name.clone(), location))
            }

            found => self.fail(ParserError::UnexpectedToken(TokenKind::Name, found.clone())),
        }
    }

    fn typ(&mut self) -> Parse<Located<WordType>> {
        match self.optional_type() {
            Some(typ) => Ok(typ),
            None => {
                let found = self.peek().clone();
                self.fail(ParserError::UnexpectedToken(TokenKind::Type, found))
            }
        }
    }

    fn optional_type(&mut self) -> Option<Located<WordType>> {
        match self.peek() {
            Token::Type(typ) => {
                let location = *self.next().location();
                Some(Located::at(*typ, location))
            }

            _ => None,
        }
    }

    fn keyword(&mut self, keyword: Keyword) -> Parse<()> {
        if self.accept_keyword(keyword) {
            Ok(())
        } else {
            let found = self.peek().clone();
            self.fail(ParserError::ExpectedKeyword(keyword, found))
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Parse<()> {
        if self.accept(kind) {
            Ok(())
        } else {
            let found = self.peek().clone();
            self.fail(ParserError::UnexpectedToken(kind, found))
        }
    }

    fn accept(&mut self, kind: TokenKind) -> bool {
        let matches = self.peek().kind() == kind;
        if matches {
            self.next();
        }

        matches
    }

    fn accept_keyword(&mut self, keyword: Keyword) -> bool {
        let matches = *self.peek() == Token::Keyword(keyword);
        if matches {
            self.next();
        }

        matches
    }

    fn peek(&self) -> &'a Token {
        self.peek_nth(0)
    }

    /// Observa `n` tokens adelante sin consumir. Nunca pasa de `Eof`.
    fn peek_nth(&self, n: usize) -> &'a Token {
        let tokens = self.tokens;
        let index = (self.index + n).min(tokens.len() - 1);
        tokens[index].val()
    }

    /// Consume el token actual. `Eof` nunca se consume.
    fn next(&mut self) -> &'a Located<Token> {
        let tokens = self.tokens;
        let token = &tokens[self.index];
        if self.index + 1 < tokens.len() {
            self.index += 1;
        }

        self.last_known = *token.location();
        token
    }

    /// Ubicación del token actual.
    fn here(&self) -> Location {
        *self.tokens[self.index].location()
    }

    /// Asocia a un valor el rango desde `start` hasta el último token consumido.
    fn located<T>(&self, start: Location, value: T) -> Located<T> {
        Located::at(value, Location::span(start, &self.last_known))
    }

    fn fail<T>(&self, error: ParserError) -> Parse<T> {
        Err(Located::at(error, self.here()))
    }
}
