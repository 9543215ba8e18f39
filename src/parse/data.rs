//! Directivas de datos.
//!
//! Una directiva `data { ... }` contiene etiquetas, directivas de
//! alineamiento y reservas de memoria con tipo:
//!
//! ```text
//! data {
//!     table: word4 { 1, 2, 3 };
//!     alignp;
//!     word1 greeting "hello";
//!     word8[16];
//! }
//! ```
//!
//! El tamaño de una reserva siempre queda resuelto al terminar el análisis.

use std::iter;

use super::{DataDirective, Datum, Expr, Parse, Parser, ParserError};
use crate::{
    lex::{Keyword, Token, TokenKind, WordType},
    source::Located,
};

impl Parser<'_> {
    pub(super) fn data_directive(&mut self) -> Parse<DataDirective> {
        self.keyword(Keyword::Data)?;
        self.expect(TokenKind::OpenCurly)?;

        let mut data = Vec::new();
        while !self.accept(TokenKind::CloseCurly) {
            data.push(self.datum()?);
        }

        Ok(DataDirective { data })
    }

    fn datum(&mut self) -> Parse<Located<Datum>> {
        let start = self.here();
        let datum = match self.peek() {
            Token::Name(_) => {
                let label = self.id()?;
                self.expect(TokenKind::Colon)?;

                Datum::Label(label)
            }

            Token::Align(align) => {
                self.next();
                self.expect(TokenKind::Semicolon)?;

                Datum::Align(*align)
            }

            Token::Type(_) => self.allocation()?,

            found => return self.fail(ParserError::ExpectedDatum(found.clone())),
        };

        Ok(self.located(start, datum))
    }

    /// `tipo nombre? ([tamaño?])? ("string" | { valores })? ;`
    fn allocation(&mut self) -> Parse<Datum> {
        let of = self.typ()?;
        let label = match self.peek() {
            Token::Name(_) => Some(self.id()?),
            _ => None,
        };

        // `[]` equivale a omitir el tamaño
        let size = if self.accept(TokenKind::OpenSquare) {
            let size = match self.peek() {
                Token::CloseSquare => None,
                _ => Some(self.expr()?),
            };

            self.expect(TokenKind::CloseSquare)?;
            size
        } else {
            None
        };

        let values = match self.peek() {
            Token::Str(bytes) => {
                if *of.val() != WordType::Word1 {
                    return self.fail(ParserError::StringType(*of.val()));
                } else if size.is_some() {
                    return self.fail(ParserError::StringWithSize);
                }

                let location = *self.next().location();
                let values = bytes
                    .iter()
                    .chain(iter::once(&0))
                    .map(|&byte| Located::at(Expr::int(byte as u64), location))
                    .collect();

                Some(values)
            }

            Token::OpenCurly => {
                self.next();
                let values = match self.peek() {
                    Token::CloseCurly => Vec::new(),
                    _ => self.comma_separated(Parser::expr)?,
                };

                self.expect(TokenKind::CloseCurly)?;
                Some(values)
            }

            _ => None,
        };

        let (size, values) = match (size, values) {
            (Some(size), values) => (size, values.unwrap_or_default()),

            (None, Some(values)) => {
                let count = values.len().max(1) as u64;
                (Located::at(Expr::int(count), *of.location()), values)
            }

            (None, None) => return self.fail(ParserError::MissingAllocationSize),
        };

        self.expect(TokenKind::Semicolon)?;

        Ok(Datum::Alloc {
            of: of.into_inner(),
            label,
            size,
            values,
        })
    }
}
