//! Expresiones.
//!
//! Los operadores binarios se resuelven por escalado de precedencia
//! ("precedence climbing"): cada nivel de recursión solo acepta
//! operadores con al menos cierta precedencia mínima, y el operando
//! derecho se analiza con la precedencia del operador más uno, lo cual
//! hace que operadores de igual precedencia asocien por la izquierda.

use super::{Expr, Literal, Parse, Parser, ParserError, UnaryOp};
use crate::{
    lex::{BinOp, Token, TokenKind, WordType},
    source::{Located, Location},
};

impl Parser<'_> {
    pub(super) fn expr(&mut self) -> Parse<Located<Expr>> {
        self.binary(1)
    }

    fn binary(&mut self, min_precedence: u32) -> Parse<Located<Expr>> {
        let mut result = self.atom()?;

        while let Token::Op(op) = self.peek() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }

            self.next();
            let rhs = self.binary(precedence + 1)?;

            let location = Location::span(*result.location(), rhs.location());
            result = Located::at(Expr::Binary(Box::new(result), *op, Box::new(rhs)), location);
        }

        Ok(result)
    }

    fn atom(&mut self) -> Parse<Located<Expr>> {
        let start = self.here();
        let expr = match self.peek() {
            Token::Integer { value, .. } => {
                self.next();
                Expr::int(*value)
            }

            Token::Name(name) => {
                self.next();
                Expr::Constant(Literal::Name(name.clone()))
            }

            Token::Str(bytes) => {
                self.next();
                Expr::Constant(Literal::Str(bytes.clone()))
            }

            Token::OpenParen => {
                let inner = self.nested(|s| {
                    s.next();
                    let inner = s.expr()?;
                    s.expect(TokenKind::CloseParen)?;

                    Ok(inner)
                })?;

                inner.into_inner()
            }

            // `-` es el único operador unario
            Token::Op(BinOp::Sub) => self.nested(|s| {
                s.next();
                let inner = s.atom()?;

                Ok(Expr::Unary(UnaryOp::Negate, Box::new(inner)))
            })?,

            Token::Type(of) => self.nested(|s| {
                s.next();
                s.typed(*of)
            })?,

            found => return self.fail(ParserError::ExpectedExpr(found.clone())),
        };

        Ok(self.located(start, expr))
    }

    /// Lectura de memoria o conversión, después de un tipo.
    fn typed(&mut self, of: WordType) -> Parse<Expr> {
        match self.peek() {
            Token::OpenSquare => {
                self.next();
                let address = Box::new(self.expr()?);
                self.expect(TokenKind::CloseSquare)?;

                Ok(Expr::MemRead { of, address })
            }

            Token::OpenParen => {
                self.next();
                let inner = Box::new(self.expr()?);
                self.expect(TokenKind::CloseParen)?;

                Ok(Expr::UnsignedCast { of, inner })
            }

            Token::Signed => {
                self.next();
                self.expect(TokenKind::OpenParen)?;
                let inner = Box::new(self.expr()?);
                self.expect(TokenKind::CloseParen)?;

                Ok(Expr::SignedCast { of, inner })
            }

            found => self.fail(ParserError::ExpectedTypeSuffix(of, found.clone())),
        }
    }
}
