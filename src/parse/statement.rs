//! Sentencias dentro del cuerpo de una función.

use super::{Expr, Parse, Parser, ParserError, Statement};
use crate::{
    lex::{Identifier, Keyword, RelOp, Token, TokenKind},
    source::Located,
};

impl Parser<'_> {
    pub(super) fn statement(&mut self) -> Parse<Located<Statement>> {
        let start = self.here();
        let statement = match self.peek() {
            Token::Keyword(Keyword::Pass) => {
                self.next();
                self.expect(TokenKind::Semicolon)?;

                Statement::Empty
            }

            Token::Keyword(Keyword::Goto) => {
                self.next();
                let label = self.id()?;
                self.expect(TokenKind::Semicolon)?;

                Statement::Goto(label)
            }

            Token::Keyword(Keyword::Return) => {
                self.next();
                let value = match self.peek() {
                    Token::Semicolon => None,
                    _ => Some(self.expr()?),
                };

                self.expect(TokenKind::Semicolon)?;
                Statement::Return(value)
            }

            Token::Keyword(Keyword::If) => self.if_statement()?,
            Token::Keyword(Keyword::Jump) => self.jump(None)?,

            Token::Keyword(Keyword::Foreign) => {
                let convention = self.convention()?;
                match self.peek() {
                    Token::OpenParen => self.call(convention)?,
                    Token::Keyword(Keyword::Jump) => self.jump(convention)?,

                    found => return self.fail(ParserError::ExpectedCallOrJump(found.clone())),
                }
            }

            Token::OpenParen => self.call(None)?,

            Token::Name(name) => match self.peek_nth(1) {
                Token::Colon => {
                    let label = self.id()?;
                    self.next();

                    Statement::Label(label)
                }

                Token::Assign => {
                    let name = self.id()?;
                    self.next();

                    let value = self.expr()?;
                    self.expect(TokenKind::Semicolon)?;

                    Statement::Def { name, value }
                }

                _ => {
                    self.next();
                    let found = self.peek().clone();

                    return self.fail(ParserError::ExpectedLabelOrAssign(name.clone(), found));
                }
            },

            Token::Type(of) => {
                self.next();
                match self.peek() {
                    Token::OpenSquare => {
                        self.next();
                        let address = self.expr()?;
                        self.expect(TokenKind::CloseSquare)?;

                        self.expect(TokenKind::Assign)?;
                        let value = self.expr()?;
                        self.expect(TokenKind::Semicolon)?;

                        Statement::MemWrite {
                            of: *of,
                            address,
                            value,
                        }
                    }

                    Token::Name(_) => {
                        let names = self.name_list()?;
                        self.expect(TokenKind::Semicolon)?;

                        Statement::Decl { of: *of, names }
                    }

                    found => {
                        return self.fail(ParserError::ExpectedWriteOrDecl(*of, found.clone()))
                    }
                }
            }

            found => return self.fail(ParserError::ExpectedStatement(found.clone())),
        };

        Ok(self.located(start, statement))
    }

    /// `if (izq [relop der]) { ... } [else { ... }]`
    ///
    /// Sin operador relacional, la condición es `izq != 0`.
    fn if_statement(&mut self) -> Parse<Statement> {
        self.keyword(Keyword::If)?;
        self.expect(TokenKind::OpenParen)?;

        let left = self.expr()?;
        let (relation, right) = match self.peek() {
            Token::RelOp(relation) => {
                self.next();
                (*relation, self.expr()?)
            }

            Token::CloseParen => (RelOp::NotEqual, Located::at(Expr::int(0), *left.location())),

            found => {
                let error = ParserError::UnexpectedToken(TokenKind::RelOp, found.clone());
                return self.fail(error);
            }
        };

        self.expect(TokenKind::CloseParen)?;
        let then = self.block()?;

        let otherwise = if self.accept_keyword(Keyword::Else) {
            self.block()?
        } else {
            Vec::new()
        };

        Ok(Statement::If {
            left,
            relation,
            right,
            then,
            otherwise,
        })
    }

    /// `jump destino(args);`, después de una convención opcional.
    fn jump(&mut self, convention: Option<Located<Identifier>>) -> Parse<Statement> {
        self.keyword(Keyword::Jump)?;

        let target = self.expr()?;
        let args = self.arguments()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Statement::Jump {
            convention,
            target,
            args,
        })
    }

    /// `(tipo?) [registro =] destino(args);`, después de una convención opcional.
    fn call(&mut self, convention: Option<Located<Identifier>>) -> Parse<Statement> {
        self.expect(TokenKind::OpenParen)?;
        let returns = self.optional_type().map(Located::into_inner);
        self.expect(TokenKind::CloseParen)?;

        // Se requiere mirar un token más allá del nombre
        let output = match self.peek_nth(1) {
            Token::Assign => {
                let output = self.id()?;
                self.next();

                Some(output)
            }

            _ => None,
        };

        let target = self.expr()?;
        let args = self.arguments()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Statement::Call {
            convention,
            returns,
            output,
            target,
            args,
        })
    }

    fn arguments(&mut self) -> Parse<Vec<Located<Expr>>> {
        self.expect(TokenKind::OpenParen)?;
        if self.accept(TokenKind::CloseParen) {
            return Ok(Vec::new());
        }

        let args = self.comma_separated(Parser::expr)?;
        self.expect(TokenKind::CloseParen)?;

        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{
        tests::{error, program},
        Literal,
    };
    use super::*;
    use crate::lex::{BinOp, WordType};

    fn body(text: &str) -> Vec<Statement> {
        let source = format!("() f() {{ {} }}", text);
        let mut program = program(&source);
        let function = program.functions.pop().expect("no function");

        function.body.into_iter().map(Located::into_inner).collect()
    }

    fn name(expr: &Located<Expr>) -> &str {
        match expr.val() {
            Expr::Constant(Literal::Name(name)) => name.as_ref(),
            other => panic!("not a name: {:?}", other),
        }
    }

    #[test]
    fn simple_statements() {
        let body = body("pass; loop: goto loop; return; return x + 1; a = 3;");

        assert_eq!(body[0], Statement::Empty);
        assert!(matches!(&body[1], Statement::Label(label) if label.val().as_ref() == "loop"));
        assert!(matches!(&body[2], Statement::Goto(label) if label.val().as_ref() == "loop"));
        assert_eq!(body[3], Statement::Return(None));
        assert!(matches!(
            &body[4],
            Statement::Return(Some(value)) if matches!(value.val(), Expr::Binary(_, BinOp::Add, _))
        ));
        assert!(matches!(
            &body[5],
            Statement::Def { name, value } if name.val().as_ref() == "a" && value.val().as_int() == Some(3)
        ));
    }

    #[test]
    fn declarations_and_memory_writes() {
        let body = body("word4 a, b, c; ptr p; word2[p + 2] = a;");

        match &body[0] {
            Statement::Decl { of, names } => {
                assert_eq!(*of, WordType::Word4);
                let names: Vec<_> = names.iter().map(|name| name.val().to_string()).collect();
                assert_eq!(names, ["a", "b", "c"]);
            }

            other => panic!("not a declaration: {:?}", other),
        }

        assert!(matches!(&body[1], Statement::Decl { of: WordType::Ptr, names } if names.len() == 1));

        match &body[2] {
            Statement::MemWrite { of, address, value } => {
                assert_eq!(*of, WordType::Word2);
                assert!(matches!(address.val(), Expr::Binary(_, BinOp::Add, _)));
                assert_eq!(name(value), "a");
            }

            other => panic!("not a memory write: {:?}", other),
        }
    }

    #[test]
    fn calls() {
        let body = body("(word4) r = f(1, 2); () g(); (ptr) h(); foreign cdecl () puts(msg);");

        match &body[0] {
            Statement::Call {
                convention: None,
                returns: Some(WordType::Word4),
                output: Some(output),
                target,
                args,
            } => {
                assert_eq!(output.val().as_ref(), "r");
                assert_eq!(name(target), "f");
                assert_eq!(args.len(), 2);
            }

            other => panic!("unexpected call: {:?}", other),
        }

        assert!(matches!(
            &body[1],
            Statement::Call { returns: None, output: None, args, .. } if args.is_empty()
        ));

        assert!(matches!(
            &body[2],
            Statement::Call { returns: Some(WordType::Ptr), output: None, .. }
        ));

        match &body[3] {
            Statement::Call {
                convention: Some(convention),
                target,
                args,
                ..
            } => {
                assert_eq!(convention.val().as_ref(), "cdecl");
                assert_eq!(name(target), "puts");
                assert_eq!(args.len(), 1);
            }

            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[test]
    fn jumps() {
        let body = body("jump next(a); foreign sysv jump ptr[table + 8]();");

        assert!(matches!(
            &body[0],
            Statement::Jump { convention: None, target, args } if name(target) == "next" && args.len() == 1
        ));

        match &body[1] {
            Statement::Jump {
                convention: Some(convention),
                target,
                args,
            } => {
                assert_eq!(convention.val().as_ref(), "sysv");
                assert!(matches!(target.val(), Expr::MemRead { of: WordType::Ptr, .. }));
                assert!(args.is_empty());
            }

            other => panic!("unexpected jump: {:?}", other),
        }
    }

    #[test]
    fn if_else() {
        let body = body("if (a >=$ b) { pass; } else { if (c) { } }");

        match &body[0] {
            Statement::If {
                left,
                relation,
                right,
                then,
                otherwise,
            } => {
                assert_eq!(name(left), "a");
                assert_eq!(*relation, RelOp::SignedGreaterOrEqual);
                assert_eq!(name(right), "b");
                assert_eq!(then.len(), 1);
                assert_eq!(otherwise.len(), 1);
            }

            other => panic!("not an if: {:?}", other),
        }
    }

    #[test]
    fn statement_locations() {
        let program = program("() f() {\n  a = 1;\n  pass;\n}");
        let body = &program.functions[0].body;

        assert_eq!(body[0].location().start().line(), 2);
        assert_eq!(body[0].location().start().column(), 3);
        assert_eq!(body[0].location().end().column(), 9);
        assert_eq!(body[1].location().start().line(), 3);
    }

    #[test]
    fn statement_errors() {
        assert_eq!(
            error("() f() { x; }"),
            (
                ParserError::ExpectedLabelOrAssign("x".into(), Token::Semicolon),
                1,
                11
            )
        );

        assert_eq!(
            error("() f() { word4 5; }").0,
            ParserError::ExpectedWriteOrDecl(
                WordType::Word4,
                Token::Integer {
                    value: 5,
                    was_char: false
                }
            )
        );

        assert_eq!(
            error("() f() { foreign c x; }").0,
            ParserError::ExpectedCallOrJump(Token::Name("x".into()))
        );

        assert_eq!(
            error("() f() { else { } }"),
            (ParserError::ExpectedStatement(Token::Keyword(Keyword::Else)), 1, 10)
        );

        assert_eq!(
            error("() f() { if (a b) { } }").0,
            ParserError::UnexpectedToken(TokenKind::RelOp, Token::Name("b".into()))
        );

        assert_eq!(
            error("() f() { (word4) = f(); }").0,
            ParserError::ExpectedExpr(Token::Assign)
        );
    }
}
