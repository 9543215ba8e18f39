use std::rc::Rc;

use sirc::{
    frontend,
    lex::{self, Alignment, LexerError, Token, WordType},
    parse::{self, Datum, Statement},
    source::Source,
};

fn source(text: &str) -> Rc<Source> {
    Rc::new(Source::new("test.sir", text))
}

const FACTORIAL: &str = "\
/* Factorial recursivo */
import printf;
export main;

const ONE = 1;

data {
    fmt: word1 \"%d\\n\";
    alignp;
    table: word4 { 1, 2, 6, 24 };
}

(word8) fact(word8 n) {
    word8 r;
    if (n <= ONE) {
        return ONE;
    }

    (word8) r = fact(n - 1);
    return n * r;
}

(word4) main() data { scratch: word8[4]; } {
    ptr p;
    p = scratch;
    word8[p] = 10;
    (word8) r = fact(word8[p]);
    foreign cdecl () printf(fmt, r);
    return 0;
}
";

#[test]
fn complete_program() {
    let program = frontend(&source(FACTORIAL)).expect("front end failed");

    assert_eq!(program.imports.len(), 1);
    assert_eq!(program.exports.len(), 1);
    assert_eq!(program.constants.len(), 1);
    assert_eq!(program.data.len(), 1);
    assert_eq!(program.functions.len(), 2);

    let data = &program.data[0].data;
    assert!(matches!(data[2].val(), Datum::Align(Alignment::AlignPtr)));

    match data[4].val() {
        Datum::Alloc { of, size, values, .. } => {
            assert_eq!(*of, WordType::Word4);
            assert_eq!(size.val().as_int(), Some(4));
            assert_eq!(values.len(), 4);
        }

        other => panic!("not an allocation: {:?}", other),
    }

    let fact = &program.functions[0];
    assert_eq!(fact.name.val().as_ref(), "fact");
    assert!(matches!(fact.body[1].val(), Statement::If { .. }));

    let main = &program.functions[1];
    assert!(main.static_data.is_some());
    assert!(matches!(
        main.body.last().map(|statement| statement.val()),
        Some(Statement::Return(Some(_)))
    ));
}

#[test]
fn string_data_is_nul_terminated() {
    let program = frontend(&source("data { word1 \"ab\"; }")).unwrap();

    match program.data[0].data[0].val() {
        Datum::Alloc { size, values, .. } => {
            assert_eq!(size.val().as_int(), Some(3));

            let bytes: Vec<_> = values.iter().map(|value| value.val().as_int()).collect();
            assert_eq!(bytes, [Some(97), Some(98), Some(0)]);
        }

        other => panic!("not an allocation: {:?}", other),
    }
}

#[test]
fn lexer_and_parser_compose() {
    let tokens = lex::lex(FACTORIAL).unwrap();
    assert_eq!(tokens.last().map(|token| token.val()), Some(&Token::Eof));

    let direct = parse::parse(&tokens).unwrap();
    let composed = frontend(&source(FACTORIAL)).unwrap();
    assert_eq!(direct, composed);
}

#[test]
fn lexical_errors_are_reported() {
    let diagnostics = frontend(&source("() f() {\n  x = 1 ` 2;\n}")).unwrap_err();
    assert_eq!(diagnostics.len(), 1);

    let expected = "\
Lexical error: Unknown token start symbol '`'
 --> test.sir:2:9
  |
2 |   x = 1 ` 2;
  |         ^

Build failed with 1 error
";

    assert_eq!(diagnostics.to_string(), expected);
}

#[test]
fn syntax_errors_are_reported() {
    let diagnostics = frontend(&source("const X = 1 +;")).unwrap_err();
    let rendered = diagnostics.to_string();

    assert!(rendered.starts_with("Syntax error: Expected an expression, found `;` instead\n"));
    assert!(rendered.contains(" --> test.sir:1:14\n"));
    assert!(rendered.ends_with("Build failed with 1 error\n"));
}

#[test]
fn unterminated_comment_points_at_opening() {
    let error = lex::lex("() f() {}\n  /* never closed").unwrap_err();

    assert_eq!(*error.val(), LexerError::UnterminatedComment);
    assert_eq!(error.location().start().line(), 2);
    assert_eq!(error.location().start().column(), 3);
}

#[test]
fn first_error_wins() {
    // Ambas líneas son inválidas, solo se reporta la primera
    let diagnostics = frontend(&source("goto a;\ngoto b;")).unwrap_err();
    let rendered = diagnostics.to_string();

    assert!(rendered.contains(" --> test.sir:1:1\n"));
    assert!(!rendered.contains("2:1"));
}
