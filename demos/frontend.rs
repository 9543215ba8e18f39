use sirc::{error::Diagnostics, lex::Lexer, parse, source::Source};
use std::io::{self, Read};

fn main() -> io::Result<()> {
    let mut text = String::new();
    io::stdin().lock().read_to_string(&mut text)?;

    let origin = std::rc::Rc::new(Source::new("<stdin>", text));
    let lexer = Lexer::new(origin.text());

    let diagnostics = match lexer.try_exhaustive() {
        Err(error) => Diagnostics::from(error).kind("Lexical error"),

        Ok(tokens) => {
            print!("Tokens: {:#?}\n\n", tokens);

            match parse::parse(&tokens) {
                Err(error) => Diagnostics::from(error).kind("Syntax error"),

                Ok(ast) => {
                    println!("Ast: {:#?}", ast);
                    Diagnostics::default()
                }
            }
        }
    };

    if !diagnostics.is_empty() {
        eprint!("{}", diagnostics.within(origin));
        std::process::exit(1);
    }

    Ok(())
}
