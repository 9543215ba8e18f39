//! Punto de entrada ("driver").
//!
//! Este módulo lee un archivo fuente, ejecuta el front end y expone
//! una CLI para inspeccionar tokens y el AST resultante.

use anyhow::Context;
use bitflags::bitflags;
use clap::{crate_version, Arg, Command};
use sirc::{lex, source::Source};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use std::{
    fs,
    io::{self, Read},
    process,
    rc::Rc,
};

bitflags! {
    /// Salidas intermedias a imprimir.
    struct DumpOptions: u32 {
        /// Flujo de tokens.
        const TOKENS = 0x01;

        /// Árbol sintáctico.
        const AST = 0x02;
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sirc=warn")),
        )
        .with_writer(io::stderr)
        .init();

    // Parsing de CLI
    let args = Command::new("Solar IR front end")
        .version(crate_version!())
        .arg(
            Arg::new("input")
                .required(true)
                .value_name("INPUT")
                .help("Source file ('-' for stdin)"),
        )
        .arg(Arg::new("tokens").long("tokens").help("Dump the token stream"))
        .arg(Arg::new("ast").long("ast").help("Dump the syntax tree"))
        .arg(
            Arg::new("name")
                .long("name")
                .takes_value(true)
                .value_name("NAME")
                .help("Source name used in diagnostics"),
        )
        .get_matches();

    let mut dump = DumpOptions::empty();
    if args.is_present("tokens") {
        dump |= DumpOptions::TOKENS;
    }

    if args.is_present("ast") {
        dump |= DumpOptions::AST;
    }

    let input = args.value_of("input").context("Missing input")?;
    let text = match input {
        "-" => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read from stdin")?;

            text
        }

        path => fs::read_to_string(path)
            .with_context(|| format!("Failed to open for reading: {}", path))?,
    };

    let name = match (args.value_of("name"), input) {
        (Some(name), _) => name,
        (None, "-") => "<stdin>",
        (None, path) => path,
    };

    debug!(name, bytes = text.len(), "read source");
    let origin = Rc::new(Source::new(name, text));

    if dump.contains(DumpOptions::TOKENS) {
        // Errores léxicos se reportan más adelante desde el front end
        if let Ok(tokens) = lex::lex(origin.text()) {
            println!("Tokens: {:#?}\n", tokens);
        }
    }

    match sirc::frontend(&origin) {
        Ok(program) => {
            info!(functions = program.functions.len(), "front end succeeded");
            if dump.contains(DumpOptions::AST) {
                println!("Ast: {:#?}", program);
            }

            Ok(())
        }

        Err(diagnostics) => {
            eprint!("{}", diagnostics);
            process::exit(1);
        }
    }
}
