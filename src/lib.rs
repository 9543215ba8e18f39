//! Front end para Solar IR.
//!
//! Solar IR es un lenguaje intermedio cercano a ensamblador, con
//! operaciones de memoria tipadas, tamaños de palabra explícitos,
//! convenciones de llamada y control de flujo estructurado.
//!
//! # Fases
//! Cada programa deriva de un único texto fuente. Este texto se somete
//! primero a análisis léxico en [`lex`], de lo cual se obtiene un flujo
//! de tokens. El flujo de tokens se dispone en un AST por medio de
//! análisis sintáctico en [`parse`]. El AST resultante se entrega
//! completo a fases posteriores, las cuales no forman parte de este crate.
//!
//! Ambas fases fallan ante el primer error y reportan su ubicación
//! exacta. [`error::Diagnostics`] da formato a estos errores.

pub mod error;
pub mod lex;
pub mod parse;
pub mod source;

use std::rc::Rc;

use error::Diagnostics;
use parse::Program;
use source::Source;

use tracing::{debug, trace};

/// Ejecuta análisis léxico y sintáctico sobre un texto fuente.
pub fn frontend(origin: &Rc<Source>) -> Result<Program, Diagnostics> {
    let tokens = lex::lex(origin.text()).map_err(|error| {
        Diagnostics::from(error)
            .kind("Lexical error")
            .within(Rc::clone(origin))
    })?;

    debug!(source = origin.name(), tokens = tokens.len(), "lexing finished");
    trace!(?tokens);

    let program = parse::parse(&tokens).map_err(|error| {
        Diagnostics::from(error)
            .kind("Syntax error")
            .within(Rc::clone(origin))
    })?;

    debug!(
        source = origin.name(),
        data = program.data.len(),
        constants = program.constants.len(),
        functions = program.functions.len(),
        "parsing finished"
    );

    Ok(program)
}
