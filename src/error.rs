//! Reporte de errores.
//!
//! Los errores de cada fase se ubican en el código fuente original.
//! [`Diagnostics`] los agrupa y, si conoce el [`Source`] de origen,
//! cita la línea afectada y subraya la posición exacta.

use crate::source::{Located, Location, Source};
use std::{
    error::Error,
    fmt::{self, Display},
    rc::Rc,
};

mod sealed {
    pub trait Sealed {}
}

pub trait LocatedError: sealed::Sealed {
    fn source(&self) -> &dyn Error;
    fn location(&self) -> &Location;
}

pub struct Diagnostics {
    kind: &'static str,
    errors: Vec<Box<dyn 'static + LocatedError>>,
    origin: Option<Rc<Source>>,
}

impl Diagnostics {
    pub fn kind(self, kind: &'static str) -> Self {
        Diagnostics { kind, ..self }
    }

    /// Asocia el texto fuente, lo cual permite citarlo.
    pub fn within(self, origin: Rc<Source>) -> Self {
        Diagnostics {
            origin: Some(origin),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    fn excerpt(
        &self,
        fmt: &mut fmt::Formatter<'_>,
        origin: &Source,
        location: &Location,
    ) -> fmt::Result {
        let (start, end) = (location.start(), location.end());

        let digits = start.line().to_string().chars().count();
        writeln!(fmt, "{:digits$} |", "", digits = digits)?;

        origin.with_line(start.line(), |line| {
            writeln!(fmt, "{:>digits$} | {}", start.line(), line, digits = digits)?;

            // Un rango que continúa en otra línea se subraya hasta el fin de la primera
            let last = if end.line() == start.line() {
                end.column()
            } else {
                line.chars().count() as u32 + 1
            };

            let skip = (start.column() - 1) as usize;
            let highlight = last.saturating_sub(start.column()).max(1) as usize;

            writeln!(
                fmt,
                "{:digits$} | {:skip$}{:^<highlight$}",
                "",
                "",
                "",
                digits = digits,
                skip = skip,
                highlight = highlight
            )
        })
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics {
            kind: "error",
            errors: Default::default(),
            origin: None,
        }
    }
}

impl<E: 'static + LocatedError> From<E> for Diagnostics {
    fn from(error: E) -> Self {
        Diagnostics {
            errors: vec![Box::new(error)],
            ..Default::default()
        }
    }
}

impl<E: 'static + LocatedError> From<Vec<E>> for Diagnostics {
    fn from(errors: Vec<E>) -> Self {
        let errors = errors
            .into_iter()
            .map(|error| {
                let errors: Box<dyn LocatedError> = Box::new(error);
                errors
            })
            .collect();

        Diagnostics {
            errors,
            ..Default::default()
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors: Vec<_> = self
            .errors
            .iter()
            .map(|error| format!("{} ({})", error.source(), error.location()))
            .collect();

        fmt.debug_struct("Diagnostics")
            .field("kind", &self.kind)
            .field("errors", &errors)
            .field("origin", &self.origin)
            .finish()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Diagnostics { kind, errors, origin } = self;

        if errors.is_empty() {
            return writeln!(fmt, "No errors were reported");
        }

        for error in errors {
            writeln!(fmt, "{}: {}", kind, error.source())?;

            let location = error.location();
            match origin {
                Some(origin) => {
                    writeln!(fmt, " --> {}:{}", origin.name(), location.start())?;
                    self.excerpt(fmt, origin, location)?;
                }

                None => writeln!(fmt, " --> {}", location.start())?,
            }

            writeln!(fmt)?;
        }

        let error_or_errors = if errors.len() == 1 { "error" } else { "errors" };
        writeln!(
            fmt,
            "Build failed with {} {}",
            errors.len(),
            error_or_errors
        )
    }
}

impl<E: Error> sealed::Sealed for Located<E> {}

impl<E: Error> LocatedError for Located<E> {
    fn source(&self) -> &dyn Error {
        self.as_ref()
    }

    fn location(&self) -> &Location {
        Located::location(self)
    }
}
