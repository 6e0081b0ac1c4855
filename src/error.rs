//! Error types for option declaration and argument scanning.

use thiserror::Error;

use crate::value::ValueError;

/// Everything that can go wrong while declaring options or scanning an
/// argument vector.
///
/// Configuration problems surface immediately at declaration time. The
/// remaining variants abort a [`Parser::parse`](crate::Parser::parse) call
/// at the first offending token; options matched earlier in the same call
/// keep their newly parsed values.
#[derive(Debug, Error)]
pub enum Error {
    /// An option was declared with an empty alias set, an alias containing
    /// characters outside `[A-Za-z0-9-]`, or a default value its arity
    /// cannot carry.
    #[error("option `{option}`: {reason}")]
    Configuration {
        /// Display name of the offending option, or the rejected alias
        /// itself when construction never completed.
        option: String,
        /// Which declaration contract was violated.
        reason: String,
    },

    /// A token named an alias that no registered option declares.
    #[error("unknown option `{0}`")]
    UnknownOption(String),

    /// A value-requiring option had no following token left to consume.
    #[error("option `{0}` requires a value")]
    MissingValue(String),

    /// Raw text could not be exhaustively converted to the option's
    /// declared type.
    #[error("option `{option}`: cannot parse argument {raw:?}")]
    Parse {
        option: String,
        raw: String,
        #[source]
        source: ValueError,
    },

    /// The option's validator rejected a successfully converted value.
    #[error("option `{option}`: argument {raw:?} rejected by validator")]
    Validation { option: String, raw: String },
}

/// Result alias for option-parsing operations.
pub type Result<T> = std::result::Result<T, Error>;
