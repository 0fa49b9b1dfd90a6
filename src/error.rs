//! Error types for crud-sqlgen.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for a generation run. Every variant aborts the run.
#[derive(Error, Debug)]
pub enum Error {
    /// The introspection provider has no type by that name
    #[error("type `{type_name}` was not found in the given type descriptions")]
    TypeNotFound { type_name: String },

    /// The type could not be turned into a consistent schema
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A type description or answers file is malformed
    #[error("invalid description file {path}: {message}")]
    Description { path: PathBuf, message: String },

    /// An input glob pattern was malformed or matched nothing
    #[error("input pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },

    /// Scripted input has no answer for a prompt
    #[error("no scripted answer for prompt \"{prompt}\"")]
    MissingAnswer { prompt: String },

    /// The console closed before the prompt was answered
    #[error("input closed while waiting for an answer to \"{prompt}\"")]
    Prompt { prompt: String },

    /// I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

/// Errors raised while deriving a `TypeSchema` from a type description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No `Id` field and no identity supplied
    #[error("the type {type_name} has no Id field and no identity fields were given")]
    NoIdentity { type_name: String },

    /// User supplied an identity name that is not a field of the type
    #[error("the type {type_name} has no field named \"{field}\" to use as an identity")]
    UnknownIdentityField { type_name: String, field: String },

    /// Identity fields must map to `Int`
    #[error("the type {type_name} has an identity field {field} that is not an int")]
    NonIntegerIdentity { type_name: String, field: String },

    /// Identity fields must always hold a value
    #[error("the type {type_name} has an identity field {field} that is nullable")]
    NullableIdentity { type_name: String, field: String },

    /// A prompted size could not be read as an integer
    #[error("the value \"{input}\" given for the {what} of {field} cannot be parsed into an integer")]
    UnparsableNumber {
        field: String,
        what: &'static str,
        input: String,
    },

    /// A prompted size parsed but is not allowed
    #[error("the value \"{input}\" given for the {what} of {field} is out of range: {reason}")]
    OutOfRange {
        field: String,
        what: &'static str,
        input: String,
        reason: &'static str,
    },
}
