use thiserror::Error;

/// Result alias for the record and database layer.
pub type Result<T> = std::result::Result<T, NeoError>;

#[derive(Debug, Error, PartialEq)]
pub enum NeoError {
    /// A close approach was serialized before the database linked it to an object.
    #[error("cannot serialize close approach of '{designation}' with no linked NEO")]
    UnlinkedApproach { designation: String },

    #[error("invalid close approach date '{0}'")]
    InvalidDate(String),

    #[error("invalid numeric value '{value}' for field '{field}'")]
    InvalidNumber { field: &'static str, value: String },
}
