use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An enumerated filter (posting date, deadline) received an unknown keyword.
    #[error("invalid value '{value}' for filter '{field}'")]
    InvalidFilterValue { field: String, value: String },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Structured filter input (e.g. the two-date JSON payload) could not be decoded.
    #[error("malformed filter input: {0}")]
    MalformedInput(String),

    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
