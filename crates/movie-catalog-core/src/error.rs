use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// A rating with a known scale suffix whose number does not parse
    #[error("malformed rating '{value}': {reason}")]
    Format { value: String, reason: String },
    #[error("no rated movies in the collection")]
    EmptyCollection,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
