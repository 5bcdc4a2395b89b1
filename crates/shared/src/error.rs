use thiserror::Error;

pub const UNKNOWN_ERROR_MESSAGE: &str = "unknown error";

/// Why an envelope could not be turned into a usable payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("{0}")]
    Rejected(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl EnvelopeError {
    pub fn rejected(message: Option<&str>) -> Self {
        match message.map(str::trim) {
            Some(message) if !message.is_empty() => Self::Rejected(message.to_string()),
            _ => Self::Rejected(UNKNOWN_ERROR_MESSAGE.to_string()),
        }
    }
}
