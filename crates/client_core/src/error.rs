use shared::error::EnvelopeError;
use thiserror::Error;

/// The one failure kind callers see. Transport faults, unparseable bodies and
/// `success: false` envelopes all collapse into it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("{message}")]
    RequestFailed { message: String },
}

impl ClientError {
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::RequestFailed { message } => message,
        }
    }
}

impl From<EnvelopeError> for ClientError {
    fn from(value: EnvelopeError) -> Self {
        Self::request_failed(value.to_string())
    }
}
