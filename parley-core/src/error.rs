use thiserror::Error;

/// Error taxonomy for the whole service.
///
/// The web layer maps each variant onto an HTTP status, so callers can tell
/// "you sent a bad request" apart from "the endpoint failed" and "you hung up".
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is missing or invalid. Not retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller input was rejected before any network activity.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The inference endpoint failed or was unreachable.
    #[error("inference request failed: {message}")]
    Inference {
        /// HTTP status from the endpoint, when one was received.
        status: Option<u16>,
        message: String,
    },

    /// The caller aborted before the call completed.
    #[error("request cancelled")]
    Cancelled,
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
