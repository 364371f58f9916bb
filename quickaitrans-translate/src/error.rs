//! Error types for quickaitrans-translate.

use thiserror::Error;

/// All errors that can arise from the translation collaborator.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// A required environment variable is unset or blank.
    #[error(
        "AI client is not configured: {variable} is unset or empty; \
         expected environment variables: AI_HOST, AI_API_KEY, AI_DEPLOYMENT, AI_API_VERSION"
    )]
    MissingConfig { variable: &'static str },

    /// The request never produced an HTTP status (DNS, TLS, connect, ...).
    #[error("translation API request failed: {0}")]
    Transport(Box<ureq::Error>),

    /// The API kept answering with a non-success status.
    #[error("translation API returned status {status} after {attempts} attempt(s)")]
    Api { status: u16, attempts: u32 },

    /// The answer could not be decoded as the expected nested-string shape.
    #[error("malformed translation response: {reason}")]
    MalformedResponse { reason: String },
}

impl From<ureq::Error> for TranslateError {
    fn from(err: ureq::Error) -> Self {
        TranslateError::Transport(Box::new(err))
    }
}
