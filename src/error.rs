//! Error type shared by the client, session and form layers.

/// Errors produced by repair-service API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    ///
    /// `message` is the backend's `message` field when it sent one, else the
    /// operation's fallback text.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A success response did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Form input was rejected before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// The persisted session could not be read or written.
    #[error("session storage failed: {0}")]
    Storage(String),

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of an application-level failure, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend rejected the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}
