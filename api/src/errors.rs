use thiserror::Error;

/// Errors that can occur when talking to the songs service.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid API url \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    ///
    /// `message` is the server's own `message` field when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The server answered successfully, but not with the expected JSON.
    #[error("Unexpected response from the server: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    /// Build a [`ApiError::Status`] from a failed response.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|body| body.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP Error: {status}"));
        Self::Status { status, message }
    }

    /// The HTTP status, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidUrl { .. } | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
