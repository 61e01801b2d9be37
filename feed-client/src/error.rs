use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedClientError {
    #[cfg(feature = "http")]
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Server(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl FeedClientError {
    /// Maps a failed response to an error, keeping the server's message
    /// when the body carried one.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("Request failed with status {status}"));
        match status {
            400 => FeedClientError::InvalidRequest(message),
            404 => FeedClientError::NotFound(message),
            409 => FeedClientError::Conflict(message),
            _ => FeedClientError::Server(message),
        }
    }
}
