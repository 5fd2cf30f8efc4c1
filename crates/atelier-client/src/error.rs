use thiserror::Error;

/// Longest body excerpt kept on [`ClientError::UnexpectedStatus`].
pub(crate) const BODY_EXCERPT_LEN: usize = 300;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Failure of an [`crate::OrderDesk`] mutation. The local board is unchanged
/// whenever one of these is returned.
#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Core(#[from] atelier_core::CoreError),

    #[error(transparent)]
    Transition(#[from] atelier_core::TransitionError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Trims a response body to a loggable excerpt on a char boundary.
pub(crate) fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
