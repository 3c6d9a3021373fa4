use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Everything that can go wrong between a view and the REST API.
/// None of these are fatal; views show the message and let the user retry.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A required endpoint is not configured
    #[error("{0}")]
    Config(String),

    /// Non-2xx response; `message` is the server's text or a synthesized one
    #[error("{message}")]
    Http { status: u16, message: String },

    /// 2xx response missing a field the client needs
    #[error("{0}")]
    ResponseShape(String),

    /// Request never completed
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx response body was not the expected JSON
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// Token store failure
    #[error("Session storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// A feed operation was attempted without a session token
    #[error("Not signed in; run `login` first")]
    NotSignedIn,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
