//! Errors returned by [`SearchClient`](crate::SearchClient).

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Rejected before any network I/O.
    #[error("invalid entity type {0:?}: expected `study` or `biosample`")]
    InvalidEntityType(String),

    /// The portal answered with a non-success status.
    #[error("portal search failed with status {status}: {body}")]
    RemoteSearch { status: u16, body: String },

    /// Connection, TLS, or timeout failure.
    #[error("portal request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("portal response was not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}
