// Central Error Type for the NetX client

use serde_json::Value;
use thiserror::Error;

use crate::domain::User;

/// Client-level error type
///
/// Only `Remote` is ever produced after a retry; every other variant is
/// surfaced on first occurrence.
#[derive(Error, Debug)]
pub enum NetxError {
    /// Missing URL or credentials, or credentials rejected by the server
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-success HTTP status or a failed connection
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response id does not echo the nonce that was sent
    #[error("Mismatched nonce: {received} != {expected}")]
    Protocol { expected: String, received: String },

    /// Error reported by the server, after the stale-session retry
    ///
    /// Carries the session the failing attempt was made with.
    #[error("{method} returned {error}, session_key={session_key:?}, user={user:?}")]
    Remote {
        method: String,
        error: Value,
        session_key: Option<String>,
        user: Option<User>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using NetxError
pub type Result<T> = std::result::Result<T, NetxError>;

impl NetxError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        NetxError::MalformedResponse(msg.into())
    }

    /// Server error payload, if this is a remote error
    pub fn remote_payload(&self) -> Option<&Value> {
        match self {
            NetxError::Remote { error, .. } => Some(error),
            _ => None,
        }
    }
}
