// Transport Port (Interface)

use async_trait::async_trait;

use crate::error::Result;

/// JSON POST to the RPC endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpPost {
    pub url: String,
    pub body: String,
    /// Attached as the `sessionKey` cookie when present
    pub session_key: Option<String>,
}

/// Authenticated GET (file download)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpGet {
    pub url: String,
    pub session_key: Option<String>,
}

/// Raw HTTP reply, whatever the status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP transport interface
///
/// Implementations return the reply for every status; status checking is
/// done by the executor. Connection-level failures map to
/// `NetxError::Transport`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: HttpPost) -> Result<HttpReply>;

    async fn get(&self, request: HttpGet) -> Result<HttpReply>;
}
