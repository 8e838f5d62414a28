// Authenticator Port - collaborator of the session store

use async_trait::async_trait;

use crate::domain::{Credentials, User};
use crate::error::Result;

/// Operations the session store uses to (re)build a session
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchange credentials for a session key
    async fn authenticate(&self, credentials: &Credentials) -> Result<String>;

    /// Fetch the user record belonging to `session_key`
    async fn fetch_self(&self, session_key: &str) -> Result<User>;
}
