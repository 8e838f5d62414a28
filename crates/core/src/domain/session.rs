// Session - the cached (session_key, user) pair

use serde_json::{Map, Value};

/// User record returned by `getSelf`
pub type User = Map<String, Value>;

/// An established session
///
/// The key and the user record are created and destroyed together; the store
/// holds `Option<Session>` so a half-populated pair cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub session_key: String,
    pub user: User,
}

impl Session {
    pub fn new(session_key: impl Into<String>, user: User) -> Self {
        Self {
            session_key: session_key.into(),
            user,
        }
    }

    /// `userId` field of the user record
    pub fn user_id(&self) -> Option<&Value> {
        self.user.get("userId")
    }
}
