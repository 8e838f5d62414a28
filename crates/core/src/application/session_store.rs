// Session Store - lazily established, cached (session_key, user) pair
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{Credentials, Session, User};
use crate::error::{NetxError, Result};
use crate::port::Authenticator;

/// Cached session for one client instance
///
/// The first access authenticates and then fetches the user record with the
/// new key; both are stored together. `invalidate` drops both, so the next
/// access re-authenticates before the user is recomputed.
///
/// Initialisation runs while the lock is held, so concurrent callers never
/// authenticate twice and never observe a torn pair.
pub struct SessionStore {
    credentials: Option<Credentials>,
    state: Mutex<Option<Session>>,
}

impl SessionStore {
    /// Create an empty store
    ///
    /// Missing credentials are reported at first access, not here.
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            credentials,
            state: Mutex::new(None),
        }
    }

    pub fn credentials(&self) -> Result<&Credentials> {
        self.credentials.as_ref().ok_or_else(|| {
            NetxError::Configuration("USERNAME and PASSWORD are not set in settings.".to_string())
        })
    }

    /// Return the cached session, establishing it first if needed
    pub async fn get_or_init(&self, auth: &dyn Authenticator) -> Result<Session> {
        let mut state = self.state.lock().await;
        if let Some(session) = state.as_ref() {
            return Ok(session.clone());
        }

        let credentials = self.credentials()?;
        debug!(username = %credentials.username(), "Establishing session");

        let session_key = auth.authenticate(credentials).await?;
        let user = auth.fetch_self(&session_key).await?;
        let session = Session::new(session_key, user);

        info!(
            username = %credentials.username(),
            user_id = ?session.user_id(),
            "Session established"
        );

        *state = Some(session.clone());
        Ok(session)
    }

    pub async fn session_key(&self, auth: &dyn Authenticator) -> Result<String> {
        Ok(self.get_or_init(auth).await?.session_key)
    }

    pub async fn user(&self, auth: &dyn Authenticator) -> Result<User> {
        Ok(self.get_or_init(auth).await?.user)
    }

    /// Clear the session key and user together
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        if state.take().is_some() {
            debug!("Session invalidated");
        }
    }

    /// Clear the session only while it still carries `stale_key`
    ///
    /// A caller whose key was already replaced by a concurrent recovery
    /// leaves the fresh session alone. Returns whether anything was cleared.
    pub async fn invalidate_if(&self, stale_key: &str) -> bool {
        let mut state = self.state.lock().await;
        match state.as_ref() {
            Some(session) if session.session_key == stale_key => {
                *state = None;
                debug!(session_key = %stale_key, "Stale session invalidated");
                true
            }
            _ => false,
        }
    }

    /// Cached session without establishing one
    ///
    /// Returns `None` while a session is being established.
    pub fn snapshot(&self) -> Option<Session> {
        self.state.try_lock().ok().and_then(|state| state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Issues "key-1", "key-2", ... and records which key each user came from
    #[derive(Default)]
    struct CountingAuthenticator {
        logins: AtomicUsize,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl Authenticator for CountingAuthenticator {
        async fn authenticate(&self, _credentials: &Credentials) -> Result<String> {
            let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::task::yield_now().await;
            Ok(format!("key-{}", n))
        }

        async fn fetch_self(&self, session_key: &str) -> Result<User> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let mut user = User::new();
            user.insert("login".to_string(), json!("alice"));
            user.insert("issuedFor".to_string(), json!(session_key));
            Ok(user)
        }
    }

    fn store() -> SessionStore {
        SessionStore::new(Some(Credentials::new("alice", "secret")))
    }

    #[tokio::test]
    async fn test_lazy_init_is_cached() {
        let auth = CountingAuthenticator::default();
        let store = store();

        assert!(store.snapshot().is_none());

        let key = store.session_key(&auth).await.unwrap();
        let user = store.user(&auth).await.unwrap();

        assert_eq!(key, "key-1");
        assert_eq!(user["issuedFor"], "key-1");
        assert_eq!(auth.logins.load(Ordering::SeqCst), 1);
        assert_eq!(auth.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_clears_key_and_user_together() {
        let auth = CountingAuthenticator::default();
        let store = store();

        store.get_or_init(&auth).await.unwrap();
        store.invalidate().await;
        assert!(store.snapshot().is_none());

        // Asking for the user alone re-authenticates first
        let user = store.user(&auth).await.unwrap();
        assert_eq!(user["issuedFor"], "key-2");
        assert_eq!(auth.logins.load(Ordering::SeqCst), 2);
        assert_eq!(auth.lookups.load(Ordering::SeqCst), 2);

        let session = store.snapshot().unwrap();
        assert_eq!(session.session_key, "key-2");
    }

    #[tokio::test]
    async fn test_invalidate_if_keeps_a_replaced_session() {
        let auth = CountingAuthenticator::default();
        let store = store();

        store.get_or_init(&auth).await.unwrap();
        assert!(store.invalidate_if("key-1").await);
        store.get_or_init(&auth).await.unwrap();

        // A late caller still holding key-1 must not drop key-2
        assert!(!store.invalidate_if("key-1").await);
        assert_eq!(store.snapshot().unwrap().session_key, "key-2");
        assert_eq!(auth.logins.load(Ordering::SeqCst), 2);

        // Nothing cached: nothing to clear
        store.invalidate().await;
        assert!(!store.invalidate_if("key-2").await);
    }

    #[test]
    fn test_missing_credentials_is_configuration_error() {
        let auth = CountingAuthenticator::default();
        let store = SessionStore::new(None);

        let err = tokio_test::block_on(store.session_key(&auth)).unwrap_err();

        assert!(matches!(err, NetxError::Configuration(_)));
        assert_eq!(auth.logins.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_access_authenticates_once() {
        let auth = Arc::new(CountingAuthenticator::default());
        let store = Arc::new(store());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let auth = auth.clone();
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.session_key(auth.as_ref()).await.unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), "key-1");
        }
        assert_eq!(auth.logins.load(Ordering::SeqCst), 1);
    }
}
