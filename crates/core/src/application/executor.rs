// Authenticated Call Executor - nonce, session credential, stale-session retry
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use super::session_store::SessionStore;
use crate::domain::envelope::{self, AUTHENTICATE_METHOD, GET_SELF_METHOD};
use crate::domain::{Credentials, Session, User};
use crate::error::{NetxError, Result};
use crate::port::{Authenticator, HttpGet, HttpPost, HttpReply, NonceProvider, Transport};

/// Outcome of a single round trip that got a well-formed, correctly
/// identified response
#[derive(Debug)]
enum Attempt {
    Success(Value),
    Remote(Value),
}

/// Executes JSON-RPC calls against the configured endpoint
///
/// Every call other than `authenticate` carries the cached session key. A
/// server-reported error is assumed to be a stale session: the session is
/// invalidated and the call is issued exactly once more, and the outcome of
/// that second attempt is final. Nonce mismatches, transport failures and
/// configuration problems are never retried.
pub struct RpcExecutor {
    endpoint: Option<String>,
    transport: Arc<dyn Transport>,
    nonces: Arc<dyn NonceProvider>,
    sessions: SessionStore,
    last_nonce: Mutex<Option<String>>,
}

impl RpcExecutor {
    /// Create a new executor
    ///
    /// # Arguments
    /// * `endpoint` - JSON-RPC endpoint URL (`None` fails at first call)
    /// * `credentials` - Username/password (`None` fails at first authenticated call)
    /// * `transport` - HTTP transport
    /// * `nonces` - Request id generator
    pub fn new(
        endpoint: Option<String>,
        credentials: Option<Credentials>,
        transport: Arc<dyn Transport>,
        nonces: Arc<dyn NonceProvider>,
    ) -> Self {
        Self {
            endpoint,
            transport,
            nonces,
            sessions: SessionStore::new(credentials),
            last_nonce: Mutex::new(None),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Most recently sent request id
    pub fn last_sent_nonce(&self) -> Option<String> {
        self.last_nonce
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Cached session key, authenticating on first use
    pub async fn session_key(&self) -> Result<String> {
        self.sessions.session_key(self).await
    }

    /// Cached user record, authenticating on first use
    pub async fn user(&self) -> Result<User> {
        self.sessions.user(self).await
    }

    pub async fn session(&self) -> Result<Session> {
        self.sessions.get_or_init(self).await
    }

    /// Issue an RPC call and return its `result`
    ///
    /// `params` are sent positionally in the given order.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        self.endpoint()?;

        if method == AUTHENTICATE_METHOD {
            return match self.attempt(method, &params, None).await? {
                Attempt::Success(result) => Ok(result),
                Attempt::Remote(error) => Err(remote_error(method, error, None)),
            };
        }

        let session = self.session().await?;
        match self
            .attempt(method, &params, Some(session.session_key.clone()))
            .await?
        {
            Attempt::Success(result) => return Ok(result),
            Attempt::Remote(error) => {
                warn!(
                    method = %method,
                    error = %error,
                    "Server returned an error, re-authenticating and retrying once"
                );
                // Another caller may already have replaced this session
                self.sessions.invalidate_if(&session.session_key).await;
            }
        }

        let session = self.session().await?;
        match self
            .attempt(method, &params, Some(session.session_key.clone()))
            .await?
        {
            Attempt::Success(result) => {
                info!(method = %method, "Call succeeded after re-authentication");
                Ok(result)
            }
            Attempt::Remote(error) => Err(remote_error(method, error, Some(session))),
        }
    }

    /// Authenticate with the configured credentials, bypassing the cache
    ///
    /// A result of `"-1"`, an empty string or a non-string value means the
    /// credentials were rejected.
    pub async fn login(&self) -> Result<String> {
        let credentials = self.sessions.credentials()?;
        self.authenticate(credentials).await
    }

    /// GET `url` with the session cookie attached
    ///
    /// Not retried on failure.
    pub async fn download(&self, url: &str) -> Result<HttpReply> {
        let session_key = self.session_key().await?;
        debug!(url = %url, "Downloading");

        let reply = self
            .transport
            .get(HttpGet {
                url: url.to_string(),
                session_key: Some(session_key),
            })
            .await?;
        ensure_success(url, &reply)?;

        Ok(reply)
    }

    fn endpoint(&self) -> Result<&str> {
        self.endpoint
            .as_deref()
            .ok_or_else(|| NetxError::Configuration("URL is not set in settings.".to_string()))
    }

    fn next_nonce(&self) -> String {
        let nonce = self.nonces.next_nonce();
        *self
            .last_nonce
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(nonce.clone());
        nonce
    }

    /// One round trip: encode, send, check status, decode, validate the id
    async fn attempt(
        &self,
        method: &str,
        params: &[Value],
        session_key: Option<String>,
    ) -> Result<Attempt> {
        let url = self.endpoint()?;
        let nonce = self.next_nonce();
        let body = envelope::encode(method, params, &nonce)?;

        debug!(method = %method, nonce = %nonce, "Sending RPC request");

        let reply = self
            .transport
            .post(HttpPost {
                url: url.to_string(),
                body,
                session_key,
            })
            .await?;
        ensure_success(url, &reply)?;

        let response = envelope::decode(&reply.body)?;
        if !response.echoes(&nonce) {
            warn!(method = %method, nonce = %nonce, received = %response.id_display(), "Nonce mismatch");
            return Err(NetxError::Protocol {
                expected: nonce,
                received: response.id_display(),
            });
        }

        Ok(match response.error {
            Some(error) => Attempt::Remote(error),
            None => Attempt::Success(response.result.unwrap_or(Value::Null)),
        })
    }
}

/// Remote error with the session the failing attempt was made with
fn remote_error(method: &str, error: Value, session: Option<Session>) -> NetxError {
    let (session_key, user) = match session {
        Some(session) => (Some(session.session_key), Some(session.user)),
        None => (None, None),
    };
    NetxError::Remote {
        method: method.to_string(),
        error,
        session_key,
        user,
    }
}

#[async_trait]
impl Authenticator for RpcExecutor {
    async fn authenticate(&self, credentials: &Credentials) -> Result<String> {
        let params = vec![json!(credentials.username()), json!(credentials.password())];
        let result = self.call(AUTHENTICATE_METHOD, params).await?;

        match result.as_str() {
            Some(key) if !key.is_empty() && key != "-1" => Ok(key.to_string()),
            _ => Err(NetxError::Configuration(
                "Invalid USERNAME or PASSWORD in settings.".to_string(),
            )),
        }
    }

    /// `getSelf` with an explicit key; runs inside session initialisation,
    /// so it never consults the store and never retries
    async fn fetch_self(&self, session_key: &str) -> Result<User> {
        match self
            .attempt(GET_SELF_METHOD, &[], Some(session_key.to_string()))
            .await?
        {
            Attempt::Success(Value::Object(user)) => Ok(user),
            Attempt::Success(other) => Err(NetxError::malformed(format!(
                "getSelf returned {} instead of a user record",
                other
            ))),
            Attempt::Remote(error) => Err(NetxError::Remote {
                method: GET_SELF_METHOD.to_string(),
                error,
                session_key: Some(session_key.to_string()),
                user: None,
            }),
        }
    }
}

fn ensure_success(url: &str, reply: &HttpReply) -> Result<()> {
    if reply.is_success() {
        Ok(())
    } else {
        Err(NetxError::Transport(format!(
            "{} returned HTTP{}",
            url, reply.status
        )))
    }
}
