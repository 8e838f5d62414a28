//! Shared fixtures for the NetX integration tests
//!
//! `ScriptedServer` plays the NetX server: it answers `authenticate` and
//! `getSelf` itself and hands every other method to a per-test handler.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use netx_core::error::Result;
use netx_core::port::{HttpGet, HttpPost, HttpReply, NonceProvider, Transport};

/// One request as the server saw it
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub method: String,
    pub id: String,
    pub params: Value,
    pub session_key: Option<String>,
}

/// What the handler wants the server to do
pub enum Reply {
    Result(Value),
    Error(Value),
    /// Envelope with a wrong id
    WrongId(Value),
    Status(u16),
}

type Handler = Box<dyn Fn(&Seen, usize) -> Reply + Send + Sync>;

pub struct ScriptedServer {
    handler: Handler,
    login_result: Mutex<Option<Value>>,
    logins: AtomicUsize,
    seen: Mutex<Vec<Seen>>,
    calls: AtomicUsize,
}

impl ScriptedServer {
    /// `handler` gets each non-session request and how many such requests
    /// came before it
    pub fn new(handler: impl Fn(&Seen, usize) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            login_result: Mutex::new(None),
            logins: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Fixed `authenticate` result instead of `session-<n>`
    pub fn with_login_result(self: Arc<Self>, result: Value) -> Arc<Self> {
        *self.login_result.lock().unwrap() = Some(result);
        self
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.seen().into_iter().map(|s| s.method).collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.seen().iter().filter(|s| s.method == method).count()
    }

    fn envelope(id: &str, body: Value) -> Result<HttpReply> {
        let mut envelope = body;
        envelope["id"] = json!(id);
        Ok(HttpReply::ok(envelope.to_string()))
    }
}

#[async_trait]
impl Transport for ScriptedServer {
    async fn post(&self, request: HttpPost) -> Result<HttpReply> {
        let envelope: Value = serde_json::from_str(&request.body).unwrap();
        let seen = Seen {
            method: envelope["method"].as_str().unwrap().to_string(),
            id: envelope["id"].as_str().unwrap().to_string(),
            params: envelope["params"].clone(),
            session_key: request.session_key.clone(),
        };
        self.seen.lock().unwrap().push(seen.clone());

        match seen.method.as_str() {
            "authenticate" => {
                let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
                let result = self
                    .login_result
                    .lock()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| json!(format!("session-{}", n)));
                Self::envelope(&seen.id, json!({ "result": result }))
            }
            "getSelf" => Self::envelope(
                &seen.id,
                json!({"result": {"userId": 42, "login": "alice", "sessionKey": seen.session_key}}),
            ),
            _ => {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                match (self.handler)(&seen, n) {
                    Reply::Result(result) => Self::envelope(&seen.id, json!({ "result": result })),
                    Reply::Error(error) => Self::envelope(&seen.id, json!({ "error": error })),
                    Reply::WrongId(result) => {
                        Self::envelope(&format!("not-{}", seen.id), json!({ "result": result }))
                    }
                    Reply::Status(status) => Ok(HttpReply {
                        status,
                        headers: Vec::new(),
                        body: b"<html>error</html>".to_vec(),
                    }),
                }
            }
        }
    }

    async fn get(&self, request: HttpGet) -> Result<HttpReply> {
        Ok(HttpReply {
            status: 200,
            headers: vec![("content-type".to_string(), "image/jpeg".to_string())],
            body: request.url.into_bytes(),
        })
    }
}

/// Nonces "N1", "N2", ...
#[derive(Default)]
pub struct SequentialNonces(AtomicUsize);

impl NonceProvider for SequentialNonces {
    fn next_nonce(&self) -> String {
        format!("N{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Fake search hits `{assetId, name}`
pub fn assets(count: usize) -> Value {
    Value::Array(
        (1..=count)
            .map(|i| json!({"assetId": i, "name": format!("asset-{}.jpg", i)}))
            .collect(),
    )
}
