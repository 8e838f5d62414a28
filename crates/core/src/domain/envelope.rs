//! RPC Envelope Codec
//!
//! Builds the outbound request object for the X7 JSON-RPC dialect and
//! unwraps the response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{NetxError, Result};

pub const JSONRPC_VERSION: &str = "2.0";
pub const DATA_CONTEXT: &str = "json";

/// Sent without a session credential
pub const AUTHENTICATE_METHOD: &str = "authenticate";
pub const GET_SELF_METHOD: &str = "getSelf";

/// Outbound request envelope
///
/// Params are positional; their order is owned by the method facade.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcRequest<'a> {
    pub id: &'a str,
    pub data_context: &'static str,
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: &'a [Value],
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: &'a str, params: &'a [Value], nonce: &'a str) -> Self {
        Self {
            id: nonce,
            data_context: DATA_CONTEXT,
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
        }
    }
}

/// Decoded response envelope
///
/// A `null` error is treated the same as a missing one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl RpcResponse {
    /// True if the response id is exactly the nonce that was sent
    pub fn echoes(&self, nonce: &str) -> bool {
        matches!(&self.id, Some(Value::String(id)) if id == nonce)
    }

    /// Response id rendered for diagnostics
    pub fn id_display(&self) -> String {
        match &self.id {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => "null".to_string(),
        }
    }
}

/// Serialize a request envelope
pub fn encode(method: &str, params: &[Value], nonce: &str) -> Result<String> {
    Ok(serde_json::to_string(&RpcRequest::new(method, params, nonce))?)
}

/// Parse a response envelope
///
/// Anything other than a JSON object is rejected.
pub fn decode(raw: &[u8]) -> Result<RpcResponse> {
    let value: Value = serde_json::from_slice(raw)
        .map_err(|e| NetxError::malformed(format!("response is not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(NetxError::malformed(format!(
            "expected a JSON-RPC object, got {}",
            value
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| NetxError::malformed(format!("unexpected envelope shape: {}", e)))
}
