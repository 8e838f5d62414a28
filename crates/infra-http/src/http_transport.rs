// reqwest-backed Transport
// reason: reqwest for async HTTP with connection reuse
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

use netx_core::error::{NetxError, Result};
use netx_core::port::{HttpGet, HttpPost, HttpReply, Transport};

/// Static user agent identifying the client name and version
pub const USER_AGENT: &str = concat!("netx-rs/", env!("CARGO_PKG_VERSION"));

/// Cookie the server reads the session key from
const SESSION_COOKIE: &str = "sessionKey";

/// HTTP transport over a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport
    ///
    /// # Arguments
    /// * `timeout` - Per-request timeout; `None` keeps the reqwest default (no timeout)
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| NetxError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn with_session(builder: RequestBuilder, session_key: Option<&str>) -> RequestBuilder {
        match session_key {
            Some(key) => builder.header(COOKIE, format!("{}={}", SESSION_COOKIE, key)),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder, method: &str, url: &str) -> Result<HttpReply> {
        let response = builder
            .send()
            .await
            .map_err(|e| NetxError::Transport(format!("{} {} failed: {}", method, url, e)))?;

        into_reply(response, url).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: HttpPost) -> Result<HttpReply> {
        debug!(url = %request.url, bytes = request.body.len(), "POST");

        let builder = self
            .client
            .post(&request.url)
            .header(CONTENT_TYPE, "application/json")
            .body(request.body);
        let builder = Self::with_session(builder, request.session_key.as_deref());

        Self::send(builder, "POST", &request.url).await
    }

    async fn get(&self, request: HttpGet) -> Result<HttpReply> {
        debug!(url = %request.url, "GET");

        let builder = self.client.get(&request.url);
        let builder = Self::with_session(builder, request.session_key.as_deref());

        Self::send(builder, "GET", &request.url).await
    }
}

async fn into_reply(response: Response, url: &str) -> Result<HttpReply> {
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let body = response
        .bytes()
        .await
        .map_err(|e| NetxError::Transport(format!("Failed to read body from {}: {}", url, e)))?
        .to_vec();

    Ok(HttpReply {
        status,
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_post_sends_json_with_session_cookie() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/x7/json/")
            .match_header("content-type", "application/json")
            .match_header("user-agent", USER_AGENT)
            .match_header("cookie", "sessionKey=abc123")
            .match_body(Matcher::JsonString(r#"{"id":"1"}"#.to_string()))
            .with_status(200)
            .with_body(r#"{"id":"1","result":true}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(None).unwrap();
        let reply = transport
            .post(HttpPost {
                url: format!("{}/x7/json/", server.url()),
                body: r#"{"id":"1"}"#.to_string(),
                session_key: Some("abc123".to_string()),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(reply.is_success());
        let body: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(body["result"], true);
    }

    #[tokio::test]
    async fn test_post_without_session_sends_no_cookie() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/x7/json/")
            .match_header("cookie", Matcher::Missing)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let transport = HttpTransport::new(None).unwrap();
        transport
            .post(HttpPost {
                url: format!("{}/x7/json/", server.url()),
                body: "{}".to_string(),
                session_key: None,
            })
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/x7/json/")
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let transport = HttpTransport::new(Some(Duration::from_secs(5))).unwrap();
        let reply = transport
            .post(HttpPost {
                url: format!("{}/x7/json/", server.url()),
                body: "{}".to_string(),
                session_key: None,
            })
            .await
            .unwrap();

        assert_eq!(reply.status, 500);
        assert!(!reply.is_success());
    }

    #[tokio::test]
    async fn test_get_returns_headers_and_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/file/asset/42/zoom")
            .match_header("cookie", "sessionKey=k")
            .with_status(200)
            .with_header("content-type", "image/jpeg")
            .with_body(vec![0xFF, 0xD8, 0xFF])
            .create_async()
            .await;

        let transport = HttpTransport::new(None).unwrap();
        let reply = transport
            .get(HttpGet {
                url: format!("{}/file/asset/42/zoom", server.url()),
                session_key: Some("k".to_string()),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply.body, vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(reply.header("Content-Type"), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = HttpTransport::new(Some(Duration::from_secs(2))).unwrap();
        let err = transport
            .post(HttpPost {
                url: "http://127.0.0.1:1/x7/json/".to_string(),
                body: "{}".to_string(),
                session_key: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, NetxError::Transport(_)));
    }
}
