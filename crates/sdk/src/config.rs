//! Client configuration
//!
//! An explicit, immutable value handed to [`crate::NetxClient`] at
//! construction. Missing URL or credentials are not rejected here; they
//! surface as `NetxError::Configuration` on first use.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use netx_core::domain::Credentials;

use crate::error::{config_error, Result};
use crate::protocol::{DEFAULT_ASSETS_PER_PAGE, DEFAULT_DATA_TYPE};

/// Environment variable prefix (`NETX_URL`, `NETX_USERNAME`, ...)
pub const ENV_PREFIX: &str = "NETX";

#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the server, e.g. `https://dam.example.org`
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_assets_per_page")]
    pub assets_per_page: u32,
    /// Endpoint path appended to `url` for RPC calls
    #[serde(default = "default_data_type")]
    pub data_type: String,
    /// Per-request timeout; unset means the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_assets_per_page() -> u32 {
    DEFAULT_ASSETS_PER_PAGE
}

fn default_data_type() -> String {
    DEFAULT_DATA_TYPE.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            password: None,
            assets_per_page: DEFAULT_ASSETS_PER_PAGE,
            data_type: default_data_type(),
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("assets_per_page", &self.assets_per_page)
            .field("data_type", &self.data_type)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: Some(url.into()),
            username: Some(username.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }

    pub fn with_assets_per_page(mut self, assets_per_page: u32) -> Self {
        self.assets_per_page = assets_per_page;
        self
    }

    /// Load from an optional settings file overlaid with `NETX_*` variables
    ///
    /// # Example
    /// ```text
    /// NETX_URL=https://dam.example.org NETX_USERNAME=alice NETX_PASSWORD=... netx search cat
    /// ```
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        // Values stay strings; numeric fields are parsed on deserialize, so
        // credentials like "0123" survive untouched
        builder = builder.add_source(config::Environment::with_prefix(env_prefix));

        builder
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)
    }

    /// Root URL without a trailing slash
    pub fn root_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }

    /// JSON-RPC endpoint: `{url}/{data_type}`
    pub fn api_url(&self) -> Option<String> {
        self.root_url()
            .map(|root| format!("{}/{}", root, self.data_type))
    }

    /// Both username and password, or nothing
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();

        assert_eq!(config.assets_per_page, 10);
        assert_eq!(config.data_type, "x7/json/");
        assert!(config.api_url().is_none());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_api_url_joins_root_and_data_type() {
        let config = ClientConfig::new("https://dam.example.org/", "alice", "secret");

        assert_eq!(config.root_url(), Some("https://dam.example.org"));
        assert_eq!(
            config.api_url().as_deref(),
            Some("https://dam.example.org/x7/json/")
        );
    }

    #[test]
    fn test_partial_credentials_are_absent() {
        let config = ClientConfig {
            username: Some("alice".to_string()),
            ..Default::default()
        };
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ClientConfig::new("https://dam.example.org", "alice", "hunter2");
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("netx-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "url = \"https://dam.example.org\"\nusername = \"alice\"\npassword = \"secret\"\nassets_per_page = 25\n",
        )
        .unwrap();

        let config = ClientConfig::load_with_prefix(Some(&path), "NETX_TEST_FILE").unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.url.as_deref(), Some("https://dam.example.org"));
        assert_eq!(config.assets_per_page, 25);
        assert_eq!(config.data_type, "x7/json/");
        assert_eq!(config.credentials().unwrap().username(), "alice");
    }

    #[test]
    fn test_load_from_environment() {
        std::env::set_var("NETX_TEST_ENV_URL", "https://env.example.org");
        std::env::set_var("NETX_TEST_ENV_USERNAME", "bob");
        std::env::set_var("NETX_TEST_ENV_PASSWORD", "pw");
        std::env::set_var("NETX_TEST_ENV_TIMEOUT_SECS", "30");

        let config = ClientConfig::load_with_prefix(None, "NETX_TEST_ENV").unwrap();

        assert_eq!(config.url.as_deref(), Some("https://env.example.org"));
        assert_eq!(config.username.as_deref(), Some("bob"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.assets_per_page, 10);
    }

    #[test]
    fn test_environment_credentials_are_kept_verbatim() {
        std::env::set_var("NETX_TEST_VERBATIM_USERNAME", "007");
        std::env::set_var("NETX_TEST_VERBATIM_PASSWORD", "0123");
        std::env::set_var("NETX_TEST_VERBATIM_URL", "TRUE");
        std::env::set_var("NETX_TEST_VERBATIM_ASSETS_PER_PAGE", "25");

        let config = ClientConfig::load_with_prefix(None, "NETX_TEST_VERBATIM").unwrap();

        assert_eq!(config.username.as_deref(), Some("007"));
        assert_eq!(config.password.as_deref(), Some("0123"));
        assert_eq!(config.url.as_deref(), Some("TRUE"));
        assert_eq!(config.assets_per_page, 25);

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.username(), "007");
        assert_eq!(credentials.password(), "0123");
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = ClientConfig::load_with_prefix(
            Some(Path::new("/nonexistent/netx.toml")),
            "NETX_TEST_MISSING",
        )
        .unwrap_err();

        assert!(matches!(err, crate::NetxError::Configuration(_)));
    }
}
