//! NetX Client Implementation

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use netx_core::domain::User;
use netx_core::port::{NonceProvider, RandomNonceProvider, Transport};
use netx_core::RpcExecutor;
use netx_infra_http::HttpTransport;

use crate::config::ClientConfig;
use crate::error::{NetxError, Result};
use crate::protocol::method;
use crate::search::{SearchFilters, SearchQuery};
use crate::types::{
    category_search_path, AssetInfo, Cart, Category, CategoryPathEntry, FileDownload, FileVariant,
    RawCategory, Record,
};

/// NetX DAM Client
///
/// Typed helpers over the authenticated JSON-RPC executor. The session is
/// established lazily on the first call and re-established transparently
/// when the server rejects a stale one.
///
/// # Example
///
/// ```no_run
/// use netx_sdk::{ClientConfig, NetxClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = NetxClient::new(ClientConfig::new("https://dam.example.org", "alice", "secret"))?;
/// let assets = client.search("cat", 1, None).await?;
/// println!("{} assets", assets.len());
/// # Ok(())
/// # }
/// ```
pub struct NetxClient {
    config: ClientConfig,
    executor: RpcExecutor,
}

impl NetxClient {
    /// Create a client over HTTP
    ///
    /// Only fails if the HTTP client cannot be built; missing URL or
    /// credentials are reported by the first call.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self::from_parts(config, transport, Arc::new(RandomNonceProvider))
    }

    pub fn from_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        nonces: Arc<dyn NonceProvider>,
    ) -> Self {
        let executor = RpcExecutor::new(config.api_url(), config.credentials(), transport, nonces);
        Self { config, executor }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn assets_per_page(&self) -> u32 {
        self.config.assets_per_page
    }

    /// Underlying executor, for methods without a typed helper
    pub fn executor(&self) -> &RpcExecutor {
        &self.executor
    }

    /// Raw RPC call
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        self.executor.call(method, params).await
    }

    /// Authenticate and return a new session key (not cached)
    ///
    /// Rejected credentials yield `NetxError::Configuration`.
    pub async fn login(&self) -> Result<String> {
        self.executor.login().await
    }

    /// Cached session key
    pub async fn session_key(&self) -> Result<String> {
        self.executor.session_key().await
    }

    /// Cached user record of the session
    pub async fn user(&self) -> Result<User> {
        self.executor.user().await
    }

    /// Fetch the authenticated user's record from the server
    pub async fn get_user(&self) -> Result<User> {
        match self.call(method::GET_SELF, vec![]).await? {
            Value::Object(user) => Ok(user),
            other => Err(NetxError::malformed(format!(
                "getSelf returned {} instead of a user record",
                other
            ))),
        }
    }

    /// List the sub-categories of `category_id` (1 is the root)
    pub async fn categories(&self, category_id: i64) -> Result<Vec<Category>> {
        let keyword = ""; // Unused by the server
        let result = self
            .call(method::GET_CATEGORIES, vec![json!(keyword), json!(category_id)])
            .await?;

        let raw: Vec<RawCategory> = parse_list(method::GET_CATEGORIES, result)?;
        raw.into_iter()
            .map(|category| {
                if category.parentid != category_id {
                    return Err(NetxError::malformed(format!(
                        "category {} has parent {}, expected {}",
                        category.categoryid, category.parentid, category_id
                    )));
                }
                Ok(Category::from(category))
            })
            .collect()
    }

    /// Assets filed in the category at the end of `category_path`
    ///
    /// `category_path` starts at the root category. Results are paginated.
    pub async fn category_assets(
        &self,
        category_path: &[CategoryPathEntry],
        page: u32,
        filters: Option<SearchFilters>,
    ) -> Result<Vec<Record>> {
        let filters =
            filters.unwrap_or_else(|| SearchFilters::category(&category_search_path(category_path)));
        self.search_assets(filters, page).await
    }

    /// Carts available to the current user
    pub async fn carts(&self) -> Result<Vec<Cart>> {
        let user = self.user().await?;
        let user_id = user
            .get("userId")
            .cloned()
            .ok_or_else(|| NetxError::malformed("user record has no userId"))?;

        let result = self
            .call(method::GET_USER_CARTS, vec![user_id, json!("all")])
            .await?;
        parse_list(method::GET_USER_CARTS, result)
    }

    /// Assets in a cart. Results are paginated.
    pub async fn cart_assets(
        &self,
        cart_id: i64,
        page: u32,
        filters: Option<SearchFilters>,
    ) -> Result<Vec<Record>> {
        let filters = filters.unwrap_or_else(|| SearchFilters::cart(cart_id));
        self.search_assets(filters, page).await
    }

    /// Keyword search (keyword + thesaurus). Results are paginated.
    pub async fn search(
        &self,
        keyword: &str,
        page: u32,
        filters: Option<SearchFilters>,
    ) -> Result<Vec<Record>> {
        let filters = filters.unwrap_or_else(|| SearchFilters::keyword(keyword));
        self.search_assets(filters, page).await
    }

    /// Run a `searchAssetBeanObjects` query with this client's page size
    pub async fn search_assets(&self, filters: SearchFilters, page: u32) -> Result<Vec<Record>> {
        let query = SearchQuery::new(filters, page, self.config.assets_per_page);
        debug!(
            start_index = query.start_index,
            count = query.count,
            filters = query.filters.len(),
            "Searching assets"
        );

        let result = self
            .call(method::SEARCH_ASSET_BEAN_OBJECTS, query.to_params())
            .await?;
        parse_list(method::SEARCH_ASSET_BEAN_OBJECTS, result)
    }

    /// Asset detail with attributes reshaped into a name → value mapping
    pub async fn get_asset_info(&self, asset_id: i64) -> Result<AssetInfo> {
        match self.call(method::GET_ASSET_BEAN, vec![json!(asset_id)]).await? {
            Value::Object(record) => AssetInfo::from_record(record),
            other => Err(NetxError::malformed(format!(
                "getAssetBean returned {} instead of an asset record",
                other
            ))),
        }
    }

    /// Download a rendition of an asset
    pub async fn file(&self, asset_id: i64, variant: FileVariant) -> Result<FileDownload> {
        let root = self
            .config
            .root_url()
            .ok_or_else(|| NetxError::Configuration("URL is not set in settings.".to_string()))?;
        let url = format!("{}/file/asset/{}/{}", root, asset_id, variant);

        let reply = self.executor.download(&url).await?;
        Ok(FileDownload {
            headers: reply.headers,
            content: reply.body,
        })
    }
}

/// Decode a list result; `null` is an empty list
fn parse_list<T: DeserializeOwned>(method: &str, result: Value) -> Result<Vec<T>> {
    if result.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(result)
        .map_err(|e| NetxError::malformed(format!("unexpected {} result: {}", method, e)))
}
