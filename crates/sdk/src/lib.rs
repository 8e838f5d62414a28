//! NetX SDK - Rust Client Library
//!
//! Typed client for the NetX digital asset management JSON-RPC API.
//!
//! # Example
//!
//! ```no_run
//! use netx_sdk::{ClientConfig, FileVariant, NetxClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Settings from netx.toml and NETX_* variables
//!     let config = ClientConfig::load(Some(std::path::Path::new("netx.toml")))?;
//!     let client = NetxClient::new(config)?;
//!
//!     for category in client.categories(1).await? {
//!         println!("{} {}", category.id, category.name);
//!     }
//!
//!     let assets = client.search("portrait", 1, None).await?;
//!     if let Some(id) = assets.first().and_then(|a| a.get("assetId")).and_then(|v| v.as_i64()) {
//!         let file = client.file(id, FileVariant::Preview).await?;
//!         println!("downloaded {} bytes", file.content.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
pub mod protocol;
mod search;
mod types;

pub use client::NetxClient;
pub use crate::config::{ClientConfig, ENV_PREFIX};
pub use error::{NetxError, Result};
pub use search::{start_index, SearchFilter, SearchFilters, SearchQuery};
pub use types::{
    category_search_path, AssetInfo, Cart, Category, CategoryPathEntry, FileDownload,
    FileVariant, Record,
};

pub use netx_core::domain::User;
