//! Simple SDK Example
//!
//! Demonstrates basic usage of the NetX SDK.
//!
//! # Usage
//!
//! ```bash
//! NETX_URL=https://dam.example.org NETX_USERNAME=alice NETX_PASSWORD=... \
//!     cargo run -p netx-sdk --example simple -- portrait
//! ```

use netx_sdk::{ClientConfig, FileVariant, NetxClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let keyword = std::env::args().nth(1).unwrap_or_else(|| "test".to_string());

    println!("NetX SDK - Simple Example");
    println!("=========================\n");

    // 1. Build the client from NETX_* variables
    let client = NetxClient::new(ClientConfig::load(None)?)?;

    // 2. Who are we?
    let user = client.user().await?;
    println!("1. Logged in as {}", user.get("login").unwrap_or(&"?".into()));

    // 3. Top-level categories
    println!("\n2. Top-level categories:");
    for category in client.categories(1).await? {
        println!("   - [{}] {}", category.id, category.name);
    }

    // 4. Search
    println!("\n3. Searching for '{}'...", keyword);
    let assets = client.search(&keyword, 1, None).await?;
    println!("   {} assets on page 1", assets.len());

    // 5. Detail + thumbnail of the first hit
    let first = assets
        .first()
        .and_then(|asset| asset.get("assetId"))
        .and_then(|id| id.as_i64());
    if let Some(asset_id) = first {
        let info = client.get_asset_info(asset_id).await?;
        println!("\n4. Asset {} has {} attributes", asset_id, info.attributes.len());
        for (name, value) in info.attributes.iter().take(5) {
            println!("   {}: {}", name, value);
        }

        let thumb = client.file(asset_id, FileVariant::Thumb).await?;
        println!(
            "\n5. Thumbnail: {} bytes ({})",
            thumb.content.len(),
            thumb.content_type().unwrap_or("unknown type")
        );
    }

    println!("\nDone.");

    Ok(())
}
