//! NetX CLI - Command-line interface for the NetX DAM client

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use netx_sdk::{ClientConfig, FileVariant, NetxClient, Record, SearchFilters};

#[derive(Parser)]
#[command(name = "netx")]
#[command(about = "NetX Digital Asset Management CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML); NETX_* environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server root URL
    #[arg(long, global = true)]
    url: Option<String>,

    #[arg(short, long, global = true)]
    username: Option<String>,

    #[arg(long, global = true, env = "NETX_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Assets per page
    #[arg(long, global = true)]
    page_size: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate and print a new session key
    Login,

    /// Show the authenticated user record
    Whoami,

    /// List sub-categories
    Categories {
        /// Parent category ID (1 = top level)
        #[arg(short, long, default_value = "1")]
        parent: i64,
    },

    /// List assets in a category
    Category {
        /// Category path below the root, e.g. "Artworks/Artists M-Q"
        path: String,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Search assets by keyword
    Search {
        keyword: String,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// List carts of the current user
    Carts,

    /// List assets in a cart
    Cart {
        cart_id: i64,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Show asset details and attributes
    Asset { asset_id: i64 },

    /// Download an asset file
    Download {
        asset_id: i64,

        /// original, thumb, preview or zoom
        #[arg(short, long, default_value = "zoom")]
        variant: FileVariant,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Tabled)]
struct CategoryRow {
    id: i64,
    name: String,
    children: String,
}

#[derive(Tabled)]
struct AssetRow {
    id: String,
    name: String,
    #[tabled(rename = "type")]
    file_type: String,
    size: String,
}

impl From<&Record> for AssetRow {
    fn from(asset: &Record) -> Self {
        Self {
            id: field(asset, "assetId"),
            name: field(asset, "name"),
            file_type: field(asset, "filetypelabel"),
            size: field(asset, "filesize"),
        }
    }
}

#[derive(Tabled)]
struct CartRow {
    id: i64,
    name: String,
    count: i64,
}

#[derive(Tabled)]
struct AttributeRow {
    attribute: String,
    value: String,
}

fn field(record: &Record, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

const DEFAULT_LOG_FILTER: &str = "netx=info,netx_core=info,netx_sdk=info";

fn init_logging() -> Result<()> {
    let log_format = std::env::var("NETX_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config =
        ClientConfig::load(cli.config.as_deref()).context("Failed to load NetX settings")?;

    if let Some(url) = &cli.url {
        config.url = Some(url.clone());
    }
    if let Some(username) = &cli.username {
        config.username = Some(username.clone());
    }
    if let Some(password) = &cli.password {
        config.password = Some(password.clone());
    }
    if let Some(page_size) = cli.page_size {
        config.assets_per_page = page_size;
    }

    Ok(config)
}

fn print_assets(assets: &[Record], page: u32) {
    if assets.is_empty() {
        println!("{}", "No assets found".yellow());
        return;
    }

    println!(
        "{}",
        format!("{} assets (page {})", assets.len(), page).cyan().bold()
    );
    let rows: Vec<AssetRow> = assets.iter().map(AssetRow::from).collect();
    println!("{}", Table::new(rows));
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    debug!(?config, "Resolved settings");

    let client = NetxClient::new(config).context("Failed to create client")?;

    match cli.command {
        Commands::Login => {
            let session_key = client.login().await.context("Login failed")?;
            println!("{}", "✓ Authenticated".green().bold());
            println!("  {} {}", "Session key:".bold(), session_key);
        }

        Commands::Whoami => {
            let user = client.user().await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }

        Commands::Categories { parent } => {
            let categories = client.categories(parent).await?;
            if categories.is_empty() {
                println!("{}", "No sub-categories".yellow());
            } else {
                let rows: Vec<CategoryRow> = categories
                    .into_iter()
                    .map(|c| CategoryRow {
                        id: c.id,
                        name: c.name,
                        children: c.children.to_string(),
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Category { path, page } => {
            let assets = client
                .search_assets(SearchFilters::category(&path), page)
                .await?;
            print_assets(&assets, page);
        }

        Commands::Search { keyword, page } => {
            let assets = client.search(&keyword, page, None).await?;
            print_assets(&assets, page);
        }

        Commands::Carts => {
            let carts = client.carts().await?;
            if carts.is_empty() {
                println!("{}", "No carts".yellow());
            } else {
                let rows: Vec<CartRow> = carts
                    .into_iter()
                    .map(|c| CartRow {
                        id: c.cart_id,
                        name: c.cart_name.unwrap_or_default(),
                        count: c.count.unwrap_or_default(),
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Cart { cart_id, page } => {
            let assets = client.cart_assets(cart_id, page, None).await?;
            print_assets(&assets, page);
        }

        Commands::Asset { asset_id } => {
            let info = client.get_asset_info(asset_id).await?;

            println!("{}", format!("Asset {}", asset_id).cyan().bold());
            for (key, value) in &info.fields {
                println!("  {} {}", format!("{}:", key).bold(), value);
            }
            println!();

            let rows: Vec<AttributeRow> = info
                .attributes
                .iter()
                .map(|(name, value)| AttributeRow {
                    attribute: name.clone(),
                    value: match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    },
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::Download {
            asset_id,
            variant,
            output,
        } => {
            let download = client.file(asset_id, variant).await?;
            tokio::fs::write(&output, &download.content)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!(
                "{} {} bytes → {}",
                "✓".green(),
                download.content.len(),
                output.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["netx", "search", "cat", "--page", "2"]).unwrap();
        match cli.command {
            Commands::Search { keyword, page } => {
                assert_eq!(keyword, "cat");
                assert_eq!(page, 2);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_download_variant() {
        let cli = Cli::try_parse_from([
            "netx", "download", "42", "--variant", "thumb", "--output", "out.jpg",
        ])
        .unwrap();
        match cli.command {
            Commands::Download { asset_id, variant, .. } => {
                assert_eq!(asset_id, 42);
                assert_eq!(variant, FileVariant::Thumb);
            }
            _ => panic!("expected download"),
        }
    }

    #[test]
    fn test_rejects_unknown_variant() {
        let result = Cli::try_parse_from([
            "netx", "download", "42", "--variant", "huge", "--output", "out.jpg",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_log_filter_parses() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        assert!(filter.to_string().contains("netx=info"));
    }

    #[test]
    fn test_asset_row_formats_fields() {
        let asset = match json!({"assetId": 5, "name": "a.jpg", "filesize": 1024}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let row = AssetRow::from(&asset);

        assert_eq!(row.id, "5");
        assert_eq!(row.name, "a.jpg");
        assert_eq!(row.file_type, "");
        assert_eq!(row.size, "1024");
    }
}
