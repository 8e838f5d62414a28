//! SDK Result Types
//!
//! Reshaped server records returned by [`crate::NetxClient`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{NetxError, Result};

/// Untyped server record (asset search hits, user records)
pub type Record = Map<String, Value>;

/// Sub-category entry from `getCategories`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    pub children: Value,
}

/// Category as the server sends it
#[derive(Debug, Deserialize)]
pub(crate) struct RawCategory {
    pub categoryid: i64,
    pub parentid: i64,
    pub name: String,
    #[serde(default)]
    pub children: Value,
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        Self {
            id: raw.categoryid,
            parent_id: raw.parentid,
            name: raw.name,
            children: raw.children,
        }
    }
}

/// One step of a category path, root first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPathEntry {
    pub id: i64,
    pub name: String,
}

impl CategoryPathEntry {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Path string used by category searches: names joined by `/`, root excluded
pub fn category_search_path(path: &[CategoryPathEntry]) -> String {
    path.iter()
        .skip(1)
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Cart from `getUserCarts`
///
/// Only the id is required; name and count may be missing or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub cart_id: i64,
    #[serde(default)]
    pub cart_name: Option<String>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(flatten)]
    pub extra: Record,
}

/// Asset detail record from `getAssetBean`
///
/// `attributes` pairs the server's `attributeNames` and `attributeValues`
/// positionally, in server order; the two source fields are removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetInfo {
    #[serde(flatten)]
    pub fields: Record,
    pub attributes: Map<String, Value>,
}

impl AssetInfo {
    /// Reshape a raw `getAssetBean` result
    ///
    /// Fails if either sequence is missing or their lengths differ.
    pub fn from_record(mut fields: Record) -> Result<Self> {
        let names = take_array(&mut fields, "attributeNames")?;
        let values = take_array(&mut fields, "attributeValues")?;

        if names.len() != values.len() {
            return Err(NetxError::malformed(format!(
                "attributeNames has {} entries but attributeValues has {}",
                names.len(),
                values.len()
            )));
        }

        let mut attributes = Map::new();
        for (name, value) in names.into_iter().zip(values) {
            let name = match name {
                Value::String(name) => name,
                other => other.to_string(),
            };
            attributes.insert(name, value);
        }

        Ok(Self { fields, attributes })
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn asset_id(&self) -> Option<i64> {
        self.fields.get("assetId").and_then(Value::as_i64)
    }
}

fn take_array(fields: &mut Record, key: &str) -> Result<Vec<Value>> {
    match fields.remove(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(NetxError::malformed(format!(
            "{} is not an array: {}",
            key, other
        ))),
        None => Err(NetxError::malformed(format!("{} is missing", key))),
    }
}

/// Rendition served by the file endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileVariant {
    /// The asset's original file
    Original,
    /// 150 pixel thumbnail
    Thumb,
    /// 500 pixel preview
    Preview,
    /// Zoom file (2000 pixels by default)
    #[default]
    Zoom,
}

impl FileVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileVariant::Original => "original",
            FileVariant::Thumb => "thumb",
            FileVariant::Preview => "preview",
            FileVariant::Zoom => "zoom",
        }
    }
}

impl fmt::Display for FileVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "original" => Ok(FileVariant::Original),
            "thumb" => Ok(FileVariant::Thumb),
            "preview" => Ok(FileVariant::Preview),
            "zoom" => Ok(FileVariant::Zoom),
            other => Err(format!(
                "unknown file variant '{}' (expected original, thumb, preview or zoom)",
                other
            )),
        }
    }
}

/// Downloaded file: response headers and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownload {
    pub headers: Vec<(String, String)>,
    pub content: Vec<u8>,
}

impl FileDownload {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length").and_then(|v| v.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_asset_info_zips_attributes_in_server_order() {
        let info = AssetInfo::from_record(record(json!({
            "assetId": 9,
            "name": "portrait.tif",
            "attributeNames": ["Copyright", "Artwork Image View", "Credit Line"],
            "attributeValues": ["(c) Estate", "Front", "Gift of X"],
        })))
        .unwrap();

        assert!(!info.fields.contains_key("attributeNames"));
        assert!(!info.fields.contains_key("attributeValues"));
        assert_eq!(info.asset_id(), Some(9));
        assert_eq!(info.attribute("Artwork Image View"), Some(&json!("Front")));

        let names: Vec<&str> = info.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Copyright", "Artwork Image View", "Credit Line"]);
    }

    #[test]
    fn test_asset_info_rejects_length_mismatch() {
        let err = AssetInfo::from_record(record(json!({
            "attributeNames": ["a", "b"],
            "attributeValues": ["1"],
        })))
        .unwrap_err();

        assert!(matches!(err, NetxError::MalformedResponse(_)));
    }

    #[test]
    fn test_asset_info_requires_both_sequences() {
        let err = AssetInfo::from_record(record(json!({"attributeNames": []}))).unwrap_err();
        assert!(matches!(err, NetxError::MalformedResponse(_)));
    }

    #[test]
    fn test_category_search_path_skips_root() {
        let path = vec![
            CategoryPathEntry::new(1, "netx"),
            CategoryPathEntry::new(10, "Artworks"),
            CategoryPathEntry::new(14, "Artists M-Q"),
        ];
        assert_eq!(category_search_path(&path), "Artworks/Artists M-Q");
        assert_eq!(category_search_path(&path[..1]), "");
    }

    #[test]
    fn test_file_variant_parsing() {
        assert_eq!("thumb".parse::<FileVariant>().unwrap(), FileVariant::Thumb);
        assert_eq!(FileVariant::default().as_str(), "zoom");
        assert!("huge".parse::<FileVariant>().is_err());
    }

    #[test]
    fn test_cart_keeps_unknown_fields() {
        let cart: Cart = serde_json::from_value(json!({
            "cartId": 3,
            "cartName": "Press kit",
            "count": 12,
            "shared": true,
        }))
        .unwrap();

        assert_eq!(cart.cart_id, 3);
        assert_eq!(cart.cart_name.as_deref(), Some("Press kit"));
        assert_eq!(cart.count, Some(12));
        assert_eq!(cart.extra["shared"], true);
    }

    #[test]
    fn test_cart_tolerates_null_name_and_missing_count() {
        let carts: Vec<Cart> = serde_json::from_value(json!([
            {"cartId": 3, "cartName": null},
            {"cartId": 4},
        ]))
        .unwrap();

        assert_eq!(carts[0].cart_name, None);
        assert_eq!(carts[1].cart_name, None);
        assert_eq!(carts[1].count, None);
    }
}
