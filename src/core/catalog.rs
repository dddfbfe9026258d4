//! Catalog loading and parsing

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use crate::core::links::is_http;
use crate::error::{Result, VidshelfError};
use crate::types::VideoRecord;

/// Where the catalog comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// http(s) strings become URLs, anything else a file path
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if is_http(source) {
            Self::Url(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Raw records as loaded, before any cleaning
#[derive(Debug, Clone)]
pub struct Catalog {
    pub records: Vec<VideoRecord>,
    pub fetched_at: DateTime<Utc>,
}

fn string_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// Read one record, treating wrong-typed fields as absent
pub fn parse_record(value: &Value) -> VideoRecord {
    let categories = value.get("categories").and_then(|c| c.as_array()).map(|items| {
        items
            .iter()
            .filter_map(|c| c.as_str())
            .map(str::to_string)
            .collect()
    });

    VideoRecord {
        title: string_field(value, "title"),
        thumbnail: string_field(value, "thumbnail"),
        detail_url: string_field(value, "detail_url"),
        external_url: string_field(value, "external_url"),
        categories,
    }
}

/// Records of a parsed document; anything but an array yields none
pub fn parse_records(doc: &Value) -> Vec<VideoRecord> {
    let Some(items) = doc.as_array() else {
        warn!(kind = json_kind(doc), "catalog is not an array");
        return Vec::new();
    };
    items.iter().map(parse_record).collect()
}

/// Parse catalog text
pub fn parse_catalog(text: &str) -> Result<Vec<VideoRecord>> {
    let doc: Value = serde_json::from_str(text)?;
    Ok(parse_records(&doc))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Fetch catalog text over HTTP
async fn fetch_catalog_text(url: &str, timeout: Duration) -> Result<String> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(VidshelfError::Network(format!(
            "HTTP {}: {}",
            response.status(),
            url
        )));
    }

    Ok(response.text().await?)
}

/// Load and parse a catalog
pub async fn load_catalog(source: &CatalogSource, timeout: Duration) -> Result<Catalog> {
    let text = match source {
        CatalogSource::File(path) => fs::read_to_string(path).await?,
        CatalogSource::Url(url) => fetch_catalog_text(url, timeout).await?,
    };

    let records = parse_catalog(&text).map_err(|e| {
        VidshelfError::CatalogParse(format!("{}: {}", source, e))
    })?;
    debug!(%source, records = records.len(), "catalog_loaded");

    Ok(Catalog {
        records,
        fetched_at: Utc::now(),
    })
}
