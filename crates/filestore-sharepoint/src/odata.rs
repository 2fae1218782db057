//! Response shapes of the SharePoint REST API (OData verbose JSON).

use chrono::{DateTime, NaiveDateTime, Utc};
use filestore_core::{FileEntry, FolderEntry};
use serde::{Deserialize, Deserializer};

/// Verbose OData wraps every payload in `{ "d": ... }`.
#[derive(Debug, Deserialize)]
pub struct Verbose<T> {
    pub d: T,
}

/// Expanded collection: `{ "results": [...] }`.
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContextInfo {
    pub get_context_web_information: WebInformation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebInformation {
    pub form_digest_value: String,
}

/// Folder with its `Folders` and `Files` collections expanded.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FolderContents {
    pub folders: Collection<FolderItem>,
    pub files: Collection<FileItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FolderItem {
    pub name: String,
    #[serde(default)]
    pub server_relative_url: String,
    #[serde(deserialize_with = "timestamp")]
    pub time_created: DateTime<Utc>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub time_last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub item_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileItem {
    pub name: String,
    #[serde(default)]
    pub server_relative_url: String,
    #[serde(deserialize_with = "timestamp")]
    pub time_created: DateTime<Utc>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub time_last_modified: Option<DateTime<Utc>>,
    /// Verbose OData serializes Int64 as a string.
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub unique_id: Option<String>,
}

/// Parse an RFC 3339 timestamp, or one without an offset which is read as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", value)))
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => parse_timestamp(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", value))),
        None => Ok(None),
    }
}

impl From<FolderItem> for FolderEntry {
    fn from(item: FolderItem) -> Self {
        FolderEntry {
            name: item.name,
            server_relative_url: item.server_relative_url,
            time_created: item.time_created,
            time_last_modified: item.time_last_modified,
            item_count: item.item_count,
        }
    }
}

impl From<FileItem> for FileEntry {
    fn from(item: FileItem) -> Self {
        FileEntry {
            name: item.name,
            server_relative_url: item.server_relative_url,
            time_created: item.time_created,
            time_last_modified: item.time_last_modified,
            size_bytes: item.length.as_deref().and_then(|s| s.parse::<u64>().ok()),
            unique_id: item.unique_id,
        }
    }
}
