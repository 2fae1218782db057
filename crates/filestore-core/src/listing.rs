use chrono::{DateTime, Utc};
use serde::Serialize;

/// A folder inside a listed remote folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderEntry {
    /// Folder name
    pub name: String,
    /// Server-relative URL of the folder
    pub server_relative_url: String,
    /// Creation timestamp
    pub time_created: DateTime<Utc>,
    /// Last modification timestamp (if reported)
    pub time_last_modified: Option<DateTime<Utc>>,
    /// Number of items directly inside the folder (if reported)
    pub item_count: Option<u64>,
}

/// A file inside a listed remote folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntry {
    /// File name
    pub name: String,
    /// Server-relative URL of the file
    pub server_relative_url: String,
    /// Creation timestamp
    pub time_created: DateTime<Utc>,
    /// Last modification timestamp (if reported)
    pub time_last_modified: Option<DateTime<Utc>>,
    /// Size in bytes (if reported)
    pub size_bytes: Option<u64>,
    /// Provider-specific unique identifier
    pub unique_id: Option<String>,
}

/// Contents of one remote folder.
///
/// Both sequences are ordered by creation time, newest first, once produced by a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingResult {
    pub folders: Vec<FolderEntry>,
    pub files: Vec<FileEntry>,
}

impl ListingResult {
    /// Build a listing and order both sequences newest first.
    pub fn new(folders: Vec<FolderEntry>, files: Vec<FileEntry>) -> Self {
        let mut listing = Self { folders, files };
        listing.sort_newest_first();
        listing
    }

    /// Stable sort of both sequences by creation time, descending.
    pub fn sort_newest_first(&mut self) {
        self.folders.sort_by(|a, b| b.time_created.cmp(&a.time_created));
        self.files.sort_by(|a, b| b.time_created.cmp(&a.time_created));
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn file(name: &str, secs: i64) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            server_relative_url: format!("/sites/demo/Docs/{}", name),
            time_created: Utc.timestamp_opt(secs, 0).unwrap(),
            time_last_modified: None,
            size_bytes: Some(1),
            unique_id: None,
        }
    }

    fn folder(name: &str, secs: i64) -> FolderEntry {
        FolderEntry {
            name: name.to_string(),
            server_relative_url: format!("/sites/demo/Docs/{}", name),
            time_created: Utc.timestamp_opt(secs, 0).unwrap(),
            time_last_modified: None,
            item_count: None,
        }
    }

    #[test]
    fn test_sorted_newest_first() {
        let listing = ListingResult::new(
            vec![folder("a", 10), folder("b", 30), folder("c", 20)],
            vec![file("x", 5), file("y", 500), file("z", 50)],
        );

        let folder_names: Vec<_> = listing.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(folder_names, vec!["b", "c", "a"]);

        let file_names: Vec<_> = listing.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(file_names, vec!["y", "z", "x"]);

        assert!(listing
            .files
            .windows(2)
            .all(|w| w[0].time_created >= w[1].time_created));
    }

    #[test]
    fn test_ties_are_stable() {
        let listing = ListingResult::new(
            vec![],
            vec![file("first", 100), file("second", 100), file("newer", 200)],
        );
        let names: Vec<_> = listing.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["newer", "first", "second"]);
    }

    #[test]
    fn test_empty_listing() {
        let listing = ListingResult::new(vec![], vec![]);
        assert!(listing.is_empty());
    }

    #[test]
    fn test_serializes_timestamps_as_rfc3339() {
        let listing = ListingResult::new(vec![folder("a", 0)], vec![]);
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["folders"][0]["time_created"], "1970-01-01T00:00:00Z");
        assert_eq!(json["files"], serde_json::json!([]));
    }
}
