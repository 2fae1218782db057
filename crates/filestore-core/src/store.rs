use std::path::Path;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::listing::ListingResult;

/// Backend trait for a remote file store addressed by server-relative paths.
///
/// Implementations authenticate once at construction and reuse that session for
/// every call. Nothing is cached and nothing is retried.
#[async_trait]
pub trait RemoteFileStore: Send + Sync {
    /// List subfolders and files of a folder, newest first.
    async fn list_folder_contents(&self, folder_path: &str) -> Result<ListingResult, StoreError>;

    /// Download a file into memory.
    async fn download_as_buffer(&self, file_path: &str) -> Result<Vec<u8>, StoreError>;

    /// Download a file and write it to `local_path`.
    ///
    /// The local file is only written once the download has fully succeeded.
    async fn download_to_local(&self, file_path: &str, local_path: &Path) -> Result<(), StoreError>;

    /// Upload a buffer in a single request, overwriting any existing file.
    async fn upload_small(
        &self,
        folder_path: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<(), StoreError>;

    /// Upload a buffer through a chunked upload session.
    async fn upload_large(
        &self,
        folder_path: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<(), StoreError>;

    /// Create a folder. Fails if it already exists.
    async fn create_folder(&self, parent_path: &str, folder_name: &str) -> Result<(), StoreError>;

    /// Delete a file.
    async fn delete_file(&self, folder_path: &str, file_name: &str) -> Result<(), StoreError>;
}
