//! SharePoint implementation of `RemoteFileStore`.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use filestore_core::{ListingResult, RemoteFileStore, StoreError};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, instrument};

use crate::auth::AuthProvider;
use crate::odata::{FolderContents, Verbose};
use crate::path::{encode, odata_literal, validate_name, SitePath};
use crate::session::{Session, OCTET_STREAM};

/// Chunk size used by `upload_large` unless configured otherwise (100 MiB).
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(100 * 1024 * 1024) {
    Some(size) => size,
    None => unreachable!(),
};

/// Connection settings for a SharePoint site.
#[derive(Debug, Clone)]
pub struct SharePointOptions {
    /// Scheme and host, e.g. `https://contoso.sharepoint.com`
    pub base_url: String,
    /// Site path, e.g. `/sites/engineering`
    pub site_path: String,
    /// Chunk size for chunked uploads
    pub chunk_size: NonZeroUsize,
}

impl SharePointOptions {
    pub fn new(base_url: impl Into<String>, site_path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            site_path: site_path.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// `{base_url}{site_path}` with a single separator.
    pub fn site_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            SitePath::new(&self.site_path).prefix()
        )
    }
}

/// SharePoint REST client bound to one authenticated site session.
///
/// Cheap to clone; clones share the HTTP connection pool and the session.
#[derive(Debug, Clone)]
pub struct SharePointStore {
    pub(crate) http: Client,
    pub(crate) session: Arc<Session>,
    pub(crate) site: SitePath,
    pub(crate) chunk_size: NonZeroUsize,
}

impl SharePointStore {
    /// Authenticate and fetch a request digest for the configured site.
    pub async fn create(
        options: SharePointOptions,
        auth: &dyn AuthProvider,
    ) -> Result<Self, StoreError> {
        Self::create_with_client(Client::new(), options, auth).await
    }

    /// Same as `create`, reusing an existing HTTP client.
    pub async fn create_with_client(
        http: Client,
        options: SharePointOptions,
        auth: &dyn AuthProvider,
    ) -> Result<Self, StoreError> {
        let session = Session::establish(&http, &options.site_url(), auth).await?;
        Ok(Self {
            http,
            session: Arc::new(session),
            site: SitePath::new(&options.site_path),
            chunk_size: options.chunk_size,
        })
    }

    /// Authenticated session shared by every clone of this store.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    /// Send a request, mapping transport failures and non-success statuses to
    /// `StoreError::RemoteRequest`.
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::RemoteRequest {
                endpoint: url.to_string(),
                status: Some(status.as_u16()),
                message: body,
            });
        }

        Ok(response)
    }

    /// List subfolders and files of a folder, newest first.
    #[instrument(skip(self), level = "debug")]
    pub async fn list_folder_contents(
        &self,
        folder_path: &str,
    ) -> Result<ListingResult, StoreError> {
        let path = self.site.format(folder_path);
        let url = format!(
            "{}/GetFolderByServerRelativeUrl('{}')?$expand=Folders,Files",
            self.session.api_url(),
            odata_literal(path.as_str())
        );

        let response = self
            .send(self.http.get(&url).headers(self.session.headers()), &url)
            .await?;
        let contents: Verbose<FolderContents> = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("folder listing: {}", e)))?;

        let listing = ListingResult::new(
            contents.d.folders.results.into_iter().map(Into::into).collect(),
            contents.d.files.results.into_iter().map(Into::into).collect(),
        );
        debug!(
            "Listed {} folders and {} files in {}",
            listing.folders.len(),
            listing.files.len(),
            path
        );
        Ok(listing)
    }

    /// Download a file's raw content.
    #[instrument(skip(self), level = "debug")]
    pub async fn download_as_buffer(&self, file_path: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.site.format(file_path);
        let url = format!(
            "{}/GetFileByServerRelativeUrl('{}')/$value",
            self.session.api_url(),
            odata_literal(path.as_str())
        );

        let response = self
            .send(self.http.get(&url).headers(self.session.headers()), &url)
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, e))?;

        debug!("Downloaded {} bytes from {}", bytes.len(), path);
        Ok(bytes.to_vec())
    }

    /// Download a file, then write it to `local_path`. Nothing is written when the
    /// download fails.
    #[instrument(skip(self), level = "debug")]
    pub async fn download_to_local(
        &self,
        file_path: &str,
        local_path: &Path,
    ) -> Result<(), StoreError> {
        let data = self.download_as_buffer(file_path).await?;
        tokio::fs::write(local_path, &data).await?;
        debug!("Wrote {} bytes to {}", data.len(), local_path.display());
        Ok(())
    }

    /// Upload a buffer in one request, overwriting an existing file.
    #[instrument(skip(self, data), level = "debug", fields(data_len = data.len()))]
    pub async fn upload_small(
        &self,
        folder_path: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<(), StoreError> {
        validate_name(file_name)?;
        let path = self.site.format(folder_path);
        let url = format!(
            "{}/GetFolderByServerRelativePath(DecodedUrl='{}')/Files/AddUsingPath(DecodedUrl='{}',overwrite=true)",
            self.session.api_url(),
            odata_literal(path.as_str()),
            odata_literal(&encode(file_name))
        );

        self.send(
            self.http
                .post(&url)
                .headers(self.session.headers_with_content_type(OCTET_STREAM))
                .body(data.to_vec()),
            &url,
        )
        .await?;

        debug!("Uploaded {} ({} bytes) to {}", file_name, data.len(), path);
        Ok(())
    }

    /// Create a folder; an existing folder is reported as a remote error.
    #[instrument(skip(self), level = "debug")]
    pub async fn create_folder(
        &self,
        parent_path: &str,
        folder_name: &str,
    ) -> Result<(), StoreError> {
        validate_name(folder_name)?;
        let path = self.site.format(parent_path).join(folder_name);
        let url = format!(
            "{}/folders/AddUsingPath(DecodedUrl='{}',overwrite=false)",
            self.session.api_url(),
            odata_literal(path.as_str())
        );

        self.send(
            self.http
                .post(&url)
                .headers(self.session.headers())
                .body("{}"),
            &url,
        )
        .await?;

        debug!("Created folder {}", path);
        Ok(())
    }

    /// Delete a file.
    #[instrument(skip(self), level = "debug")]
    pub async fn delete_file(&self, folder_path: &str, file_name: &str) -> Result<(), StoreError> {
        validate_name(file_name)?;
        let path = self.site.format(folder_path).join(file_name);
        let url = format!(
            "{}/GetFileByServerRelativeUrl('{}')",
            self.session.api_url(),
            odata_literal(path.as_str())
        );

        self.send(
            self.http.delete(&url).headers(self.session.headers()),
            &url,
        )
        .await?;

        debug!("Deleted {}", path);
        Ok(())
    }
}

pub(crate) fn transport_error(url: &str, error: reqwest::Error) -> StoreError {
    StoreError::RemoteRequest {
        endpoint: url.to_string(),
        status: error.status().map(|s| s.as_u16()),
        message: error.to_string(),
    }
}

#[async_trait]
impl RemoteFileStore for SharePointStore {
    async fn list_folder_contents(&self, folder_path: &str) -> Result<ListingResult, StoreError> {
        SharePointStore::list_folder_contents(self, folder_path).await
    }

    async fn download_as_buffer(&self, file_path: &str) -> Result<Vec<u8>, StoreError> {
        SharePointStore::download_as_buffer(self, file_path).await
    }

    async fn download_to_local(&self, file_path: &str, local_path: &Path) -> Result<(), StoreError> {
        SharePointStore::download_to_local(self, file_path, local_path).await
    }

    async fn upload_small(
        &self,
        folder_path: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<(), StoreError> {
        SharePointStore::upload_small(self, folder_path, file_name, data).await
    }

    async fn upload_large(
        &self,
        folder_path: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<(), StoreError> {
        SharePointStore::upload_large(self, folder_path, file_name, data).await
    }

    async fn create_folder(&self, parent_path: &str, folder_name: &str) -> Result<(), StoreError> {
        SharePointStore::create_folder(self, parent_path, folder_name).await
    }

    async fn delete_file(&self, folder_path: &str, file_name: &str) -> Result<(), StoreError> {
        SharePointStore::delete_file(self, folder_path, file_name).await
    }
}
