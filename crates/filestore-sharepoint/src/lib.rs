//! SharePoint backend for `filestore-core`.
//!
//! Authenticates once against a site, then lists, downloads, uploads (single-shot or
//! chunked) and deletes by server-relative path through the SharePoint REST API.
//!
//! ```no_run
//! use filestore_sharepoint::{SharePointOptions, SharePointStore, StaticCookieAuth};
//!
//! # async fn example() -> Result<(), filestore_core::StoreError> {
//! let options = SharePointOptions::new("https://contoso.sharepoint.com", "/sites/engineering");
//! let store = SharePointStore::create(options, &StaticCookieAuth::new("FedAuth=...")).await?;
//!
//! let listing = store.list_folder_contents("/Shared Documents").await?;
//! for file in &listing.files {
//!     println!("{} ({:?} bytes)", file.name, file.size_bytes);
//! }
//!
//! store.upload_large("/Shared Documents", "dump.bin", &vec![0u8; 1 << 20]).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod odata;
pub mod path;
pub mod session;
pub mod store;
pub mod upload;

#[cfg(test)]
mod test_support;

pub use auth::{AuthHeaders, AuthProvider, StaticCookieAuth};
pub use path::{validate_name, ServerRelativePath, SitePath};
pub use session::Session;
pub use store::{SharePointOptions, SharePointStore, DEFAULT_CHUNK_SIZE};
pub use upload::{plan_chunks, ChunkPlan, UploadSession};
