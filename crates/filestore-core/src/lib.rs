//! Core traits and types for remote file store backends.
//!
//! This crate defines the abstractions shared between store implementations:
//! - `RemoteFileStore`: folder listing, download, upload, folder creation and deletion
//! - `ListingResult`: folders and files of one remote folder, newest first
//! - `StoreError`: the error taxonomy every backend reports through

mod error;
mod listing;
mod store;

pub use error::StoreError;
pub use listing::{FileEntry, FolderEntry, ListingResult};
pub use store::RemoteFileStore;
