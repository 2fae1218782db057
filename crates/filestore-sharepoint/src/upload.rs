//! Chunked upload through a SharePoint upload session.
//!
//! Three phases against one client-chosen upload id:
//! 1. `StartUploadFile` creates an empty stub at the target and opens the session.
//! 2. `ContinueUpload` is posted once per chunk, in order, with the chunk's start offset.
//! 3. `FinishUpload` closes the session at the start offset of the last chunk.
//!
//! Chunks are never sent concurrently: the server tracks a single offset per session.
//! A failed call leaves the partial upload orphaned on the server; a retry starts over
//! with a fresh id.

use std::num::NonZeroUsize;
use std::ops::Range;

use filestore_core::StoreError;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::path::{encode, odata_literal, validate_name, ServerRelativePath};
use crate::session::OCTET_STREAM;
use crate::store::SharePointStore;

/// Byte ranges to send and the offset reported when finishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    pub chunks: Vec<Range<usize>>,
    pub finish_offset: usize,
}

/// Split `total` bytes into consecutive chunks of at most `chunk_size` bytes.
///
/// The finish offset is `total - last_chunk_len`, i.e. where the last chunk starts.
pub fn plan_chunks(total: usize, chunk_size: NonZeroUsize) -> ChunkPlan {
    let size = chunk_size.get();
    let chunks: Vec<Range<usize>> = (0..total)
        .step_by(size)
        .map(|start| start..start.saturating_add(size).min(total))
        .collect();
    let last_len = chunks.last().map(|c| c.len()).unwrap_or(0);
    ChunkPlan {
        chunks,
        finish_offset: total - last_len,
    }
}

/// State of one in-flight chunked upload. Lives only for the duration of the call.
#[derive(Debug)]
pub struct UploadSession {
    id: Uuid,
    folder: ServerRelativePath,
    file_name: String,
    offset: usize,
}

impl UploadSession {
    pub fn new(folder: ServerRelativePath, file_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            folder,
            file_name: file_name.to_string(),
            offset: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Bytes acknowledged so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn file_path(&self) -> ServerRelativePath {
        self.folder.join(&self.file_name)
    }

    fn start_url(&self, api_url: &str) -> String {
        format!(
            "{}/GetFolderByServerRelativePath(DecodedUrl='{}')/Files/AddStubUsingPath(DecodedUrl='{}')/StartUploadFile(uploadId='{}')",
            api_url,
            odata_literal(self.folder.as_str()),
            odata_literal(&encode(&self.file_name)),
            self.id
        )
    }

    fn continue_url(&self, api_url: &str) -> String {
        format!(
            "{}/GetFileByServerRelativePath(DecodedUrl='{}')/ContinueUpload(uploadId='{}',fileOffset='{}')",
            api_url,
            odata_literal(self.file_path().as_str()),
            self.id,
            self.offset
        )
    }

    fn finish_url(&self, api_url: &str, finish_offset: usize) -> String {
        format!(
            "{}/GetFileByServerRelativePath(DecodedUrl='{}')/FinishUpload(uploadId='{}',fileOffset='{}')",
            api_url,
            odata_literal(self.file_path().as_str()),
            self.id,
            finish_offset
        )
    }

    fn advance(&mut self, len: usize) {
        self.offset += len;
    }
}

impl SharePointStore {
    /// Upload a buffer through a chunked upload session.
    ///
    /// Empty buffers are rejected; send those with `upload_small`.
    #[instrument(skip(self, data), level = "debug", fields(data_len = data.len()))]
    pub async fn upload_large(
        &self,
        folder_path: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<(), StoreError> {
        validate_name(file_name)?;
        if data.is_empty() {
            return Err(StoreError::EmptyUpload {
                name: file_name.to_string(),
            });
        }

        let plan = plan_chunks(data.len(), self.chunk_size);
        let mut upload = UploadSession::new(self.site.format(folder_path), file_name);
        let api_url = self.session.api_url();

        info!(
            upload_id = %upload.id(),
            "Starting upload of {} ({} bytes, {} chunks)",
            file_name,
            data.len(),
            plan.chunks.len()
        );
        let url = upload.start_url(api_url);
        self.send(
            self.http
                .post(&url)
                .headers(self.session.headers())
                .body(Vec::<u8>::new()),
            &url,
        )
        .await?;

        for chunk in &plan.chunks {
            info!(
                upload_id = %upload.id(),
                "Uploading {} bytes {} to {}",
                file_name,
                chunk.start,
                chunk.end
            );
            let url = upload.continue_url(api_url);
            self.send(
                self.http
                    .post(&url)
                    .headers(self.session.headers_with_content_type(OCTET_STREAM))
                    .body(data[chunk.clone()].to_vec()),
                &url,
            )
            .await?;
            upload.advance(chunk.len());
        }

        let url = upload.finish_url(api_url, plan.finish_offset);
        self.send(
            self.http
                .post(&url)
                .headers(self.session.headers())
                .body(Vec::<u8>::new()),
            &url,
        )
        .await?;
        debug!("Upload session {} closed at offset {}", upload.id(), upload.offset());

        info!(upload_id = %upload.id(), "Upload done {}", file_name);
        Ok(())
    }
}
