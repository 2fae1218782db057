//! Error types shared by remote file store backends.

/// Errors reported by a `RemoteFileStore`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A file or folder name contains a character the remote store forbids.
    /// Raised before any request is sent.
    #[error("Invalid name: {name} contains forbidden characters")]
    InvalidName { name: String },

    /// Chunked upload was asked to send a zero-length buffer.
    #[error("Refusing chunked upload of empty buffer for {name}")]
    EmptyUpload { name: String },

    /// Session bootstrap failed (auth primitive or context-info call).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The remote service answered with a non-success status, or the transport failed
    /// before a status was received (`status` is `None`).
    #[error("Request to {endpoint} failed{}: {message}", .status.map(|s| format!(" with status {}", s)).unwrap_or_default())]
    RemoteRequest {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    /// The service answered successfully but the body could not be decoded.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Local filesystem error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl StoreError {
    /// HTTP status carried by a `RemoteRequest` error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::RemoteRequest { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        StoreError::Io(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_request_display() {
        let err = StoreError::RemoteRequest {
            endpoint: "https://contoso/_api/web/folders".to_string(),
            status: Some(500),
            message: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request to https://contoso/_api/web/folders failed with status 500: boom"
        );
        assert_eq!(err.status(), Some(500));

        let transport = StoreError::RemoteRequest {
            endpoint: "https://contoso".to_string(),
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            transport.to_string(),
            "Request to https://contoso failed: connection refused"
        );
        assert_eq!(transport.status(), None);
    }

    #[test]
    fn test_io_conversion() {
        let err: StoreError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, StoreError::Io(msg) if msg == "gone"));
    }
}
