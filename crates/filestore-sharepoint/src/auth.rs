//! Authentication collaborator for the SharePoint session bootstrap.
//!
//! The cookie/token exchange itself lives outside this crate. A provider hands back the
//! cookie value (and any extra headers its flow needs) for a site URL; the session
//! bootstrap turns that into the request header bag.

use async_trait::async_trait;
use filestore_core::StoreError;
use reqwest::header::HeaderMap;

/// Headers produced by an authentication flow.
#[derive(Debug, Clone, Default)]
pub struct AuthHeaders {
    /// Cookie (or token) value; also sent as the Bearer credential.
    pub cookie: String,
    /// Additional headers the flow requires on every request.
    pub extra: HeaderMap,
}

/// Source of authentication headers for a SharePoint site.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Obtain headers for `site_url` (`{base_url}{site_path}`).
    async fn authenticate(&self, site_url: &str) -> Result<AuthHeaders, StoreError>;
}

/// Provider for a cookie or token obtained out of band.
#[derive(Clone)]
pub struct StaticCookieAuth {
    cookie: String,
}

impl StaticCookieAuth {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
        }
    }
}

impl std::fmt::Debug for StaticCookieAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCookieAuth")
            .field("cookie", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl AuthProvider for StaticCookieAuth {
    async fn authenticate(&self, _site_url: &str) -> Result<AuthHeaders, StoreError> {
        if self.cookie.trim().is_empty() {
            return Err(StoreError::Auth("empty authentication cookie".to_string()));
        }
        Ok(AuthHeaders {
            cookie: self.cookie.clone(),
            extra: HeaderMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_cookie() {
        let auth = StaticCookieAuth::new("FedAuth=abc; rtFa=def");
        let headers = auth
            .authenticate("https://contoso.sharepoint.com/sites/demo")
            .await
            .unwrap();
        assert_eq!(headers.cookie, "FedAuth=abc; rtFa=def");
        assert!(headers.extra.is_empty());
    }

    #[tokio::test]
    async fn test_empty_cookie_rejected() {
        let auth = StaticCookieAuth::new("  ");
        let err = auth.authenticate("https://contoso").await.unwrap_err();
        assert!(matches!(err, StoreError::Auth(_)));
    }

    #[test]
    fn test_debug_redacts_cookie() {
        let auth = StaticCookieAuth::new("secret");
        assert!(!format!("{:?}", auth).contains("secret"));
    }
}
