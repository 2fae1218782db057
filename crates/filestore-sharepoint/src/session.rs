//! Authenticated session bootstrap.
//!
//! One `Session` is built per store: the auth provider supplies a cookie, the context-info
//! endpoint supplies a request digest, and the resulting header bag is reused verbatim by
//! every later request. The digest is never refreshed; once it expires mutating calls fail
//! and the store has to be re-created.

use filestore_core::StoreError;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE,
};
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::auth::AuthProvider;
use crate::odata::{ContextInfo, Verbose};

/// Header carrying the anti-forgery request digest.
pub const REQUEST_DIGEST: HeaderName = HeaderName::from_static("x-requestdigest");

pub const ODATA_VERBOSE_JSON: &str = "application/json;odata=verbose";
pub const JSON: &str = "application/json";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Immutable authenticated state shared by every request of a store.
#[derive(Debug, Clone)]
pub struct Session {
    site_url: String,
    api_url: String,
    headers: HeaderMap,
}

impl Session {
    /// Authenticate against `site_url` and fetch a request digest.
    #[instrument(skip(http, auth), level = "debug")]
    pub async fn establish(
        http: &Client,
        site_url: &str,
        auth: &dyn AuthProvider,
    ) -> Result<Self, StoreError> {
        let credentials = auth.authenticate(site_url).await.map_err(|e| match e {
            StoreError::Auth(_) => e,
            other => StoreError::Auth(other.to_string()),
        })?;

        let mut headers = credentials.extra;
        headers.insert(COOKIE, sensitive_value(&credentials.cookie)?);
        headers.insert(
            AUTHORIZATION,
            sensitive_value(&format!("Bearer {}", credentials.cookie))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ODATA_VERBOSE_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));

        let url = format!("{}/_api/contextinfo", site_url);
        let response = http
            .post(&url)
            .headers(headers.clone())
            .body("{}")
            .send()
            .await
            .map_err(|e| StoreError::Auth(format!("context info request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!(
                "context info returned {}: {}",
                status, body
            )));
        }

        let info: Verbose<ContextInfo> = response
            .json()
            .await
            .map_err(|e| StoreError::Auth(format!("invalid context info response: {}", e)))?;
        let digest = info.d.get_context_web_information.form_digest_value;
        debug!("Obtained request digest ({} chars)", digest.len());

        headers.insert(REQUEST_DIGEST, header_value(&digest)?);

        info!("Established SharePoint session for {}", site_url);
        Ok(Self {
            site_url: site_url.to_string(),
            api_url: format!("{}/_api/web", site_url),
            headers,
        })
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Root of the web API, `{site_url}/_api/web`.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Headers for a JSON request.
    pub fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    /// Headers for a request whose body has its own content type.
    pub fn headers_with_content_type(&self, content_type: &'static str) -> HeaderMap {
        let mut headers = self.headers.clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }
}

fn header_value(value: &str) -> Result<HeaderValue, StoreError> {
    HeaderValue::from_str(value)
        .map_err(|e| StoreError::Auth(format!("unusable header value: {}", e)))
}

/// Header value that is masked in `Debug` output.
fn sensitive_value(value: &str) -> Result<HeaderValue, StoreError> {
    let mut value = header_value(value)?;
    value.set_sensitive(true);
    Ok(value)
}
