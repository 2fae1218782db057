use std::num::NonZeroUsize;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::auth::StaticCookieAuth;
use crate::store::{SharePointOptions, SharePointStore};

pub const SITE: &str = "/sites/demo";
pub const DIGEST: &str = "0x8F2C1A-DIGEST-1800";

pub async fn mount_context_info(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("{}/_api/contextinfo", SITE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "d": { "GetContextWebInformation": { "FormDigestValue": DIGEST } }
        })))
        .mount(server)
        .await;
}

pub async fn connected_store(server: &MockServer, chunk_size: usize) -> SharePointStore {
    mount_context_info(server).await;
    let options = SharePointOptions::new(server.uri(), SITE)
        .with_chunk_size(NonZeroUsize::new(chunk_size).unwrap());
    SharePointStore::create(options, &StaticCookieAuth::new("FedAuth=abc"))
        .await
        .unwrap()
}

/// Requests received after the session bootstrap, in arrival order.
pub async fn api_requests(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| !r.url.path().ends_with("/_api/contextinfo"))
        .collect()
}
