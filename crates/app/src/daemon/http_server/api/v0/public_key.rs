use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::daemon::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

/// Client side of `GET /api/v0/public_key`
#[derive(Debug, Clone, Default)]
pub struct PublicKeyRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeyResponse {
    /// PEM encoded public half of the daemon's signing key
    pub public_key: String,
    pub fingerprint: String,
    pub bits: usize,
}

#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> impl IntoResponse {
    let signer = state.signer();
    Json(PublicKeyResponse {
        public_key: signer.public_key_pem().to_string(),
        fingerprint: signer.fingerprint().to_string(),
        bits: signer.verifying_key().bits(),
    })
}

impl ApiRequest for PublicKeyRequest {
    type Response = PublicKeyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/public_key")?;
        Ok(client.get(full_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::http_server::test_support::*;
    use crate::daemon::http_server::{app_router, MAX_UPLOAD_SIZE_BYTES};
    use axum::body::Body;
    use common::prelude::VerifyingKey;
    use http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_public_key_parses_back() {
        let temp = TempDir::new().unwrap();
        let state = test_state(&temp).await;
        let router = app_router(&test_config(MAX_UPLOAD_SIZE_BYTES), state.clone());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v0/public_key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: PublicKeyResponse = serde_json::from_str(&body_string(response).await).unwrap();
        let key = VerifyingKey::from_pem(&body.public_key).unwrap();
        assert_eq!(&key, state.signer().verifying_key());
        assert_eq!(body.fingerprint, state.signer().fingerprint());
        assert_eq!(body.bits, 2048);
    }
}
