use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;

use crate::ServiceState;

#[derive(Serialize)]
pub struct IdentityResponse {
    /// Hex SHA-256 of the signing key's public half
    pub fingerprint: String,
    pub bits: usize,
}

#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Response {
    let signer = state.signer();
    let identity = IdentityResponse {
        fingerprint: signer.fingerprint().to_string(),
        bits: signer.verifying_key().bits(),
    };
    (StatusCode::OK, Json(identity)).into_response()
}
