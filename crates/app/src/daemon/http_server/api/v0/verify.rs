use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::VerificationResult;

use crate::daemon::http_server::api::client::{ApiError, ApiRequest};
use crate::daemon::http_server::form::UploadForm;
use crate::daemon::http_server::workflow::{verify_upload, WorkflowError};
use crate::ServiceState;

/// Client side of `POST /api/v0/verify`
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    pub file_name: String,
    pub data: Vec<u8>,
    pub signature: String,
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub file_name: String,
    pub handle: String,
    /// Machine-readable outcome, e.g. `valid` or `signature_mismatch`
    pub result: String,
    pub valid: bool,
    pub message: String,
}

/// A verdict on well-formed input is a successful answer even when it is
/// negative; input that could not be parsed is the client's problem.
fn status_for(result: &VerificationResult) -> StatusCode {
    if result.is_well_formed() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

#[tracing::instrument(skip_all)]
pub async fn handler(
    State(state): State<ServiceState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, VerifyFileError> {
    let form = UploadForm::read(&mut multipart).await?;
    let (file, signature, public_key) = match (form.file, form.signature, form.public_key) {
        (Some(file), Some(signature), Some(public_key)) => (file, signature, public_key),
        _ => {
            return Err(VerifyFileError::InvalidRequest(
                "file, signature and public_key are required".into(),
            ))
        }
    };

    tracing::info!(
        "VERIFY API: received {:?} ({} bytes)",
        file.file_name,
        file.data.len()
    );
    let outcome = verify_upload(&state, file, signature, public_key).await?;

    Ok((
        status_for(&outcome.result),
        Json(VerifyResponse {
            file_name: outcome.stored.original_name,
            handle: outcome.stored.handle,
            result: outcome.result.kind().to_string(),
            valid: outcome.result.is_valid(),
            message: outcome.result.message(),
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyFileError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Verification failed: {0}")]
    Workflow(#[from] WorkflowError),
}

impl IntoResponse for VerifyFileError {
    fn into_response(self) -> Response {
        match self {
            VerifyFileError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, format!("Bad request: {}", msg)).into_response()
            }
            VerifyFileError::Multipart(e) => {
                (e.status(), format!("Bad request: {}", e.body_text())).into_response()
            }
            VerifyFileError::Workflow(e) => {
                tracing::error!("VERIFY API: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for VerifyRequest {
    type Response = VerifyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/verify")?;
        let form = Form::new()
            .part("file", Part::bytes(self.data).file_name(self.file_name))
            .text("signature", self.signature)
            .text("public_key", self.public_key);
        Ok(client.post(full_url).multipart(form))
    }
}
