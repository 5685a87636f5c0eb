use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::daemon::http_server::api::client::{ApiError, ApiRequest};
use crate::daemon::http_server::form::UploadForm;
use crate::daemon::http_server::workflow::{sign_upload, WorkflowError};
use crate::ServiceState;

/// Client side of `POST /api/v0/sign`
#[derive(Debug, Clone)]
pub struct SignRequest {
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignResponse {
    /// Sanitized name the file was uploaded under
    pub file_name: String,
    /// Storage handle of the uploaded copy
    pub handle: String,
    pub size: usize,
    /// Hex SHA-512 of the file
    pub digest: String,
    /// base64 signature
    pub signature: String,
    /// PEM public key to verify the signature with
    pub public_key: String,
}

#[tracing::instrument(skip_all)]
pub async fn handler(
    State(state): State<ServiceState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, SignFileError> {
    let form = UploadForm::read(&mut multipart).await?;
    let file = form
        .file
        .ok_or_else(|| SignFileError::InvalidRequest("file is required".into()))?;

    tracing::info!(
        "SIGN API: received {:?} ({} bytes)",
        file.file_name,
        file.data.len()
    );
    let outcome = sign_upload(&state, file).await?;

    Ok((
        http::StatusCode::OK,
        Json(SignResponse {
            file_name: outcome.stored.original_name,
            handle: outcome.stored.handle,
            size: outcome.stored.size,
            digest: outcome.signed.digest.to_hex(),
            signature: outcome.signed.signature,
            public_key: outcome.signed.public_key,
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum SignFileError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Signing failed: {0}")]
    Workflow(#[from] WorkflowError),
}

impl IntoResponse for SignFileError {
    fn into_response(self) -> Response {
        match self {
            SignFileError::InvalidRequest(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: {}", msg),
            )
                .into_response(),
            SignFileError::Multipart(e) => {
                (e.status(), format!("Bad request: {}", e.body_text())).into_response()
            }
            SignFileError::Workflow(e) => {
                tracing::error!("SIGN API: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for SignRequest {
    type Response = SignResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/sign")?;
        let form = Form::new().part("file", Part::bytes(self.data).file_name(self.file_name));
        Ok(client.post(full_url).multipart(form))
    }
}
