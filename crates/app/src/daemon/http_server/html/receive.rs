use askama_axum::IntoResponse;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Extension;
use tracing::instrument;

use super::index::{IndexTemplate, Notice};
use crate::daemon::http_server::form::UploadForm;
use crate::daemon::http_server::workflow::verify_upload;
use crate::daemon::http_server::Config;
use crate::ServiceState;

#[instrument(skip_all)]
pub async fn handler(
    State(state): State<ServiceState>,
    Extension(config): Extension<Config>,
    mut multipart: Multipart,
) -> Response {
    let mut page = IndexTemplate::new(&state, &config);

    let form = match UploadForm::read(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            page.verify_notice = Some(Notice::error(format!(
                "Error: could not read the upload: {}",
                e.body_text()
            )));
            return (e.status(), page).into_response();
        }
    };

    let (file, signature, public_key) = match (form.file, form.signature, form.public_key) {
        (Some(file), Some(signature), Some(public_key)) => (file, signature, public_key),
        _ => {
            page.verify_notice = Some(Notice::error(
                "Error: please provide the file, the signature and the public key.",
            ));
            return (StatusCode::BAD_REQUEST, page).into_response();
        }
    };

    match verify_upload(&state, file, signature, public_key).await {
        Ok(outcome) => {
            page.verify_notice = Some(Notice::for_verification(&outcome));
            page.into_response()
        }
        Err(e) => {
            tracing::error!("failed to verify received file: {}", e);
            page.verify_notice = Some(Notice::error(format!("Error: {}", e)));
            (StatusCode::INTERNAL_SERVER_ERROR, page).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::daemon::http_server::test_support::*;
    use crate::daemon::http_server::{app_router, MAX_UPLOAD_SIZE_BYTES};
    use http::StatusCode;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn receive(parts: &[FormPart<'_>]) -> (StatusCode, String) {
        let temp = TempDir::new().unwrap();
        let router = app_router(&test_config(MAX_UPLOAD_SIZE_BYTES), test_state(&temp).await);
        let response = router
            .oneshot(multipart_request("/receive", parts))
            .await
            .unwrap();
        let status = response.status();
        (status, body_string(response).await)
    }

    #[tokio::test]
    async fn test_receive_valid_file() {
        let signed = test_signer().sign_content(b"abc").unwrap();
        let (status, body) = receive(&[
            ("file", Some("abc.txt"), b"abc"),
            ("signature", None, signed.signature.as_bytes()),
            ("pubkey", None, signed.public_key.as_bytes()),
        ])
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("message-success"));
        assert!(body.contains("Verification succeeded"));
    }

    #[tokio::test]
    async fn test_receive_tampered_file() {
        let signed = test_signer().sign_content(b"abc").unwrap();
        let (status, body) = receive(&[
            ("file", Some("abd.txt"), b"abd"),
            ("signature", None, signed.signature.as_bytes()),
            ("pubkey", None, signed.public_key.as_bytes()),
        ])
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("message-error"));
        assert!(body.contains("does not match"));
    }

    #[tokio::test]
    async fn test_receive_bad_key_is_a_warning() {
        let signed = test_signer().sign_content(b"abc").unwrap();
        let (status, body) = receive(&[
            ("file", Some("abc.txt"), b"abc"),
            ("signature", None, signed.signature.as_bytes()),
            ("pubkey", None, b"not a pem key"),
        ])
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("message-warning"));
    }

    #[tokio::test]
    async fn test_receive_missing_fields() {
        let (status, body) = receive(&[("file", Some("abc.txt"), b"abc")]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("please provide the file, the signature and the public key"));
    }
}
