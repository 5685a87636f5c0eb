use askama_axum::IntoResponse;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Extension;
use tracing::instrument;

use super::index::{IndexTemplate, Notice};
use crate::daemon::http_server::form::UploadForm;
use crate::daemon::http_server::workflow::sign_upload;
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
            page.sign_notice = Some(Notice::error(format!(
                "Error: could not read the upload: {}",
                e.body_text()
            )));
            return (e.status(), page).into_response();
        }
    };

    let Some(file) = form.file else {
        page.sign_notice = Some(Notice::error("Error: please choose a file to sign."));
        return (StatusCode::BAD_REQUEST, page).into_response();
    };

    match sign_upload(&state, file).await {
        Ok(outcome) => {
            page.sign_notice = Some(Notice::success(format!(
                "Signed '{}'. Share the file through any channel, and send the signature and \
                 public key below to the recipient separately.",
                outcome.stored.original_name
            )));
            page.signed = Some(outcome.into());
            page.into_response()
        }
        Err(e) => {
            tracing::error!("failed to sign upload: {}", e);
            page.sign_notice = Some(Notice::error(format!("Error: {}", e)));
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

    #[tokio::test]
    async fn test_sign_page_shows_signature_and_key() {
        let temp = TempDir::new().unwrap();
        let state = test_state(&temp).await;
        let router = app_router(&test_config(MAX_UPLOAD_SIZE_BYTES), state.clone());

        let response = router
            .oneshot(multipart_request(
                "/sign_and_get_details",
                &[("file", Some("hello.txt"), b"hello")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let expected = state.signer().sign_content(b"hello").unwrap();
        let body = body_string(response).await;
        assert!(body.contains("-----BEGIN PUBLIC KEY-----"));
        assert!(body.contains(&expected.digest.to_hex()));
        assert!(body.contains("message-success"));
    }

    #[tokio::test]
    async fn test_sign_page_without_file() {
        let temp = TempDir::new().unwrap();
        let router = app_router(&test_config(MAX_UPLOAD_SIZE_BYTES), test_state(&temp).await);

        let response = router
            .oneshot(multipart_request(
                "/sign_and_get_details",
                &[("file", Some(""), b"")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_string(response).await;
        assert!(body.contains("please choose a file to sign"));
        assert!(body.contains("message-error"));
    }
}
