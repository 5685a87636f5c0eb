use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use axum::Extension;
use tracing::instrument;

use common::prelude::VerificationResult;

use crate::daemon::http_server::workflow::{SignOutcome, VerifyOutcome};
use crate::daemon::http_server::Config;
use crate::ServiceState;

/// Details shown after a successful signing
pub struct SignedView {
    pub file_name: String,
    pub digest: String,
    pub signature: String,
    pub public_key: String,
}

impl From<SignOutcome> for SignedView {
    fn from(outcome: SignOutcome) -> Self {
        Self {
            file_name: outcome.stored.original_name,
            digest: outcome.signed.digest.to_hex(),
            signature: outcome.signed.signature,
            public_key: outcome.signed.public_key,
        }
    }
}

/// A message box on the page
pub struct Notice {
    pub class: &'static str,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            class: "message-error",
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            class: "message-success",
            message: message.into(),
        }
    }

    /// Styling follows the kind of result, not the wording of its message
    pub fn for_verification(outcome: &VerifyOutcome) -> Self {
        let message = match &outcome.result {
            VerificationResult::Valid => format!(
                "{} '{}' was saved with the received files.",
                outcome.result.message(),
                outcome.stored.original_name
            ),
            other => other.message(),
        };
        let class = match &outcome.result {
            VerificationResult::Valid => "message-success",
            VerificationResult::SignatureMismatch => "message-error",
            VerificationResult::MalformedSignature(_)
            | VerificationResult::MalformedKey(_)
            | VerificationResult::EncodingError(_) => "message-warning",
        };
        Self { class, message }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Fingerprint of this daemon's signing key
    pub fingerprint: String,
    pub max_upload_mb: usize,
    pub signed: Option<SignedView>,
    pub sign_notice: Option<Notice>,
    pub verify_notice: Option<Notice>,
}

impl IndexTemplate {
    pub fn new(state: &ServiceState, config: &Config) -> Self {
        Self {
            fingerprint: state.signer().fingerprint().to_string(),
            max_upload_mb: config.max_upload_size_bytes / (1024 * 1024),
            signed: None,
            sign_notice: None,
            verify_notice: None,
        }
    }
}

#[instrument(skip(state, config))]
pub async fn handler(
    State(state): State<ServiceState>,
    Extension(config): Extension<Config>,
) -> askama_axum::Response {
    IndexTemplate::new(&state, &config).into_response()
}
