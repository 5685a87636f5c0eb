//! Store-then-crypto flows behind both the page and API handlers
//!
//! The RSA work is CPU bound, so it runs on the blocking pool rather than on
//! the async workers.

use common::prelude::{verify_content, SignError, SignedContent, VerificationResult};

use super::form::UploadedFile;
use crate::daemon::storage::{StorageArea, StorageError, StoredFile};
use crate::ServiceState;

#[derive(Debug)]
pub struct SignOutcome {
    pub stored: StoredFile,
    pub signed: SignedContent,
}

#[derive(Debug)]
pub struct VerifyOutcome {
    pub stored: StoredFile,
    pub result: VerificationResult,
}

/// Store a file submitted for signing, then sign it with the process key
pub async fn sign_upload(
    state: &ServiceState,
    file: UploadedFile,
) -> Result<SignOutcome, WorkflowError> {
    let stored = state
        .files()
        .store(StorageArea::Uploads, file.file_name.as_deref(), &file.data)
        .await?;

    let signer = state.signer().clone();
    let data = file.data;
    let signed = tokio::task::spawn_blocking(move || signer.sign_content(&data))
        .await
        .map_err(|e| WorkflowError::Task(e.to_string()))??;

    tracing::info!(
        handle = %stored.handle,
        file_name = %stored.original_name,
        digest = %signed.digest,
        "signed upload"
    );

    Ok(SignOutcome { stored, signed })
}

/// Store a received file, then check it against the claimed signature and key
pub async fn verify_upload(
    state: &ServiceState,
    file: UploadedFile,
    signature: String,
    public_key: String,
) -> Result<VerifyOutcome, WorkflowError> {
    let stored = state
        .files()
        .store(StorageArea::Received, file.file_name.as_deref(), &file.data)
        .await?;

    let data = file.data;
    let result =
        tokio::task::spawn_blocking(move || verify_content(&data, &signature, &public_key))
            .await
            .map_err(|e| WorkflowError::Task(e.to_string()))?;

    tracing::info!(
        handle = %stored.handle,
        file_name = %stored.original_name,
        result = result.kind(),
        "verified received file"
    );

    Ok(VerifyOutcome { stored, result })
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("failed to store file: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to sign file: {0}")]
    Sign(#[from] SignError),
    #[error("background task failed: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::http_server::test_support::*;
    use tempfile::TempDir;

    fn upload(name: &str, data: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: Some(name.to_string()),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_sign_then_verify_upload() {
        let temp = TempDir::new().unwrap();
        let state = test_state(&temp).await;

        let signed = sign_upload(&state, upload("report.pdf", b"quarterly numbers"))
            .await
            .unwrap();
        assert_eq!(signed.stored.original_name, "report.pdf");
        assert!(signed.stored.path.starts_with(temp.path().join("uploads")));
        assert_eq!(signed.signed.public_key, state.signer().public_key_pem());

        let verified = verify_upload(
            &state,
            upload("report.pdf", b"quarterly numbers"),
            signed.signed.signature.clone(),
            signed.signed.public_key.clone(),
        )
        .await
        .unwrap();
        assert!(verified.result.is_valid());
        assert!(verified.stored.path.starts_with(temp.path().join("received")));

        let tampered = verify_upload(
            &state,
            upload("report.pdf", b"quarterly numbers!"),
            signed.signed.signature,
            signed.signed.public_key,
        )
        .await
        .unwrap();
        assert_eq!(tampered.result, VerificationResult::SignatureMismatch);
    }
}
