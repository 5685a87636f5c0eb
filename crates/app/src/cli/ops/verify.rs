use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use common::prelude::verify_content;
use filesig::http_server::api::client::ApiError;
use filesig::http_server::api::v0::verify::VerifyRequest;

#[derive(Args, Debug, Clone)]
pub struct Verify {
    /// Received file to check
    pub file: PathBuf,

    /// base64 signature, or @PATH to read it from a file
    #[arg(long)]
    pub signature: String,

    /// PEM public key, or @PATH to read it from a file
    #[arg(long)]
    pub public_key: String,

    /// Ask the running daemon to verify (and keep a copy) instead of checking locally
    #[arg(long)]
    pub via_daemon: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error(transparent)]
    Input(#[from] anyhow::Error),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Rejected(String),
}

/// Read an argument that is either inline text or `@path`
fn load_text_arg(arg: &str) -> anyhow::Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("failed to read {}", path)),
        None => Ok(arg.to_string()),
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Verify {
    type Error = VerifyError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let signature = load_text_arg(&self.signature)?.trim().to_string();
        let public_key = load_text_arg(&self.public_key)?;
        let data = tokio::fs::read(&self.file)
            .await
            .with_context(|| format!("failed to read {}", self.file.display()))?;

        let (valid, message) = if self.via_daemon {
            let file_name = self
                .file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let request = VerifyRequest {
                file_name,
                data,
                signature,
                public_key,
            };
            match ctx.client.call(request).await {
                Ok(response) => (response.valid, response.message),
                // malformed inputs come back as 422 with a verdict in the body
                Err(ApiError::HttpStatus(status, body)) if status.as_u16() == 422 => {
                    let message = serde_json::from_str::<serde_json::Value>(&body)
                        .ok()
                        .and_then(|v| v["message"].as_str().map(str::to_string))
                        .unwrap_or(body);
                    (false, message)
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            let result = tokio::task::spawn_blocking(move || {
                verify_content(&data, &signature, &public_key)
            })
            .await
            .context("verification task failed")?;
            (result.is_valid(), result.message())
        };

        if valid {
            Ok(message)
        } else {
            Err(VerifyError::Rejected(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_text_arg_inline() {
        assert_eq!(load_text_arg("c2lnbmF0dXJl").unwrap(), "c2lnbmF0dXJl");
    }

    #[test]
    fn test_load_text_arg_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sig.b64");
        std::fs::write(&path, "c2lnbmF0dXJl\n").unwrap();

        let arg = format!("@{}", path.display());
        assert_eq!(load_text_arg(&arg).unwrap(), "c2lnbmF0dXJl\n");
    }

    #[test]
    fn test_load_text_arg_missing_file() {
        let err = load_text_arg("@/nonexistent/sig.b64").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sig.b64"));
    }
}
