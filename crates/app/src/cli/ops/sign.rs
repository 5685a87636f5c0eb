use std::path::PathBuf;

use clap::Args;

use filesig::http_server::api::client::ApiError;
use filesig::http_server::api::v0::sign::SignRequest;

#[derive(Args, Debug, Clone)]
pub struct Sign {
    /// File to sign
    pub file: PathBuf,

    /// Also write the base64 signature to this file
    #[arg(long)]
    pub signature_out: Option<PathBuf>,

    /// Also write the PEM public key to this file
    #[arg(long)]
    pub public_key_out: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("failed to read {}: {}", .0.display(), .1)]
    Read(PathBuf, std::io::Error),
    #[error("failed to write {}: {}", .0.display(), .1)]
    Write(PathBuf, std::io::Error),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Sign {
    type Error = SignError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let data = tokio::fs::read(&self.file)
            .await
            .map_err(|e| SignError::Read(self.file.clone(), e))?;
        let file_name = self
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let response = ctx.client.call(SignRequest { file_name, data }).await?;

        if let Some(path) = &self.signature_out {
            tokio::fs::write(path, format!("{}\n", response.signature))
                .await
                .map_err(|e| SignError::Write(path.clone(), e))?;
        }
        if let Some(path) = &self.public_key_out {
            tokio::fs::write(path, &response.public_key)
                .await
                .map_err(|e| SignError::Write(path.clone(), e))?;
        }

        Ok(format!(
            "file:      {} ({} bytes)\n\
             digest:    {}\n\
             signature: {}\n\n\
             {}",
            response.file_name,
            response.size,
            response.digest,
            response.signature,
            response.public_key.trim_end()
        ))
    }
}
