use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct Digest {
    /// File to hash
    pub file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("failed to read {}: {}", .0.display(), .1)]
    Read(PathBuf, std::io::Error),
    #[error("digest task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Digest {
    type Error = DigestError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let path = self.file.clone();
        let digest = tokio::task::spawn_blocking(move || {
            std::fs::File::open(&path)
                .and_then(common::prelude::Digest::from_reader)
                .map_err(|e| DigestError::Read(path, e))
        })
        .await??;

        Ok(format!("{}  {}", digest, self.file.display()))
    }
}
