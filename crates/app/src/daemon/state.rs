use common::prelude::{KeyError, SessionRegistry, Signer, SigningKey};

use super::config::Config;
use super::storage::{FileStore, StorageError};

/// Main service state - shared by every request handler
#[derive(Clone, Debug)]
pub struct State {
    signer: Signer,
    files: FileStore,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup signing key
        let signing_key = match config.signing_key.clone() {
            Some(key) => key,
            None => {
                tracing::info!("generating a fresh signing key for this process");
                tokio::task::spawn_blocking(SigningKey::generate)
                    .await
                    .map_err(|e| StateSetupError::KeyGenerationPanicked(e.to_string()))??
            }
        };
        let signer = Signer::new(signing_key)?;
        tracing::info!(
            fingerprint = %signer.fingerprint(),
            bits = signer.verifying_key().bits(),
            "signer ready"
        );

        // 2. Setup upload storage
        let files = FileStore::new(
            config.uploads_path.clone(),
            config.received_path.clone(),
            SessionRegistry::new(),
        );
        files.ensure_dirs().await?;
        tracing::debug!(
            uploads = %config.uploads_path.display(),
            received = %config.received_path.display(),
            "ServiceState::from_config - storage ready"
        );

        Ok(Self::new(signer, files))
    }

    pub fn new(signer: Signer, files: FileStore) -> Self {
        Self { signer, files }
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn registry(&self) -> &SessionRegistry {
        self.files.registry()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("signing key error: {0}")]
    Key(#[from] KeyError),
    #[error("key generation task failed: {0}")]
    KeyGenerationPanicked(String),
    #[error("storage setup error: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_from_config_creates_storage() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            signing_key: Some(SigningKey::generate().unwrap()),
            app_port: 0,
            max_upload_size_bytes: 1024,
            uploads_path: temp.path().join("uploads"),
            received_path: temp.path().join("received"),
            log_level: tracing::Level::INFO,
            log_dir: None,
        };

        let state = State::from_config(&config).await.unwrap();

        assert!(config.uploads_path.is_dir());
        assert!(config.received_path.is_dir());
        assert!(state.registry().is_empty());
        assert_eq!(
            state.signer().verifying_key(),
            &config.signing_key.as_ref().unwrap().verifying_key()
        );
    }
}
