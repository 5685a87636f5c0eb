use clap::Args;

use filesig::state::{AppConfig, AppState, AppStateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port for the App server (UI + API)
    #[arg(long, default_value_t = 5000)]
    pub app_port: u16,

    /// Largest accepted upload, in MiB
    #[arg(long, default_value_t = 100)]
    pub max_upload_mb: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] AppStateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            app_port: self.app_port,
            max_upload_mb: self.max_upload_mb,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized filesig directory at: {}\n\
             - Config: {}\n\
             - Uploads: {}\n\
             - Received: {}\n\
             - App port: {}\n\
             - Max upload: {} MiB\n\
             No key is stored: the daemon generates a fresh signing key every time it starts.",
            state.filesig_dir.display(),
            state.config_path.display(),
            state.uploads_path.display(),
            state.received_path.display(),
            state.config.app_port,
            state.config.max_upload_mb,
        );

        Ok(output)
    }
}
