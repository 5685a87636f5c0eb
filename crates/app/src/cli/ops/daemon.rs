use clap::Args;

use filesig::state::{AppState, AppStateError};
use filesig::spawn_service;

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override App server port (default from config)
    #[arg(long)]
    pub app_port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,

    /// Default log level, RUST_LOG takes precedence
    #[arg(long, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] AppStateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Load state from config path (or default ~/.filesig), creating it on first run
        let state = AppState::load_or_init(ctx.config_path.clone(), None)?;

        let mut config = state.to_service_config(self.app_port, self.log_dir.clone());
        config.log_level = self.log_level;

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
