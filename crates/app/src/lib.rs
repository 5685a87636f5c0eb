// Daemon/service modules (HTTP server, signer, upload storage)
pub mod daemon;

// App state (configuration, paths)
pub mod state;

// Re-export key types for convenience
pub use daemon::http_server;
pub use daemon::{spawn_service, ServiceConfig, ServiceState};
pub use state::{AppConfig, AppState, AppStateError};
