pub mod utils;

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);
const LOG_FILE_PREFIX: &str = "filesig.log";

use crate::daemon::http_server;
use crate::daemon::{ServiceConfig, ServiceState};

fn env_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Install stdout logging, plus a daily rolling file under `log_dir` when one
/// is configured. The returned guards flush the non-blocking writers on drop.
fn init_logging(
    service_config: &ServiceConfig,
) -> Vec<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::fmt::format::FmtSpan;

    let level = service_config.log_level;
    let mut guards = Vec::new();

    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(stdout_guard);
    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(env_filter(level));

    let file_layer = service_config.log_dir.as_ref().map(|log_dir| {
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("warning: cannot create log directory {}: {}", log_dir.display(), e);
        }
        let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
        let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
        guards.push(file_guard);
        tracing_subscriber::fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter(level))
    });

    // Option<Layer> is itself a layer, so a missing log_dir is a no-op here
    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    utils::register_panic_logger();
    utils::report_build_info();

    guards
}

/// Build the signer and storage, exiting with status 3 if either fails.
async fn create_state(service_config: &ServiceConfig) -> ServiceState {
    match ServiceState::from_config(service_config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "cannot start filesig daemon");
            std::process::exit(3);
        }
    }
}

/// Serve until a shutdown signal arrives, then give the server
/// [`FINAL_SHUTDOWN_TIMEOUT`] to drain. A server that stops on its own first
/// (a port already in use, for one) is an error rather than a silent hang.
async fn serve_until_shutdown(
    app_config: http_server::Config,
    state: ServiceState,
    graceful_waiter: JoinHandle<()>,
    shutdown_rx: watch::Receiver<()>,
) -> Result<(), ServiceError> {
    let mut app_handle = tokio::spawn(http_server::run_app(app_config, state, shutdown_rx));

    tokio::select! {
        biased;
        _ = graceful_waiter => {}
        finished = &mut app_handle => {
            return match finished {
                Ok(Ok(())) => Err(ServiceError::StoppedEarly),
                Ok(Err(e)) => Err(e.into()),
                Err(e) => Err(ServiceError::Task(e.to_string())),
            };
        }
    }

    match timeout(FINAL_SHUTDOWN_TIMEOUT, app_handle).await {
        Ok(Ok(result)) => result.map_err(Into::into),
        Ok(Err(e)) => Err(ServiceError::Task(e.to_string())),
        Err(_) => Err(ServiceError::ShutdownTimeout),
    }
}

/// Spawns the daemon service based on config.
///
/// Generates (or adopts) the signing key, prepares upload storage and
/// serves the App server (UI + API) on `app_port` until SIGINT/SIGTERM.
/// Exits the process with status 4 if shutdown stalls and 5 if the server
/// fails.
pub async fn spawn_service(service_config: &ServiceConfig) {
    let _guards = init_logging(service_config);
    let (graceful_waiter, shutdown_rx) = match utils::graceful_shutdown_blocker() {
        Ok(blocker) => blocker,
        Err(e) => {
            tracing::error!("failed to install signal handlers: {}", e);
            std::process::exit(2);
        }
    };
    let state = create_state(service_config).await;

    let app_listen_addr = SocketAddr::from(([0, 0, 0, 0], service_config.app_port));
    let app_config =
        http_server::Config::new(app_listen_addr, service_config.max_upload_size_bytes);

    tracing::info!("Starting App server on {}", app_listen_addr);
    match serve_until_shutdown(app_config, state, graceful_waiter, shutdown_rx).await {
        Ok(()) => tracing::info!("App server stopped"),
        Err(ServiceError::ShutdownTimeout) => {
            tracing::error!(
                "Failed to shut down within {} seconds",
                FINAL_SHUTDOWN_TIMEOUT.as_secs()
            );
            std::process::exit(4);
        }
        Err(e) => {
            tracing::error!("App server error: {}", e);
            std::process::exit(5);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Server(#[from] http_server::HttpServerError),
    #[error("server stopped before a shutdown was requested")]
    StoppedEarly,
    #[error("server task failed: {0}")]
    Task(String),
    #[error("shutdown timed out")]
    ShutdownTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::http_server::test_support::test_state;
    use crate::daemon::http_server::MAX_UPLOAD_SIZE_BYTES;
    use tempfile::TempDir;

    fn config_for(port: u16) -> http_server::Config {
        http_server::Config::new(SocketAddr::from(([0, 0, 0, 0], port)), MAX_UPLOAD_SIZE_BYTES)
    }

    #[tokio::test]
    async fn test_port_in_use_stops_the_service() {
        let temp = TempDir::new().unwrap();
        let held = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
        let port = held.local_addr().unwrap().port();

        let never_signalled = tokio::spawn(std::future::pending::<()>());
        let (_shutdown_tx, shutdown_rx) = watch::channel(());

        let result = timeout(
            Duration::from_secs(5),
            serve_until_shutdown(
                config_for(port),
                test_state(&temp).await,
                never_signalled,
                shutdown_rx,
            ),
        )
        .await
        .expect("service kept waiting after the server failed");

        assert!(matches!(result, Err(ServiceError::Server(_))));
        drop(held);
    }

    #[tokio::test]
    async fn test_shutdown_signal_stops_cleanly() {
        let temp = TempDir::new().unwrap();
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let waiter = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let _ = shutdown_tx.send(());
        });

        let result = timeout(
            Duration::from_secs(5),
            serve_until_shutdown(config_for(0), test_state(&temp).await, waiter, shutdown_rx),
        )
        .await
        .unwrap();

        assert!(result.is_ok());
    }
}
