use std::path::PathBuf;

use common::prelude::SigningKey;

#[derive(Debug)]
pub struct Config {
    // signer configuration
    /// key to sign with, if not set then a new key
    ///  will be generated at startup and live only in memory
    pub signing_key: Option<SigningKey>,

    // http server configuration
    /// Port for the App server (UI + API combined).
    pub app_port: u16,
    /// Upper bound on request bodies, uploads included
    pub max_upload_size_bytes: usize,

    // storage configuration
    /// where files submitted for signing are written
    pub uploads_path: PathBuf,
    /// where files submitted for verification are written
    pub received_path: PathBuf,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}
