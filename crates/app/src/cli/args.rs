pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "filesig")]
#[command(about = "Sign files and verify files received over untrusted channels")]
pub struct Args {
    /// Daemon to talk to (defaults to localhost on the configured app_port)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the filesig config directory (defaults to ~/.filesig)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
