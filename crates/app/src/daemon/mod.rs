mod config;
pub mod http_server;
pub mod process;
mod state;
pub mod storage;

pub use config::Config as ServiceConfig;
pub use process::spawn_service;
pub use state::{State as ServiceState, StateSetupError};
