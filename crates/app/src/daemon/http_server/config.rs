use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // log level for http tracing
    pub log_level: tracing::Level,
    // largest request body we accept, uploads included
    pub max_upload_size_bytes: usize,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, max_upload_size_bytes: usize) -> Self {
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, max_upload_size_bytes={}",
            listen_addr,
            max_upload_size_bytes
        );
        Self {
            listen_addr,
            log_level: tracing::Level::INFO,
            max_upload_size_bytes,
        }
    }
}
