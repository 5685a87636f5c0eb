use std::convert::Infallible;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::daemon::storage::StorageArea;
use crate::ServiceState;

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("storage directory unavailable: {0}")]
    StorageUnavailable(String),
}

/// Whatever the readiness probe needs to ask the service
#[async_trait]
pub trait DataSource: std::fmt::Debug + Send + Sync {
    async fn is_ready(&self) -> Result<(), DataSourceError>;
}

#[derive(Clone, Debug)]
pub struct StateDataSource(Arc<dyn DataSource>);

impl StateDataSource {
    pub fn new(inner: Arc<dyn DataSource>) -> Self {
        Self(inner)
    }
}

impl Deref for StateDataSource {
    type Target = Arc<dyn DataSource>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<ServiceState> for StateDataSource {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        Ok(StateDataSource::new(Arc::new(state.clone())))
    }
}

async fn check_dir(path: &Path) -> Result<(), DataSourceError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(DataSourceError::StorageUnavailable(
            path.display().to_string(),
        )),
    }
}

#[async_trait]
impl DataSource for ServiceState {
    /// Ready once both storage directories are in place; the signer can't
    /// be missing since state construction fails without it.
    async fn is_ready(&self) -> Result<(), DataSourceError> {
        check_dir(self.files().dir(StorageArea::Uploads)).await?;
        check_dir(self.files().dir(StorageArea::Received)).await?;
        Ok(())
    }
}
