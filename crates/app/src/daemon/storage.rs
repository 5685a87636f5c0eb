//! On-disk storage for uploaded files
//!
//! Files are written under a fresh handle (`<uuid>.<ext>`), never under the
//! name the user supplied. The handle is recorded in the [`SessionRegistry`]
//! so pages and API responses can still show the original name.

use std::path::{Path, PathBuf};

use common::prelude::SessionRegistry;
use uuid::Uuid;

/// Longest extension we keep from a user-supplied filename
const MAX_EXTENSION_LEN: usize = 16;
/// Longest display name we keep, in characters
const MAX_DISPLAY_NAME_LEN: usize = 255;
/// Name shown when the user gave us nothing usable
pub const UNNAMED: &str = "unnamed";

/// Which side of the exchange a file came in on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    /// Submitted for signing
    Uploads,
    /// Submitted for verification
    Received,
}

/// A file that has been written to disk
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Collision-safe storage identifier
    pub handle: String,
    /// Sanitized, user-visible name
    pub original_name: String,
    pub path: PathBuf,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    uploads_path: PathBuf,
    received_path: PathBuf,
    registry: SessionRegistry,
}

impl FileStore {
    pub fn new(uploads_path: PathBuf, received_path: PathBuf, registry: SessionRegistry) -> Self {
        Self {
            uploads_path,
            received_path,
            registry,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn dir(&self, area: StorageArea) -> &Path {
        match area {
            StorageArea::Uploads => &self.uploads_path,
            StorageArea::Received => &self.received_path,
        }
    }

    /// Make sure both storage directories exist
    pub async fn ensure_dirs(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.uploads_path).await?;
        tokio::fs::create_dir_all(&self.received_path).await?;
        Ok(())
    }

    /// Write `data` under a new handle and record the user's name for it.
    pub async fn store(
        &self,
        area: StorageArea,
        user_filename: Option<&str>,
        data: &[u8],
    ) -> Result<StoredFile, StorageError> {
        let original_name = sanitize_display_name(user_filename.unwrap_or(UNNAMED));
        let handle = new_handle(&original_name);
        let path = self.dir(area).join(&handle);

        tokio::fs::write(&path, data).await.map_err(|e| {
            tracing::error!("failed to write {} to {}: {}", original_name, path.display(), e);
            StorageError::Io(e)
        })?;

        self.registry.record(handle.clone(), original_name.clone());
        tracing::info!(
            %handle,
            %original_name,
            size = data.len(),
            area = ?area,
            "stored file"
        );

        Ok(StoredFile {
            handle,
            original_name,
            path,
            size: data.len(),
        })
    }
}

/// Generate a storage handle that keeps a sanitized copy of the extension
pub fn new_handle(original_name: &str) -> String {
    let id = Uuid::new_v4();
    match sanitize_extension(original_name) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

/// Extension of `name`, if it is short and plain ASCII alphanumeric
pub fn sanitize_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Make a user-supplied filename safe to display and log
///
/// Keeps only the last path component (browsers on some platforms send
/// full paths), drops control characters and trims whitespace and dots
/// from the ends.
pub fn sanitize_display_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_DISPLAY_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim().trim_matches('.').trim();

    if cleaned.is_empty() {
        UNNAMED.to_string()
    } else {
        cleaned.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
