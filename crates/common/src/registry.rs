//! Stored-file handle to original-name bookkeeping
//!
//! Uploaded files are stored under opaque, collision-safe handles so that
//! nothing a user types ever becomes a path. The registry remembers which
//! name the user gave each handle, for display.
//!
//! # Lifecycle
//!
//! Entries live as long as the process: there is no persistence and no
//! eviction, so the map grows with every stored upload until restart.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared, thread-safe `handle -> original name` map
///
/// Cloning shares the underlying map. Every access takes the lock, so
/// concurrent `record` and `resolve` calls never lose updates or observe a
/// half-written entry.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the user-visible name of a stored handle.
    ///
    /// Recording an existing handle again replaces its name.
    pub fn record(&self, handle: impl Into<String>, original_name: impl Into<String>) {
        let handle = handle.into();
        let original_name = original_name.into();
        tracing::debug!(%handle, %original_name, "recording stored file");
        self.entries.write().insert(handle, original_name);
    }

    /// Name to show for a handle, or the handle itself if it was never recorded
    pub fn resolve(&self, handle: &str) -> String {
        self.get(handle).unwrap_or_else(|| handle.to_string())
    }

    pub fn get(&self, handle: &str) -> Option<String> {
        self.entries.read().get(handle).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;

    #[test]
    fn test_record_and_resolve() {
        let registry = SessionRegistry::new();
        registry.record("3f2a.pdf", "quarterly report.pdf");

        assert_eq!(registry.resolve("3f2a.pdf"), "quarterly report.pdf");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_handle_falls_back_to_itself() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.resolve("missing.bin"), "missing.bin");
        assert_eq!(registry.get("missing.bin"), None);
    }

    #[test]
    fn test_rerecord_replaces_name() {
        let registry = SessionRegistry::new();
        registry.record("a", "first.txt");
        registry.record("a", "second.txt");
        assert_eq!(registry.resolve("a"), "second.txt");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clones_share_entries() {
        let registry = SessionRegistry::new();
        let clone = registry.clone();
        clone.record("h", "name");
        assert_eq!(registry.resolve("h"), "name");
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let registry = SessionRegistry::new();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for i in 0..250 {
                        let handle = format!("{}-{}", t, i);
                        registry.record(handle.clone(), format!("file {}", i));
                        assert_eq!(registry.resolve(&handle), format!("file {}", i));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8 * 250);
    }
}
