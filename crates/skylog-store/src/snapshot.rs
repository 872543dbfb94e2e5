//! Durable snapshot backends.
//!
//! The store keeps its whole database in memory and mirrors it to a single
//! durable value after every write. That value is a string holding the
//! JSON-encoded byte array of the serialized SQLite image, so a snapshot
//! looks like `[83,81,76,105,116,101,...]`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::{Error, Result};

/// Somewhere to keep the encoded database image between sessions.
pub trait SnapshotBackend: Send {
    /// Read the encoded image, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<String>>;

    /// Overwrite the encoded image.
    fn save(&self, encoded: &str) -> Result<()>;

    /// Human-readable location for logs and `info` output.
    fn describe(&self) -> String;
}

/// Encode a raw database image as a JSON byte array.
pub fn encode_image(image: &[u8]) -> Result<String> {
    Ok(serde_json::to_string(image)?)
}

/// Decode a JSON byte array back into a raw database image.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>> {
    Ok(serde_json::from_str(encoded)?)
}

/// Snapshot stored in a single file.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotBackend for FileSnapshot {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let encoded = std::fs::read_to_string(&self.path).map_err(|e| Error::Snapshot {
            location: self.describe(),
            source: e,
        })?;
        debug!("Read {} bytes of snapshot from {}", encoded.len(), self.path.display());
        Ok(Some(encoded))
    }

    fn save(&self, encoded: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(&self.path, encoded).map_err(|e| Error::Snapshot {
            location: self.describe(),
            source: e,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Snapshot held in memory.
///
/// Clones share the same slot, so a test can reopen a store from the value
/// an earlier store left behind.
#[derive(Clone, Default)]
pub struct MemorySnapshot {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing encoded image.
    pub fn with_contents(encoded: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(encoded.into()))),
        }
    }

    /// The current encoded image, if any.
    pub fn contents(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl fmt::Debug for MemorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.contents().map(|c| c.len());
        f.debug_struct("MemorySnapshot").field("len", &len).finish()
    }
}

impl SnapshotBackend for MemorySnapshot {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn save(&self, encoded: &str) -> Result<()> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(encoded.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Memory snapshot whose saves can be switched to fail.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct FlakySnapshot {
    inner: MemorySnapshot,
    failing: Arc<std::sync::atomic::AtomicBool>,
}

#[cfg(test)]
impl FlakySnapshot {
    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    pub(crate) fn contents(&self) -> Option<String> {
        self.inner.contents()
    }
}

#[cfg(test)]
impl SnapshotBackend for FlakySnapshot {
    fn load(&self) -> Result<Option<String>> {
        self.inner.load()
    }

    fn save(&self, encoded: &str) -> Result<()> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(Error::Io(std::io::Error::other("quota exceeded")));
        }
        self.inner.save(encoded)
    }

    fn describe(&self) -> String {
        "flaky memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_image_is_json_byte_array() {
        let encoded = encode_image(&[83, 81, 76, 0, 255]).unwrap();
        assert_eq!(encoded, "[83,81,76,0,255]");
        assert_eq!(decode_image(&encoded).unwrap(), vec![83, 81, 76, 0, 255]);
    }

    #[test]
    fn test_decode_image_rejects_non_bytes() {
        assert!(decode_image("[1,2,300]").is_err());
        assert!(decode_image("{\"a\":1}").is_err());
        assert!(decode_image("not json").is_err());
    }

    #[test]
    fn test_file_snapshot_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = FileSnapshot::new(dir.path().join("absent.json"));
        assert!(snapshot.load().unwrap().is_none());
    }

    #[test]
    fn test_file_snapshot_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("db.json");
        let snapshot = FileSnapshot::new(&path);

        snapshot.save("[1,2,3]").unwrap();

        assert!(path.exists());
        assert_eq!(snapshot.load().unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn test_memory_snapshot_clones_share_slot() {
        let snapshot = MemorySnapshot::new();
        let other = snapshot.clone();

        snapshot.save("[9]").unwrap();

        assert_eq!(other.load().unwrap().as_deref(), Some("[9]"));
        assert_eq!(MemorySnapshot::with_contents("[1]").contents().as_deref(), Some("[1]"));
    }
}
