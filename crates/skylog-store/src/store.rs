//! Main store implementation.

use std::path::Path;

use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, DatabaseName};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::schema;
use crate::snapshot::{self, FileSnapshot, SnapshotBackend};

/// In-memory SQLite journal mirrored to a durable snapshot.
///
/// Every successful write re-serializes the whole database image and
/// overwrites the snapshot. This costs O(total stored bytes) per write,
/// which is fine for a personal journal but grows with the data set.
pub struct Store {
    conn: Connection,
    snapshot: Option<Box<dyn SnapshotBackend>>,
}

impl Store {
    /// Open the store from a snapshot backend.
    ///
    /// Loads and deserializes the saved image if the backend has one;
    /// otherwise starts an empty database and saves it right away. Any
    /// failure to read the saved image is an [`Error::Initialization`].
    pub fn open<B: SnapshotBackend + 'static>(backend: B) -> Result<Self> {
        let location = backend.describe();
        info!("Opening weather journal at {}", location);

        let (conn, fresh) = match backend.load()? {
            Some(encoded) => (restore(&encoded)?, false),
            None => {
                debug!("No snapshot at {}, creating an empty database", location);
                (Connection::open_in_memory()?, true)
            }
        };

        register_functions(&conn)?;
        schema::initialize(&conn)
            .map_err(|e| Error::Initialization(format!("failed to apply schema: {e}")))?;

        let store = Self {
            conn,
            snapshot: Some(Box::new(backend)),
        };

        if fresh {
            store.persist()?;
        }

        Ok(store)
    }

    /// Open a store whose snapshot lives in a file.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(FileSnapshot::new(path))
    }

    /// Open the default snapshot location.
    pub fn open_default() -> Result<Self> {
        Self::open_path(crate::default_db_path())
    }

    /// Open a store with no durable snapshot (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        register_functions(&conn)?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn,
            snapshot: None,
        })
    }

    /// Serialize the whole database and overwrite the snapshot.
    ///
    /// Called after every successful write. A store without a snapshot
    /// backend does nothing here.
    pub fn persist(&self) -> Result<()> {
        let Some(ref backend) = self.snapshot else {
            return Ok(());
        };

        let image = self.conn.serialize(DatabaseName::Main)?;
        let encoded = snapshot::encode_image(&image)?;
        debug!(
            "Persisting {} byte image ({} bytes encoded) to {}",
            image.len(),
            encoded.len(),
            backend.describe()
        );
        backend.save(&encoded)
    }

    /// Where the snapshot is kept, if anywhere.
    pub fn location(&self) -> Option<String> {
        self.snapshot.as_ref().map(|b| b.describe())
    }

    /// Size in bytes of the serialized database image.
    pub fn image_size(&self) -> Result<usize> {
        Ok(self.conn.serialize(DatabaseName::Main)?.len())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Rebuild a connection from an encoded snapshot.
fn restore(encoded: &str) -> Result<Connection> {
    let image = snapshot::decode_image(encoded)
        .map_err(|e| Error::Initialization(format!("snapshot is not a byte array: {e}")))?;

    if image.is_empty() {
        return Err(Error::Initialization("snapshot image is empty".to_string()));
    }

    let mut conn = Connection::open_in_memory()?;
    conn.deserialize_read_exact(DatabaseName::Main, image.as_slice(), image.len(), false)
        .map_err(|e| Error::Initialization(format!("failed to load image: {e}")))?;
    schema::verify(&conn)
        .map_err(|e| Error::Initialization(format!("snapshot is not a valid database: {e}")))?;

    debug!("Restored {} byte database image", image.len());
    Ok(conn)
}

/// Register `fold_case(text)`, a Unicode-aware lowercase used by search.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let folded = match ctx.get_raw(0) {
                ValueRef::Text(text) => Some(String::from_utf8_lossy(text).to_lowercase()),
                _ => None,
            };
            Ok(folded)
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::MemorySnapshot;

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.location().is_none());
        assert_eq!(store.record_count().unwrap(), 0);
    }

    #[test]
    fn test_open_fresh_persists_empty_image() {
        let backend = MemorySnapshot::new();
        let _store = Store::open(backend.clone()).unwrap();

        let encoded = backend.contents().expect("fresh store should be saved");
        let image = snapshot::decode_image(&encoded).unwrap();
        assert!(image.starts_with(b"SQLite format 3\0"));
    }

    #[test]
    fn test_reopen_restores_tables() {
        let backend = MemorySnapshot::new();
        {
            let store = Store::open(backend.clone()).unwrap();
            store
                .conn()
                .execute("INSERT INTO weather_records (location) VALUES ('Rome, IT')", [])
                .unwrap();
            store.persist().unwrap();
        }

        let store = Store::open(backend.clone()).unwrap();
        assert_eq!(store.record_count().unwrap(), 1);

        // The restored image stays writable and can grow.
        for _ in 0..200 {
            store
                .conn()
                .execute("INSERT INTO weather_records (location) VALUES ('Oslo, NO')", [])
                .unwrap();
        }
        store.persist().unwrap();
        assert_eq!(Store::open(backend).unwrap().record_count().unwrap(), 201);
    }

    #[test]
    fn test_open_rejects_garbage_snapshot() {
        let backend = MemorySnapshot::with_contents("[1,2,3,4,5,6,7,8]");
        let err = Store::open(backend).err().unwrap();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_open_rejects_non_array_snapshot() {
        let backend = MemorySnapshot::with_contents("{\"not\": \"bytes\"}");
        let err = Store::open(backend).err().unwrap();
        assert!(matches!(err, Error::Initialization(_)));
    }

    #[test]
    fn test_open_rejects_empty_image() {
        let err = Store::open(MemorySnapshot::with_contents("[]")).err().unwrap();
        assert!(matches!(err, Error::Initialization(_)));
    }

    #[test]
    fn test_open_path_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skylog").join("weather-database.json");

        let store = Store::open_path(&path).unwrap();

        assert!(path.exists());
        assert_eq!(store.location(), Some(path.display().to_string()));
        assert!(store.image_size().unwrap() > 0);
    }

    #[test]
    fn test_fold_case_is_unicode_aware() {
        let store = Store::open_in_memory().unwrap();
        let folded: String = store
            .conn()
            .query_row("SELECT fold_case('SÃO PAULO')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "são paulo");

        let null: Option<String> = store
            .conn()
            .query_row("SELECT fold_case(NULL)", [], |row| row.get(0))
            .unwrap();
        assert!(null.is_none());
    }
}
