//! Local persistence for the skylog weather journal.
//!
//! The journal is an in-memory SQLite database whose whole image is
//! serialized to a durable snapshot after every write, so the data survives
//! between sessions without the database ever living in a regular file.
//!
//! # Features
//!
//! - Create, read, update and delete weather records
//! - Case-insensitive search over location, description and date range
//! - Pluggable snapshot backends (file or memory)
//! - Session state for the fetch, save and edit flows
//! - JSON, CSV, XML and Markdown exports
//!
//! # Example
//!
//! ```no_run
//! use skylog_store::{RecordQuery, Store};
//!
//! let store = Store::open_default()?;
//!
//! // Five most recent records mentioning Paris
//! let query = RecordQuery::new().search("paris").limit(5);
//! let records = store.list_records(&query)?;
//! # Ok::<(), skylog_store::Error>(())
//! ```

mod error;
mod export;
mod models;
mod queries;
mod repository;
mod schema;
mod session;
mod snapshot;
mod store;
mod timestamps;

pub use error::{Error, Result};
pub use export::{CSV_HEADER, ExportFormat, export_records};
pub use models::{RecordEdit, SaveOutcome, WeatherRecord};
pub use queries::RecordQuery;
pub use session::Session;
pub use snapshot::{FileSnapshot, MemorySnapshot, SnapshotBackend, decode_image, encode_image};
pub use store::Store;

/// Default snapshot path following platform conventions.
///
/// - Linux: `~/.local/share/skylog/weather-database.json`
/// - macOS: `~/Library/Application Support/skylog/weather-database.json`
/// - Windows: `C:\Users\<user>\AppData\Local\skylog\weather-database.json`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("skylog")
        .join("weather-database.json")
}
