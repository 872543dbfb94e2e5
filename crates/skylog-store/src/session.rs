//! Per-session state shared by the fetch, save and edit flows.
//!
//! A [`Session`] remembers the most recently fetched lookup and which stored
//! record, if any, is being edited. The store itself stays stateless between
//! calls; only the session decides whether "save" means insert or update.

use tracing::{debug, info};

use skylog_types::WeatherSnapshot;

use crate::error::{Error, Result};
use crate::models::{RecordEdit, SaveOutcome, WeatherRecord};
use crate::store::Store;

/// State for one interactive session.
#[derive(Debug, Default, Clone)]
pub struct Session {
    fetched: Option<WeatherSnapshot>,
    editing: Option<i64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a freshly fetched lookup, replacing any previous one.
    pub fn set_fetched(&mut self, snapshot: WeatherSnapshot) {
        debug!("Session now holds lookup for {}", snapshot.location);
        self.fetched = Some(snapshot);
    }

    /// The most recently fetched lookup.
    pub fn fetched(&self) -> Option<&WeatherSnapshot> {
        self.fetched.as_ref()
    }

    /// Id of the record under edit.
    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    /// Start editing a stored record and return its current contents.
    pub fn begin_edit(&mut self, store: &Store, id: i64) -> Result<WeatherRecord> {
        let record = store.get_record(id)?.ok_or(Error::RecordNotFound(id))?;
        info!("Editing record {} ({})", id, record.location);
        self.editing = Some(id);
        Ok(record)
    }

    /// Discard the fetched lookup and stop editing, writing nothing.
    ///
    /// Returns the id that was under edit.
    pub fn cancel(&mut self) -> Option<i64> {
        self.fetched = None;
        let id = self.stop_edit();
        debug!("Session reset");
        id
    }

    /// Leave edit mode but keep the fetched lookup.
    ///
    /// Used when the record under edit goes away.
    pub fn stop_edit(&mut self) -> Option<i64> {
        let id = self.editing.take();
        if let Some(id) = id {
            debug!("Stopped editing record {}", id);
        }
        id
    }

    /// Save the fetched lookup.
    ///
    /// Inserts a new record, or overwrites the record under edit and leaves
    /// edit mode. If the write fails the session stays in edit mode so a
    /// retry still updates the same record. The fetched lookup is kept
    /// either way so it can be saved again.
    pub fn save(&mut self, store: &Store) -> Result<SaveOutcome> {
        let snapshot = self.fetched.as_ref().ok_or(Error::NothingToSave)?;

        match self.editing {
            Some(id) => {
                let changed = store.update_record(id, snapshot)?;
                self.editing = None;
                if changed == 0 {
                    return Err(Error::RecordNotFound(id));
                }
                Ok(SaveOutcome::Updated(id))
            }
            None => store.insert_record(snapshot).map(SaveOutcome::Inserted),
        }
    }

    /// Apply field changes to the record under edit and leave edit mode.
    ///
    /// On a constraint failure the session stays in edit mode so the caller
    /// can correct the input and retry.
    pub fn commit_edit(&mut self, store: &Store, edit: &RecordEdit) -> Result<WeatherRecord> {
        let id = self.editing.ok_or(Error::NotEditing)?;

        let Some(current) = store.get_record(id)? else {
            self.editing = None;
            return Err(Error::RecordNotFound(id));
        };

        let updated = edit.apply(&current);
        if store.update_record(id, &updated)? == 0 {
            self.editing = None;
            return Err(Error::RecordNotFound(id));
        }
        self.editing = None;

        store.get_record(id)?.ok_or(Error::RecordNotFound(id))
    }
}
