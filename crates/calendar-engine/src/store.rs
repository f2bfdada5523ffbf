//! JSON file persistence for a [`Calendar`].
//!
//! The engine itself never touches the disk. This store is the collaborator a
//! front end uses to load the collection at startup and to save it after every
//! accepted mutation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::StoreError;
use crate::event::{Calendar, CalendarRecord};

/// A calendar persisted as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the calendar, or an empty one if the file does not exist yet.
    pub fn load(&self) -> Result<Calendar, StoreError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no event store yet, starting empty");
            return Ok(Calendar::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let calendar = from_json(&content)?;
        info!(path = %self.path.display(), events = calendar.len(), "event store loaded");
        Ok(calendar)
    }

    /// Write the calendar, replacing the file atomically.
    pub fn save(&self, calendar: &Calendar) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = to_json(calendar)?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        info!(path = %self.path.display(), events = calendar.len(), "event store saved");
        Ok(())
    }
}

/// Parse a calendar from its JSON form.
///
/// Collection invariant violations (duplicate ids, ids at or above `nextId`)
/// are reported as [`StoreError::Corrupt`] rather than as generic JSON errors.
pub fn from_json(content: &str) -> Result<Calendar, StoreError> {
    let record: CalendarRecord = serde_json::from_str(content)?;
    Calendar::try_from(record).map_err(StoreError::Corrupt)
}

pub fn to_json(calendar: &Calendar) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(calendar)?)
}
