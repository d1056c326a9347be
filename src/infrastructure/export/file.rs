//! Snapshot files
//!
//! Writes go to a temp file in the target directory which is then renamed
//! over the destination, so readers see either the old or the new snapshot.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use super::snapshot::{load_with_settings, save, PersistenceError};
use crate::domain::aggregates::Universe;
use crate::domain::value_objects::RegistrySettings;

pub fn save_to_path(universe: &Universe, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let bytes = save(universe)?;

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| PersistenceError::Io(err.error))?;
    debug!(path = %path.display(), bytes = bytes.len(), "snapshot written");
    Ok(())
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Universe, PersistenceError> {
    load_from_path_with_settings(path, RegistrySettings::default())
}

pub fn load_from_path_with_settings(
    path: impl AsRef<Path>,
    settings: RegistrySettings,
) -> Result<Universe, PersistenceError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "snapshot read");
    load_with_settings(&bytes, settings)
}
