//! Registry export
//!
//! Whole-registry snapshots as versioned JSON:
//! - [`save`] / [`load`]: in-memory byte buffers
//! - [`save_to_path`] / [`load_from_path`]: files, written atomically
//!
//! Restoring a snapshot raises the process-wide id counters past every id it
//! contains, so entities created afterwards never collide with restored ones.

mod file;
mod snapshot;

pub use file::{load_from_path, load_from_path_with_settings, save_to_path};
pub use snapshot::{load, load_with_settings, save, PersistenceError, Snapshot, FORMAT_VERSION};
