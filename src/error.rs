//! Error types for storage resolution.

use std::path::PathBuf;

/// Failures surfaced by storage resolution, caching and migration.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No tier of the fallback chain produced a directory, not even the
    /// current working directory.
    #[error("FileXT: Fatal error, couldn't get a valid directory.")]
    FatalEnvironment,

    /// The storage folder did not exist and could not be created.
    #[error("the file storage directory could not be created: {path:?}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single legacy entry could not be copied.
    #[error("failed to migrate {path:?}")]
    Migration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Only a total environment failure should abort initialization.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StorageError::FatalEnvironment)
    }
}
