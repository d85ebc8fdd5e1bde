//! FileXT Storage Library
//!
//! Resolves, caches and migrates the directory FileXT keeps its data in.

pub mod error;
mod migration;
pub mod models;
pub mod platform;
pub mod reporter;
pub mod storage_cache;
pub mod storage_resolver;

use std::path::PathBuf;

pub use error::StorageError;
pub use models::{MigrationOutcome, ProfileFlavor, StorageConfig};
pub use platform::{Platform, StaticPlatform, SystemPlatform};
pub use reporter::Reporter;
pub use storage_cache::StorageContext;

/// Storage folder of the process-wide context.
pub fn storage_dir() -> Result<PathBuf, StorageError> {
    StorageContext::global().storage_dir()
}

/// Log file path of the process-wide context.
pub fn log_file_path() -> Result<PathBuf, StorageError> {
    StorageContext::global().log_file_path()
}

/// Migrate legacy storage using the process-wide context.
pub fn migrate_storage_if_needed() -> MigrationOutcome {
    StorageContext::global().migrate_storage_if_needed()
}
