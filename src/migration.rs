//! One-time migration out of the deprecated storage folder.
//!
//! Older releases kept data in `<module dir>/storage`. The first call per
//! process copies anything there that the current storage folder lacks.

use std::path::Path;
use std::sync::atomic::Ordering;

use crate::error::StorageError;
use crate::models::{MigrationOutcome, MigrationReport};
use crate::reporter::Reporter;
use crate::storage_cache::StorageContext;

impl StorageContext {
    /// Copy legacy files into the storage folder, at most once per process.
    ///
    /// The attempt is recorded before any work, so a partial failure is never
    /// retried. Destination entries that already exist are left untouched.
    pub fn migrate_storage_if_needed(&self) -> MigrationOutcome {
        if self.migrated.swap(true, Ordering::SeqCst) {
            return MigrationOutcome::AlreadyAttempted;
        }

        let reporter = self.reporter();

        let Some(module_dir) = self.module_dir().filter(|dir| dir.exists()) else {
            let reason = "Could not find mod Dll folder in this environment.".to_string();
            reporter.critical(&reason);
            return MigrationOutcome::Unavailable { reason };
        };

        let storage = match self.storage_dir() {
            Ok(storage) => storage,
            Err(e) => {
                let reason = format!("Could not get storage folder in this environment: {}", e);
                reporter.critical(&reason);
                return MigrationOutcome::Unavailable { reason };
            }
        };

        let legacy = module_dir.join(&self.config().storage_folder);
        if !legacy.is_dir() {
            return MigrationOutcome::NoLegacyStorage;
        }

        reporter.debug(&format!("Migrating legacy storage {:?} into {:?}", legacy, storage));
        MigrationOutcome::Completed(migrate_entries(&legacy, &storage, reporter))
    }
}

/// Copy each direct entry of `legacy` whose name is missing in `storage`.
fn migrate_entries(legacy: &Path, storage: &Path, reporter: &Reporter) -> MigrationReport {
    let mut report = MigrationReport::default();

    let entries = match std::fs::read_dir(legacy) {
        Ok(entries) => entries,
        Err(source) => {
            reporter.error(&format!("Failed to read legacy storage {:?}: {}", legacy, source));
            report.failed.push(StorageError::Migration {
                path: legacy.to_path_buf(),
                source,
            });
            return report;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                report.failed.push(StorageError::Migration {
                    path: legacy.to_path_buf(),
                    source,
                });
                continue;
            }
        };

        // The storage folder may live inside the legacy folder.
        if storage.starts_with(entry.path()) {
            reporter.debug(&format!("Not migrating storage folder {:?} into itself", entry.path()));
            continue;
        }

        let target = storage.join(entry.file_name());
        if target.exists() {
            report.skipped.push(target);
            continue;
        }

        match copy_entry(&entry.path(), &target) {
            Ok(()) => {
                reporter.debug(&format!("Migrated {:?}", target));
                report.copied.push(target);
            }
            Err(source) => {
                reporter.error(&format!("Failed to migrate {:?}: {}", entry.path(), source));
                report.failed.push(StorageError::Migration {
                    path: entry.path(),
                    source,
                });
            }
        }
    }

    report
}

/// Copy a file, or recreate a directory with its direct files.
fn copy_entry(from: &Path, to: &Path) -> std::io::Result<()> {
    if !from.is_dir() {
        std::fs::copy(from, to)?;
        return Ok(());
    }

    std::fs::create_dir(to)?;
    for child in std::fs::read_dir(from)? {
        let child = child?;
        if child.file_type()?.is_file() {
            std::fs::copy(child.path(), to.join(child.file_name()))?;
        }
    }
    Ok(())
}
