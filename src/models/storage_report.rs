//! Results of migration and the report printed by the binary.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::StorageError;

/// What a call to `migrate_storage_if_needed` did.
#[derive(Debug)]
pub enum MigrationOutcome {
    /// Migration already ran (or was attempted) in this process.
    AlreadyAttempted,
    /// The module folder or the storage folder was missing.
    Unavailable { reason: String },
    /// There is no legacy storage folder to migrate from.
    NoLegacyStorage,
    Completed(MigrationReport),
}

impl MigrationOutcome {
    pub fn report(&self) -> Option<&MigrationReport> {
        match self {
            MigrationOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}

/// Per-entry results of a completed migration.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Destination paths that were written
    pub copied: Vec<PathBuf>,
    /// Destination paths that already existed
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<StorageError>,
}

/// JSON summary printed by the `filext-storage` binary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageReport {
    pub storage_directory: String,
    pub log_file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration: Option<MigrationSummary>,
}

/// Serializable view of a [`MigrationOutcome`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MigrationSummary {
    AlreadyAttempted,
    Unavailable { reason: String },
    NoLegacyStorage,
    Completed {
        copied: Vec<String>,
        skipped: Vec<String>,
        failed: Vec<String>,
    },
}

impl From<&MigrationOutcome> for MigrationSummary {
    fn from(outcome: &MigrationOutcome) -> Self {
        let lossy = |paths: &[PathBuf]| -> Vec<String> {
            paths
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect()
        };

        match outcome {
            MigrationOutcome::AlreadyAttempted => MigrationSummary::AlreadyAttempted,
            MigrationOutcome::Unavailable { reason } => MigrationSummary::Unavailable {
                reason: reason.clone(),
            },
            MigrationOutcome::NoLegacyStorage => MigrationSummary::NoLegacyStorage,
            MigrationOutcome::Completed(report) => MigrationSummary::Completed {
                copied: lossy(&report.copied),
                skipped: lossy(&report.skipped),
                failed: report.failed.iter().map(describe).collect(),
            },
        }
    }
}

fn describe(err: &StorageError) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{}: {}", err, source),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialization() {
        let outcome = MigrationOutcome::Completed(MigrationReport {
            copied: vec![PathBuf::from("/p/storage/a.json")],
            ..MigrationReport::default()
        });
        let report = StorageReport {
            storage_directory: "/p/storage".to_string(),
            log_file_path: "/p/filext_log.log".to_string(),
            migration: Some(MigrationSummary::from(&outcome)),
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"storageDirectory\":\"/p/storage\""));
        assert!(json.contains("\"status\":\"completed\""));
        assert!(json.contains("a.json"));
    }

    #[test]
    fn test_report_only_for_completed() {
        assert!(MigrationOutcome::AlreadyAttempted.report().is_none());
        assert!(MigrationOutcome::Completed(MigrationReport::default())
            .report()
            .is_some());
    }
}
