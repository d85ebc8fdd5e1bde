//! Resolve-once storage context.
//!
//! [`StorageContext`] owns everything resolution needs and memoizes the
//! results. Each access re-checks that the cached storage folder still exists
//! and re-resolves once if it was removed out-of-band.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::error::StorageError;
use crate::models::StorageConfig;
use crate::platform::{Platform, SystemPlatform};
use crate::reporter::Reporter;
use crate::storage_resolver::StorageResolver;

/// Paths resolved so far.
#[derive(Debug, Default)]
struct ResolvedStorageState {
    storage_dir: Option<PathBuf>,
    log_file_path: Option<PathBuf>,
}

/// Owned storage context, passed to whatever needs storage paths.
pub struct StorageContext {
    platform: Box<dyn Platform>,
    config: StorageConfig,
    reporter: Reporter,
    state: Mutex<ResolvedStorageState>,
    pub(crate) migrated: AtomicBool,
}

impl StorageContext {
    pub fn new(platform: Box<dyn Platform>, config: StorageConfig, reporter: Reporter) -> Self {
        Self {
            platform,
            config,
            reporter,
            state: Mutex::new(ResolvedStorageState::default()),
            migrated: AtomicBool::new(false),
        }
    }

    /// Context over the real OS with default configuration, created on first use.
    pub fn global() -> &'static StorageContext {
        static GLOBAL: OnceLock<StorageContext> = OnceLock::new();

        GLOBAL.get_or_init(|| {
            let config = StorageConfig::default();
            let reporter = Reporter::new(config.log_level);
            StorageContext::new(Box::new(SystemPlatform), config, reporter)
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Directory of the loaded module, if the OS could tell.
    pub fn module_dir(&self) -> Option<PathBuf> {
        self.platform.module_dir()
    }

    /// Run the fallback chain without touching the cache.
    pub fn resolve_storage_dir(&self) -> Result<PathBuf, StorageError> {
        StorageResolver::new(self.platform.as_ref(), &self.config, &self.reporter).resolve()
    }

    /// The storage folder, creating it if needed.
    ///
    /// Returns the cached path while it still exists. Otherwise re-resolves:
    /// the resolved profile folder (or the module folder when the profile
    /// folder is missing) gets a `storage` subfolder, created one level deep.
    /// A creation failure clears the cache and is returned as a non-fatal
    /// [`StorageError::DirectoryCreation`].
    pub fn storage_dir(&self) -> Result<PathBuf, StorageError> {
        let mut state = self.lock_state();

        if let Some(dir) = state.storage_dir.as_ref().filter(|dir| dir.exists()) {
            return Ok(dir.clone());
        }

        self.reporter.debug(
            "File storage directory isn't set or doesn't exist. Attempting to find or create it now.",
        );

        let mut folder = self.resolve_storage_dir()?;
        self.reporter.debug(&format!("Profile Folder: {:?}", folder));

        if !folder.exists() {
            self.reporter.critical(&format!(
                "The server profile folder was not found: {:?}. Attempting to fallback to mod folder.",
                folder
            ));

            // Fall-back to mod folder
            match self.platform.module_dir() {
                Some(module_dir) => {
                    if !module_dir.exists() {
                        self.reporter.critical(&format!(
                            "The FileXT mod folder was not found: {:?}",
                            module_dir
                        ));
                    }
                    folder = module_dir;
                }
                None => {
                    self.reporter.critical("The FileXT mod folder could not be determined.");
                }
            }
        }

        let storage = folder.join(&self.config.storage_folder);

        if !storage.exists() {
            self.reporter.info(&format!(
                "Storage folder not found, creating it now: {:?}",
                storage
            ));

            if let Err(source) = create_storage_dir(&storage) {
                self.reporter.critical(&format!(
                    "The file storage directory could not be created: {}",
                    source
                ));
                state.storage_dir = None;
                return Err(StorageError::DirectoryCreation {
                    path: storage,
                    source,
                });
            }
        }

        state.storage_dir = Some(storage.clone());
        Ok(storage)
    }

    /// Path of the log file inside the resolved profile folder.
    ///
    /// Uses the raw resolver result, not the created storage folder, so it
    /// can differ from [`StorageContext::storage_dir`]. Cached after the first
    /// successful computation.
    pub fn log_file_path(&self) -> Result<PathBuf, StorageError> {
        let mut state = self.lock_state();

        if let Some(path) = &state.log_file_path {
            return Ok(path.clone());
        }

        let path = self.resolve_storage_dir()?.join(&self.config.log_file_name);
        state.log_file_path = Some(path.clone());
        Ok(path)
    }

    fn lock_state(&self) -> MutexGuard<'_, ResolvedStorageState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Single-level creation; losing a creation race to another process is fine.
fn create_storage_dir(storage: &Path) -> std::io::Result<()> {
    match std::fs::create_dir(storage) {
        Err(e) if e.kind() == ErrorKind::AlreadyExists && storage.is_dir() => Ok(()),
        result => result,
    }
}

impl std::fmt::Debug for StorageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageContext")
            .field("config", &self.config)
            .field("state", &*self.lock_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogLevel, ProfileFlavor};
    use crate::platform::StaticPlatform;
    use crate::reporter::tests::Captured;

    fn context(platform: StaticPlatform) -> StorageContext {
        let config = StorageConfig::default().with_flavor(ProfileFlavor::ExecutableSibling);
        StorageContext::new(Box::new(platform), config, Reporter::silent())
    }

    #[test]
    fn test_existing_profile_gets_storage_subfolder() {
        let profiles = tempfile::tempdir().unwrap();
        let ctx = context(StaticPlatform {
            command_line_args: vec![format!("-profiles={}", profiles.path().display())],
            ..StaticPlatform::default()
        });

        let storage = ctx.storage_dir().unwrap();
        assert_eq!(storage, profiles.path().join("storage"));
        assert!(storage.is_dir());
    }

    #[test]
    fn test_repeated_calls_return_same_path_without_recreating() {
        let exe_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(exe_dir.path().join("player")).unwrap();
        let ctx = context(StaticPlatform {
            executable_dir: Some(exe_dir.path().to_path_buf()),
            ..StaticPlatform::default()
        });

        let first = ctx.storage_dir().unwrap();
        let marker = first.join("marker.json");
        std::fs::write(&marker, "{}").unwrap();

        let second = ctx.storage_dir().unwrap();
        assert_eq!(first, second);
        assert!(marker.exists());
    }

    #[test]
    fn test_missing_profile_falls_back_to_module_folder() {
        let exe_dir = tempfile::tempdir().unwrap();
        let module = tempfile::tempdir().unwrap();
        let ctx = context(StaticPlatform {
            executable_dir: Some(exe_dir.path().to_path_buf()),
            module_dir: Some(module.path().to_path_buf()),
            ..StaticPlatform::default()
        });

        let storage = ctx.storage_dir().unwrap();
        assert_eq!(storage, module.path().join("storage"));
    }

    #[test]
    fn test_removed_storage_is_resolved_again() {
        let profiles = tempfile::tempdir().unwrap();
        let ctx = context(StaticPlatform {
            command_line_args: vec![format!("-profiles={}", profiles.path().display())],
            ..StaticPlatform::default()
        });

        let storage = ctx.storage_dir().unwrap();
        std::fs::remove_dir(&storage).unwrap();

        assert_eq!(ctx.storage_dir().unwrap(), storage);
        assert!(storage.is_dir());
    }

    #[test]
    fn test_creation_failure_is_reported_and_not_cached() {
        let sink = Captured::default();
        let config = StorageConfig::default().with_flavor(ProfileFlavor::ExecutableSibling);
        let ctx = StorageContext::new(
            Box::new(StaticPlatform {
                command_line_args: vec!["-profiles=/definitely/not/here".to_string()],
                module_dir: Some(PathBuf::from("/also/not/here")),
                ..StaticPlatform::default()
            }),
            config,
            Reporter::to_writer(LogLevel::Debug, sink.clone()),
        );

        let err = ctx.storage_dir().unwrap_err();
        assert!(!err.is_fatal());
        assert!(matches!(err, StorageError::DirectoryCreation { ref path, .. }
            if path == &PathBuf::from("/also/not/here/storage")));
        assert!(ctx.lock_state().storage_dir.is_none());
        assert!(sink.lines().iter().any(|m| m.level == LogLevel::Critical));
    }

    #[test]
    fn test_storage_created_concurrently_counts_as_created() {
        let profiles = tempfile::tempdir().unwrap();
        let storage = profiles.path().join("storage");
        std::fs::create_dir(&storage).unwrap();

        assert!(create_storage_dir(&storage).is_ok());

        let file = profiles.path().join("not-a-dir");
        std::fs::write(&file, "").unwrap();
        let err = create_storage_dir(&file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_log_path_uses_raw_resolver_result() {
        let ctx = context(StaticPlatform {
            command_line_args: vec!["-profiles=/definitely/not/here".to_string()],
            ..StaticPlatform::default()
        });

        assert!(ctx.storage_dir().is_err());
        assert_eq!(
            ctx.log_file_path().unwrap(),
            PathBuf::from("/definitely/not/here/filext_log.log")
        );
    }

    #[test]
    fn test_fatal_resolution_propagates() {
        let ctx = context(StaticPlatform::default());
        assert!(ctx.storage_dir().unwrap_err().is_fatal());
        assert!(ctx.log_file_path().unwrap_err().is_fatal());
    }
}
