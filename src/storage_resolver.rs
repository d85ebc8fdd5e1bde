//! Decides which directory holds persistent data.

use std::path::PathBuf;

use crate::error::StorageError;
use crate::models::{ProfileArgs, ProfileFlavor, StorageConfig};
use crate::platform::Platform;
use crate::reporter::Reporter;

/// Walks the fallback chain: command-line override, platform default
/// profile folder, module storage folder, current working directory.
///
/// Reads OS state through [`Platform`] and caches nothing.
pub struct StorageResolver<'a> {
    platform: &'a dyn Platform,
    config: &'a StorageConfig,
    reporter: &'a Reporter,
}

impl<'a> StorageResolver<'a> {
    pub fn new(platform: &'a dyn Platform, config: &'a StorageConfig, reporter: &'a Reporter) -> Self {
        Self {
            platform,
            config,
            reporter,
        }
    }

    /// Resolve the storage folder.
    ///
    /// Profile candidates are returned without checking that they exist; the
    /// cache layer validates them. Fails only when even the current working
    /// directory is unavailable.
    pub fn resolve(&self) -> Result<PathBuf, StorageError> {
        let cmdline = self.platform.command_line_args();
        let args = ProfileArgs::scan(cmdline.as_slice());

        if let Some(path) = self.profile_folder(&args) {
            return Ok(path);
        }

        // Fall-back to mod folder
        if let Some(module_dir) = self.platform.module_dir().filter(|dir| dir.exists()) {
            let path = module_dir.join(&self.config.storage_folder);
            self.reporter
                .debug(&format!("No profile folder available, using mod folder: {:?}", path));
            return Ok(path);
        }

        // Fall-back to current working directory
        if let Some(cwd) = self.platform.current_dir() {
            self.reporter.debug(&format!(
                "Mod folder unavailable, using working directory: {:?}",
                cwd
            ));
            return Ok(cwd);
        }

        self.reporter.critical("Could not find any usable directory in this environment.");
        Err(StorageError::FatalEnvironment)
    }

    /// Profile folder from `-profiles=` or the platform default.
    fn profile_folder(&self, args: &ProfileArgs) -> Option<PathBuf> {
        // An explicit override is the exact target, even on POSIX hosts.
        // An empty override counts as no override.
        if let Some(folder) = args.profiles.as_deref().filter(|folder| !folder.is_empty()) {
            return Some(PathBuf::from(folder));
        }

        match self.config.flavor {
            ProfileFlavor::Documents => self
                .platform
                .documents_dir()
                .map(|documents| documents.join(&self.config.product_folder)),
            ProfileFlavor::ExecutableSibling => {
                let name = args.profile_name(&self.config.default_profile_name);
                self.platform.executable_dir().map(|exe_dir| exe_dir.join(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::StaticPlatform;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn resolve(platform: &StaticPlatform, flavor: ProfileFlavor) -> Result<PathBuf, StorageError> {
        let config = StorageConfig::default().with_flavor(flavor);
        let reporter = Reporter::silent();
        StorageResolver::new(platform, &config, &reporter).resolve()
    }

    #[test]
    fn test_profiles_override_is_verbatim_on_both_flavors() {
        let platform = StaticPlatform {
            command_line_args: args(&["-profiles=./relative/../profiles/"]),
            executable_dir: Some(PathBuf::from("/opt/arma")),
            documents_dir: Some(PathBuf::from("/home/u/Documents")),
            ..StaticPlatform::default()
        };

        for flavor in [ProfileFlavor::Documents, ProfileFlavor::ExecutableSibling] {
            let path = resolve(&platform, flavor).unwrap();
            assert_eq!(path.as_os_str(), "./relative/../profiles/");
        }
    }

    #[test]
    fn test_name_and_profiles_on_posix() {
        let platform = StaticPlatform {
            command_line_args: args(&["-name=alice", "-profiles=/data/profiles"]),
            executable_dir: Some(PathBuf::from("/opt/arma")),
            ..StaticPlatform::default()
        };
        let path = resolve(&platform, ProfileFlavor::ExecutableSibling).unwrap();
        assert_eq!(path, PathBuf::from("/data/profiles"));
    }

    #[test]
    fn test_posix_default_profile_name_is_player() {
        let platform = StaticPlatform {
            command_line_args: args(&["-port=2302", "-mod=@filext"]),
            executable_dir: Some(PathBuf::from("/opt/arma")),
            ..StaticPlatform::default()
        };
        let path = resolve(&platform, ProfileFlavor::ExecutableSibling).unwrap();
        assert_eq!(path, PathBuf::from("/opt/arma/player"));
    }

    #[test]
    fn test_posix_named_profile() {
        let platform = StaticPlatform {
            command_line_args: args(&["-name=server"]),
            executable_dir: Some(PathBuf::from("/opt/arma")),
            ..StaticPlatform::default()
        };
        let path = resolve(&platform, ProfileFlavor::ExecutableSibling).unwrap();
        assert_eq!(path, PathBuf::from("/opt/arma/server"));
    }

    #[test]
    fn test_documents_default() {
        let platform = StaticPlatform {
            documents_dir: Some(PathBuf::from("C:/Users/u/Documents")),
            ..StaticPlatform::default()
        };
        let path = resolve(&platform, ProfileFlavor::Documents).unwrap();
        assert_eq!(path, PathBuf::from("C:/Users/u/Documents").join("Arma 3"));
    }

    #[test]
    fn test_unavailable_profile_falls_back_to_module_storage() {
        let module = tempfile::tempdir().unwrap();
        let platform = StaticPlatform {
            module_dir: Some(module.path().to_path_buf()),
            current_dir: Some(PathBuf::from("/cwd")),
            ..StaticPlatform::default()
        };

        for flavor in [ProfileFlavor::Documents, ProfileFlavor::ExecutableSibling] {
            let path = resolve(&platform, flavor).unwrap();
            assert_eq!(path, module.path().join("storage"));
        }
    }

    #[test]
    fn test_empty_profiles_override_uses_platform_default() {
        let module = tempfile::tempdir().unwrap();
        let platform = StaticPlatform {
            command_line_args: args(&["-profiles="]),
            executable_dir: Some(PathBuf::from("/opt/arma")),
            documents_dir: Some(PathBuf::from("/home/u/Documents")),
            module_dir: Some(module.path().to_path_buf()),
            ..StaticPlatform::default()
        };

        let path = resolve(&platform, ProfileFlavor::ExecutableSibling).unwrap();
        assert_eq!(path, PathBuf::from("/opt/arma/player"));

        let path = resolve(&platform, ProfileFlavor::Documents).unwrap();
        assert_eq!(path, PathBuf::from("/home/u/Documents").join("Arma 3"));
    }

    #[test]
    fn test_missing_module_dir_falls_back_to_cwd() {
        let platform = StaticPlatform {
            module_dir: Some(PathBuf::from("/definitely/not/here")),
            current_dir: Some(PathBuf::from("/srv/arma")),
            ..StaticPlatform::default()
        };
        let path = resolve(&platform, ProfileFlavor::ExecutableSibling).unwrap();
        assert_eq!(path, PathBuf::from("/srv/arma"));
    }

    #[test]
    fn test_total_failure_is_fatal() {
        let platform = StaticPlatform::default();
        let err = resolve(&platform, ProfileFlavor::ExecutableSibling).unwrap_err();
        assert!(err.is_fatal());
    }
}
