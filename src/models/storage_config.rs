//! Storage configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::LogLevel;

/// Where the host keeps its default profile folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileFlavor {
    /// `<Documents>/<product folder>` (Windows hosts).
    Documents,
    /// `<executable dir>/<profile name>` (POSIX hosts).
    ExecutableSibling,
}

impl ProfileFlavor {
    /// Flavor of the platform this crate was compiled for.
    pub fn native() -> Self {
        if cfg!(windows) {
            ProfileFlavor::Documents
        } else {
            ProfileFlavor::ExecutableSibling
        }
    }
}

impl Default for ProfileFlavor {
    fn default() -> Self {
        Self::native()
    }
}

/// Names and policies used while resolving the storage directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    /// Folder appended to Documents for the default Windows profile
    pub product_folder: String,

    /// Profile name used on POSIX hosts when `-name=` is absent
    pub default_profile_name: String,

    /// Storage subfolder created under the profile or module folder
    pub storage_folder: String,

    /// Log file name inside the profile folder
    pub log_file_name: String,

    pub flavor: ProfileFlavor,

    /// Minimum level the reporter writes
    pub log_level: LogLevel,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            product_folder: "Arma 3".to_string(),
            default_profile_name: "player".to_string(),
            storage_folder: "storage".to_string(),
            log_file_name: "filext_log.log".to_string(),
            flavor: ProfileFlavor::native(),
            log_level: LogLevel::Info,
        }
    }
}

impl StorageConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse storage configuration: {:?}", path))
    }

    /// Same configuration with a different profile flavor.
    pub fn with_flavor(mut self, flavor: ProfileFlavor) -> Self {
        self.flavor = flavor;
        self
    }
}
