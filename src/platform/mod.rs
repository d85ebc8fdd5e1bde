//! Platform-specific functionality.
//!
//! Every OS query the resolver depends on goes through [`Platform`], so the
//! resolution chain can run against the real OS ([`SystemPlatform`]) or a fixed
//! set of answers ([`StaticPlatform`]). An unavailable query is `None`, never an
//! empty path.

#[cfg(unix)]
mod unix;

#[cfg(windows)]
mod windows;

#[cfg(unix)]
use self::unix as os;

#[cfg(windows)]
use self::windows as os;

use std::path::PathBuf;
use std::sync::OnceLock;

/// OS queries feeding storage resolution.
pub trait Platform: Send + Sync {
    /// Directory containing the running executable.
    fn executable_dir(&self) -> Option<PathBuf>;

    /// Invocation arguments, program name excluded.
    fn command_line_args(&self) -> Vec<String>;

    /// Directory containing the shared module this code was loaded from.
    fn module_dir(&self) -> Option<PathBuf>;

    /// The user's Documents known folder.
    fn documents_dir(&self) -> Option<PathBuf>;

    /// Current working directory.
    fn current_dir(&self) -> Option<PathBuf>;
}

/// The real operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn executable_dir(&self) -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    fn command_line_args(&self) -> Vec<String> {
        os::command_line_args()
    }

    fn module_dir(&self) -> Option<PathBuf> {
        own_module_dir().clone()
    }

    fn documents_dir(&self) -> Option<PathBuf> {
        dirs::document_dir()
    }

    fn current_dir(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }
}

/// Parent of the loaded module containing this crate's code.
///
/// A loaded module never moves, so the lookup runs once per process.
pub fn own_module_dir() -> &'static Option<PathBuf> {
    static MODULE_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

    MODULE_DIR.get_or_init(|| {
        os::module_file()
            .and_then(|file| file.parent().map(PathBuf::from))
            .filter(|dir| !dir.as_os_str().is_empty())
    })
}

/// Fixed answers for every query.
///
/// Used by tests, and by the binary to replace individual answers of the real
/// OS (see [`StaticPlatform::snapshot`]).
#[derive(Debug, Clone, Default)]
pub struct StaticPlatform {
    pub executable_dir: Option<PathBuf>,
    pub command_line_args: Vec<String>,
    pub module_dir: Option<PathBuf>,
    pub documents_dir: Option<PathBuf>,
    pub current_dir: Option<PathBuf>,
}

impl StaticPlatform {
    /// Capture the current answers of another platform.
    pub fn snapshot(platform: &dyn Platform) -> Self {
        Self {
            executable_dir: platform.executable_dir(),
            command_line_args: platform.command_line_args(),
            module_dir: platform.module_dir(),
            documents_dir: platform.documents_dir(),
            current_dir: platform.current_dir(),
        }
    }
}

impl Platform for StaticPlatform {
    fn executable_dir(&self) -> Option<PathBuf> {
        self.executable_dir.clone()
    }

    fn command_line_args(&self) -> Vec<String> {
        self.command_line_args.clone()
    }

    fn module_dir(&self) -> Option<PathBuf> {
        self.module_dir.clone()
    }

    fn documents_dir(&self) -> Option<PathBuf> {
        self.documents_dir.clone()
    }

    fn current_dir(&self) -> Option<PathBuf> {
        self.current_dir.clone()
    }
}
