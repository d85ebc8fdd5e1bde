//! Unix-specific functionality.

use std::ffi::{CStr, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

const PROC_CMDLINE: &str = "/proc/self/cmdline";

/// Arguments of the current process, program name excluded.
///
/// Reads procfs first, since a shared module loaded into a host process may
/// not see the host's `argv` through the standard library.
pub fn command_line_args() -> Vec<String> {
    match std::fs::read(PROC_CMDLINE) {
        Ok(raw) => split_cmdline(&raw),
        Err(_) => std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().to_string())
            .collect(),
    }
}

/// Split a NUL-separated `cmdline` buffer and drop argument 0.
fn split_cmdline(raw: &[u8]) -> Vec<String> {
    let raw = raw.strip_suffix(b"\0").unwrap_or(raw);
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(|b| *b == 0)
        .skip(1)
        .map(|arg| String::from_utf8_lossy(arg).to_string())
        .collect()
}

/// File of the loaded object containing this function.
pub fn module_file() -> Option<PathBuf> {
    // SAFETY: Dl_info is plain data; dladdr only writes into it.
    let mut info: libc::Dl_info = unsafe { std::mem::zeroed() };
    let probe = module_file as *const libc::c_void;

    // SAFETY: probe is the address of a function in this module.
    let found = unsafe { libc::dladdr(probe, &mut info) };
    if found == 0 || info.dli_fname.is_null() {
        return None;
    }

    // SAFETY: dli_fname is a NUL-terminated string owned by the loader.
    let name = unsafe { CStr::from_ptr(info.dli_fname) };
    if name.to_bytes().is_empty() {
        return None;
    }

    let path = PathBuf::from(OsStr::from_bytes(name.to_bytes()));
    if path.is_absolute() {
        Some(path)
    } else {
        // The main executable is reported as invoked.
        std::fs::canonicalize(&path).ok()
    }
}
