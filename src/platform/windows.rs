//! Windows-specific functionality.

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::path::PathBuf;

use ::windows::core::PCWSTR;
use ::windows::Win32::Foundation::HMODULE;
use ::windows::Win32::System::LibraryLoader::{
    GetModuleFileNameW, GetModuleHandleExW, GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS,
    GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
};

/// Longest module path we are prepared to read, in UTF-16 units.
const MAX_MODULE_PATH: usize = 32 * 1024;

/// Arguments of the current process, program name excluded.
///
/// The standard library parses `GetCommandLineW` with `CommandLineToArgvW` rules.
pub fn command_line_args() -> Vec<String> {
    std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().to_string())
        .collect()
}

/// File of the loaded module (DLL) containing this function.
pub fn module_file() -> Option<PathBuf> {
    let mut module = HMODULE::default();
    let probe = module_file as *const u16;

    // SAFETY: with FROM_ADDRESS the name argument is an address inside the
    // module; UNCHANGED_REFCOUNT means the handle must not be freed.
    unsafe {
        GetModuleHandleExW(
            GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS | GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
            PCWSTR(probe),
            &mut module,
        )
        .ok()?;
    }

    let mut buffer = vec![0u16; 1024];
    loop {
        // SAFETY: buffer is a valid, writable slice.
        let len = unsafe { GetModuleFileNameW(module, &mut buffer) } as usize;
        if len == 0 {
            return None;
        }
        if len < buffer.len() {
            return Some(PathBuf::from(OsString::from_wide(&buffer[..len])));
        }
        if buffer.len() >= MAX_MODULE_PATH {
            return None;
        }
        // Truncated: grow and retry.
        buffer.resize(buffer.len() * 2, 0);
    }
}
