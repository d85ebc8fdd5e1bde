//! Data models for storage resolution.

mod log_message;
mod profile_args;
mod storage_config;
mod storage_report;

pub use log_message::*;
pub use profile_args::*;
pub use storage_config::*;
pub use storage_report::*;
