//! Diagnostic reporting via JSON lines.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::models::{LogLevel, LogMessage};

/// Thread-safe reporter that writes one JSON [`LogMessage`] per line.
#[derive(Clone)]
pub struct Reporter {
    inner: Arc<ReporterInner>,
}

struct ReporterInner {
    min_level: LogLevel,
    output: Mutex<Option<Box<dyn Write + Send>>>,
}

impl Reporter {
    /// Reporter writing to stderr.
    pub fn new(min_level: LogLevel) -> Self {
        Self::to_writer(min_level, io::stderr())
    }

    /// Reporter writing to an arbitrary sink.
    pub fn to_writer<W: Write + Send + 'static>(min_level: LogLevel, writer: W) -> Self {
        Self {
            inner: Arc::new(ReporterInner {
                min_level,
                output: Mutex::new(Some(Box::new(writer))),
            }),
        }
    }

    /// Reporter that drops everything.
    pub fn silent() -> Self {
        Self {
            inner: Arc::new(ReporterInner {
                min_level: LogLevel::Critical,
                output: Mutex::new(None),
            }),
        }
    }

    /// Send a log message if it meets the minimum level.
    pub fn send_log(&self, level: LogLevel, message: &str) {
        if level < self.inner.min_level {
            return;
        }
        self.send_message(&LogMessage::new(level, message));
    }

    pub fn debug(&self, message: &str) {
        self.send_log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.send_log(LogLevel::Info, message);
    }

    pub fn error(&self, message: &str) {
        self.send_log(LogLevel::Error, message);
    }

    pub fn critical(&self, message: &str) {
        self.send_log(LogLevel::Critical, message);
    }

    /// Send a raw message (thread-safe).
    fn send_message(&self, message: &LogMessage) {
        let mut output = match self.inner.output.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(handle) = output.as_mut() else {
            return;
        };

        match serde_json::to_string(message) {
            Ok(json) => {
                if let Err(e) = writeln!(handle, "{}", json) {
                    eprintln!("Failed to write log message: {}", e);
                }
                let _ = handle.flush();
            }
            Err(e) => {
                eprintln!("Failed to serialize message: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("min_level", &self.inner.min_level)
            .finish()
    }
}
