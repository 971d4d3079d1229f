use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Entries kept in the in-memory ring before old ones are overwritten.
const LOG_BUFFER_CAPACITY: usize = 512;

/// Severity levels, ordered so numeric comparison matches severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log entry with optional structured context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub source: &'static str, // "core" or "shell"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<HashMap<String, serde_json::Value>>,
}

/// Fixed-size ring of log entries, oldest overwritten first
struct RingBuffer {
    entries: Vec<LogEntry>,
    start: usize,
    capacity: usize,
}

impl RingBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            start: 0,
            capacity,
        }
    }

    fn push(&mut self, entry: LogEntry) {
        if self.entries.len() < self.capacity {
            self.entries.push(entry);
        } else {
            self.entries[self.start] = entry;
            self.start = (self.start + 1) % self.capacity;
        }
    }

    /// Entries in chronological order
    fn snapshot(&self) -> Vec<LogEntry> {
        let mut out = Vec::with_capacity(self.entries.len());
        out.extend_from_slice(&self.entries[self.start..]);
        out.extend_from_slice(&self.entries[..self.start]);
        out
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.start = 0;
    }
}

/// Commands for the logger thread
enum LogCommand {
    Record(LogEntry),
    Snapshot(crossbeam_channel::Sender<Vec<LogEntry>>),
    Clear,
}

pub struct Logger {
    sender: Sender<LogCommand>,
    min_level: Arc<AtomicU8>,
}

impl Logger {
    pub fn new() -> Self {
        let (sender, receiver) = bounded(1024);
        let min_level = Arc::new(AtomicU8::new(LogLevel::Debug as u8));

        // Buffer lives on a background thread so callers never block
        std::thread::spawn(move || {
            Self::logger_thread(receiver);
        });

        Self { sender, min_level }
    }

    fn logger_thread(receiver: Receiver<LogCommand>) {
        let mut buffer = RingBuffer::new(LOG_BUFFER_CAPACITY);

        for cmd in receiver {
            match cmd {
                LogCommand::Record(entry) => {
                    buffer.push(entry);
                }
                LogCommand::Snapshot(response_tx) => {
                    let _ = response_tx.send(buffer.snapshot());
                }
                LogCommand::Clear => {
                    buffer.clear();
                }
            }
        }
    }

    /// Record a plain message without blocking the caller
    pub fn log(&self, level: LogLevel, message: &str, source: &'static str) {
        if (level as u8) < self.min_level.load(Ordering::Relaxed) {
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
            source,
            context: None,
        };

        // try_send so a full channel drops the entry instead of blocking
        let _ = self.sender.try_send(LogCommand::Record(entry));
    }

    /// Record a message with structured key/value context
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: &str,
        source: &'static str,
        context: HashMap<String, serde_json::Value>,
    ) {
        if (level as u8) < self.min_level.load(Ordering::Relaxed) {
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
            source,
            context: Some(context),
        };

        let _ = self.sender.try_send(LogCommand::Record(entry));
    }

    /// Raise or lower the level below which entries are discarded
    pub fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn get_min_level(&self) -> LogLevel {
        match self.min_level.load(Ordering::Relaxed) {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            3 => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    pub fn get_logs(&self) -> Vec<LogEntry> {
        let (response_tx, response_rx) = bounded(1);
        if self.sender.send(LogCommand::Snapshot(response_tx)).is_ok() {
            response_rx.recv().unwrap_or_default()
        } else {
            Vec::new()
        }
    }

    pub fn clear_logs(&self) {
        let _ = self.sender.try_send(LogCommand::Clear);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

// Process-wide logger instance
lazy_static::lazy_static! {
    pub static ref LOGGER: Logger = Logger::new();
}

// Logging macro used throughout the crate
#[macro_export]
macro_rules! stamp_log {
    ($level:expr, $($arg:tt)*) => {
        {
            use $crate::logger::LogLevel;
            let message = format!($($arg)*);
            $crate::logger::LOGGER.log($level, &message, "core");
            // Also mirror to the log facade for development
            match $level {
                LogLevel::Error => log::error!("{}", message),
                LogLevel::Warn => log::warn!("{}", message),
                LogLevel::Info => log::info!("{}", message),
                LogLevel::Debug => log::debug!("{}", message),
            }
        }
    };
}
