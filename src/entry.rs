use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Info,
    Warning,
    Error,
    CommandEcho,
    CommandOutput,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Info => "Info",
            EntryKind::Warning => "Warning",
            EntryKind::Error => "Error",
            EntryKind::CommandEcho => "Command",
            EntryKind::CommandOutput => "Output",
        }
    }

    pub fn is_command(self) -> bool {
        matches!(self, EntryKind::CommandEcho | EntryKind::CommandOutput)
    }
}

impl From<tracing::Level> for EntryKind {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => EntryKind::Error,
            tracing::Level::WARN => EntryKind::Warning,
            _ => EntryKind::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    message: String,
    detail: String,
    frame: u64,
    timestamp: DateTime<Local>,
    kind: EntryKind,
    build_time: bool,
}

impl LogEntry {
    pub fn new(kind: EntryKind, message: impl Into<String>, detail: impl Into<String>, frame: u64) -> Self {
        Self::at(kind, message, detail, frame, Local::now())
    }

    pub fn at(
        kind: EntryKind,
        message: impl Into<String>,
        detail: impl Into<String>,
        frame: u64,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self { message: message.into(), detail: detail.into(), frame, timestamp, kind, build_time: false }
    }

    pub fn with_build_time(mut self, build_time: bool) -> Self {
        self.build_time = build_time;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_build_time(&self) -> bool {
        self.build_time
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.label(), self.message)
    }
}
