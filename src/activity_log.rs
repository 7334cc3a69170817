use chrono::{DateTime, Local};
use std::collections::VecDeque;

const MAX_ENTRIES: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    pub fn display(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// User-facing activity log shown in the main window. Every entry is also
/// forwarded to `tracing`.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.push_at(Local::now(), message);
    }

    pub fn push_error(&mut self, context: &str, error: &anyhow::Error) {
        tracing::error!("{}: {:#}", context, error);
        self.push_entry(Local::now(), format!("{}: {:#}", context, error));
    }

    pub fn push_at(&mut self, at: DateTime<Local>, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "standup::activity", "{}", message);
        self.push_entry(at, message);
    }

    fn push_entry(&mut self, at: DateTime<Local>, message: String) {
        self.entries.push_back(LogEntry { at, message });
        while self.entries.len() > MAX_ENTRIES {
            self.entries.pop_front();
        }
    }

    /// The newest `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(count))
    }
}
