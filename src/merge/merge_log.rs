use std::fmt::Display;

use log::{error, info, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DiffError, PatchMismatch};

/// Content-level problems found while merging. These never abort a merge,
/// they end up in the `MergeLog` of the result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("Current value is empty, cannot merge the incoming changes into it")]
    CurrentEmpty,

    #[error("Failed to diff the {sequence} version against the common ancestor: {source}")]
    Diff {
        sequence: &'static str,
        source: DiffError,
    },

    #[error("Failed to replay the incoming change at index {index}: {source}")]
    ReplayFailed { index: usize, source: PatchMismatch },

    #[error("Conflict at index {index} was decided as custom without a replacement chunk")]
    MissingCustomChunk { index: usize },
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warning => write!(f, "warning"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,

    /// Position in the common ancestor the entry is about, if any.
    pub index: Option<usize>,
    pub message: String,
}

/// The warnings and errors collected during a merge, in the order they
/// occurred. Every entry is also forwarded to the `log` facade.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeLog {
    entries: Vec<LogEntry>,
}

impl MergeLog {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn info(&mut self, index: Option<usize>, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.push(LogLevel::Info, index, message);
    }

    pub fn warning(&mut self, index: Option<usize>, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.push(LogLevel::Warning, index, message);
    }

    pub fn error(&mut self, index: Option<usize>, error: &MergeError) {
        error!("{error}");
        self.push(LogLevel::Error, index, error.to_string());
    }

    pub(crate) fn truncate(&mut self, len: usize) { self.entries.truncate(len); }

    fn push(&mut self, level: LogLevel, index: Option<usize>, message: String) {
        self.entries.push(LogEntry {
            level,
            index,
            message,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] { &self.entries }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.level == LogLevel::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.level == LogLevel::Error)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool { self.errors().next().is_some() }

    /// True if nothing worse than an informational entry was logged.
    #[must_use]
    pub fn is_clean(&self) -> bool { self.entries.iter().all(|entry| entry.level == LogLevel::Info) }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
