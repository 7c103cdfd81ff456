//! Structured diagnostics reported by readers and writers.

use crate::{Caret, Status};
use std::fmt;
use std::io::{IsTerminal, Write};

/// Severity of a [`LogEntry`], from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Emergency => "emergency",
            Self::Alert => "alert",
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
        })
    }
}

/// One diagnostic record: a severity, the source position it refers to, the
/// status that triggered it and a formatted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry<'a> {
    pub level: LogLevel,
    pub caret: Option<&'a Caret>,
    pub status: Option<Status>,
    pub message: &'a str,
}

/// Log functions consume entries; where they go is up to the caller.
pub trait Log {
    fn log(&mut self, entry: &LogEntry<'_>);
}

impl<F: FnMut(&LogEntry<'_>)> Log for F {
    fn log(&mut self, entry: &LogEntry<'_>) {
        self(entry)
    }
}

/// The default log function: prints `file:line:col level: message` to
/// standard error, coloring the level when stderr is a terminal.
#[derive(Debug, Clone, Default)]
pub struct StderrLog {
    color: Option<bool>,
}

impl StderrLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces colored or plain output instead of detecting a terminal.
    #[must_use]
    pub fn with_color(color: bool) -> Self {
        Self { color: Some(color) }
    }

    fn write(&self, entry: &LogEntry<'_>, out: &mut impl Write) -> std::io::Result<()> {
        if let Some(caret) = entry.caret {
            write!(out, "{caret}: ")?;
        }
        let color = self
            .color
            .unwrap_or_else(|| std::io::stderr().is_terminal());
        if color {
            let code = match entry.level {
                LogLevel::Emergency | LogLevel::Alert | LogLevel::Critical | LogLevel::Error => {
                    "\x1b[1;31m"
                }
                LogLevel::Warning => "\x1b[1;33m",
                LogLevel::Notice | LogLevel::Info => "\x1b[1;36m",
                LogLevel::Debug => "\x1b[1;30m",
            };
            write!(out, "{code}{}\x1b[0m: ", entry.level)?;
        } else {
            write!(out, "{}: ", entry.level)?;
        }
        writeln!(out, "{}", entry.message)
    }
}

impl Log for StderrLog {
    fn log(&mut self, entry: &LogEntry<'_>) {
        // Diagnostics are best-effort, a broken stderr must not kill the read
        let _ = self.write(entry, &mut std::io::stderr().lock());
    }
}
