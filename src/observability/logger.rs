//! Structured JSON logger
//!
//! - One log line = one event, written with a single call
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, no buffering
//! - Lines go to stderr; stdout belongs to the host
//!
//! Lines below the process-wide threshold are dropped. The threshold comes
//! from `NODETYPES_LOG` unless overridden with [`Logger::set_threshold`].

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use crate::config::{env_log_level, LogLevel};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-node detail
    Trace = 0,
    /// Registry lifecycle
    Info = 1,
    /// Deprecated usage and other suspicious but legal calls
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Schema defects, startup must stop
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const THRESHOLD_FROM_ENV: u8 = u8::MAX;

/// Explicit threshold override, `THRESHOLD_FROM_ENV` until set
static THRESHOLD: AtomicU8 = AtomicU8::new(THRESHOLD_FROM_ENV);

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Overrides the threshold taken from the environment
    pub fn set_threshold(level: LogLevel) {
        THRESHOLD.store(level.as_u8(), Ordering::Relaxed);
    }

    /// Current threshold
    pub fn threshold() -> LogLevel {
        match THRESHOLD.load(Ordering::Relaxed) {
            THRESHOLD_FROM_ENV => env_log_level(),
            raw => LogLevel::from_u8(raw),
        }
    }

    /// Whether a line at `severity` would be written
    pub fn enabled(severity: Severity) -> bool {
        Self::threshold().allows(severity)
    }

    /// Log an event with the given severity and fields
    ///
    /// Fields are output in deterministic order (alphabetical by key)
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if Self::enabled(severity) {
            Self::log_to_writer(severity, event, fields, &mut io::stderr());
        }
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let mut output = String::with_capacity(256);

        output.push('{');

        output.push_str("\"event\":\"");
        Self::escape_json_string(&mut output, event);
        output.push('"');

        output.push_str(",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push('"');

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push_str(",\"");
            Self::escape_json_string(&mut output, key);
            output.push_str("\":\"");
            Self::escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push('}');
        output.push('\n');

        let _ = writer.write_all(output.as_bytes());
        let _ = writer.flush();
    }

    fn escape_json_string(output: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => output.push_str("\\\""),
                '\\' => output.push_str("\\\\"),
                '\n' => output.push_str("\\n"),
                '\r' => output.push_str("\\r"),
                '\t' => output.push_str("\\t"),
                c if c.is_control() => {
                    output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => output.push(c),
            }
        }
    }
}

/// Capture a log line to a buffer for testing
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
