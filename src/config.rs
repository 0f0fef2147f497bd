//! Registry configuration
//!
//! The node types themselves are embedded schema: they come from the
//! registration calls, not from files. What is configurable is how strict
//! the registration phase is and how much the registry logs.
//!
//! Logging threshold is read once from `NODETYPES_LOG`
//! (`trace|info|warn|error|fatal|off`, default `warn`).

use std::sync::OnceLock;

use crate::observability::Severity;

/// Name of the environment variable holding the log threshold
pub const LOG_ENV_VAR: &str = "NODETYPES_LOG";

/// Registration-phase behaviour of a [`RegistryBuilder`](crate::schema::RegistryBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Every type name used by a node-type validator must be a registered
    /// type or a category when the registry is sealed.
    pub strict_references: bool,
    /// Registering an identical definition twice is a no-op. When false it
    /// is a schema conflict.
    pub allow_identical_redefinition: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_references: true,
            allow_identical_redefinition: true,
        }
    }
}

impl RegistryConfig {
    /// Strictest settings: references checked, no redefinition at all.
    pub fn strict() -> Self {
        Self {
            strict_references: true,
            allow_identical_redefinition: false,
        }
    }

    /// Settings for partial catalogs that refer to types defined elsewhere.
    pub fn lenient() -> Self {
        Self {
            strict_references: false,
            allow_identical_redefinition: true,
        }
    }
}

/// Log threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Info,
    Warn,
    Error,
    Fatal,
    Off,
}

impl LogLevel {
    /// Parses a level name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "fatal" => Some(LogLevel::Fatal),
            "off" => Some(LogLevel::Off),
            _ => None,
        }
    }

    /// Whether a line at `severity` passes this threshold
    pub fn allows(&self, severity: Severity) -> bool {
        match self {
            LogLevel::Off => false,
            _ => severity as u8 >= self.as_u8(),
        }
    }

    pub(crate) fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => LogLevel::Trace,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            3 => LogLevel::Error,
            4 => LogLevel::Fatal,
            _ => LogLevel::Off,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Warn
    }
}

/// Cache the environment threshold to avoid repeated env var lookups
static ENV_LOG_LEVEL: OnceLock<LogLevel> = OnceLock::new();

/// Threshold configured through `NODETYPES_LOG` (cached)
pub fn env_log_level() -> LogLevel {
    *ENV_LOG_LEVEL.get_or_init(|| {
        std::env::var(LOG_ENV_VAR)
            .ok()
            .and_then(|raw| LogLevel::parse(&raw))
            .unwrap_or_default()
    })
}
