//! Structured logging utilities for dircase components.
//!
//! Provides consistent logging with component prefixes and structured fields.
//!
//! # Usage
//!
//! ```ignore
//! use dircase_config::log_core_debug;
//!
//! log_core_debug!("Querying directory", path = tracing::field::display(dir.display()));
//! ```

use std::str::FromStr;

/// Component identifiers for log filtering
pub struct Component;

impl Component {
    pub const CORE: &'static str = "CORE";
    pub const CLI: &'static str = "CLI";
}

/// Log levels for runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

// === CORE logging macros ===

#[macro_export]
macro_rules! log_core_warn {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::warn!(component = $crate::logging::Component::CORE, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_core_info {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(component = $crate::logging::Component::CORE, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_core_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = $crate::logging::Component::CORE, $($key = $value,)* $msg)
    };
}

// === CLI logging macros ===

#[macro_export]
macro_rules! log_cli_warn {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::warn!(component = $crate::logging::Component::CLI, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_cli_info {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(component = $crate::logging::Component::CLI, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_cli_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = $crate::logging::Component::CLI, $($key = $value,)* $msg)
    };
}

/// Initialize logging with the given level filter.
/// Call this once at application startup.
///
/// `DIRCASE_LOG` wins over `RUST_LOG`, which wins over `level`.
pub fn init_logging(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_env(crate::ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_constants() {
        assert_eq!(Component::CORE, "CORE");
        assert_eq!(Component::CLI, "CLI");
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" trace ".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_macros_expand() {
        let path = std::path::PathBuf::from("some/dir");
        log_core_debug!("probe", path = tracing::field::display(path.display()));
        log_core_info!("applied", enabled = true);
        log_core_warn!("odd status", status = 5u32);
        log_cli_info!("started");
        log_cli_warn!("bad level", level = "loud");
        log_cli_debug!("args", count = 2usize,);
    }
}
