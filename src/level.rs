use serde::Serialize;
use std::fmt;

/// Level attached to every [`LogRecord`](crate::record::LogRecord).
///
/// The set is closed: the logger contract only knows about these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    Debug,
    Trace,
    Info,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
            LogLevel::Info => "INFO",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&tracing::Level> for LogLevel {
    /// `WARN` has no counterpart in the contract and is recorded as `INFO`.
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::ERROR => LogLevel::Error,
            tracing::Level::WARN | tracing::Level::INFO => LogLevel::Info,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::TRACE => LogLevel::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_render_uppercase() {
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(serde_json::to_value(LogLevel::Trace).unwrap(), "TRACE");
    }

    #[test]
    fn warn_maps_to_info() {
        assert_eq!(LogLevel::from(&tracing::Level::WARN), LogLevel::Info);
        assert_eq!(LogLevel::from(&tracing::Level::DEBUG), LogLevel::Debug);
    }
}
