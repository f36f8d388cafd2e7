//! Log configuration

use serde::{Deserialize, Serialize};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "warn,insight_stock=info";

/// Output encoding of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive applied when `RUST_LOG` is absent
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_config() {
        let config = LogConfig::default();
        assert_eq!(config.filter, "warn,insight_stock=info");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_log_config_builders() {
        let config = LogConfig::default()
            .with_format(LogFormat::Json)
            .with_filter("debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "debug");
        assert_eq!(serde_json::to_string(&config.format).unwrap(), "\"json\"");
    }
}
