//! Service configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `DROWSY__SECTION__KEY` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use dms::DmsConfig;

/// Config file looked up when no explicit path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/drowsy-monitor";

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub timer: TimerConfig,
    pub source: SourceConfig,
    pub detection: DmsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and serve `/metrics`
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Ticker period (milliseconds)
    pub tick_interval_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
        }
    }
}

impl TimerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Recorded landmark session to replay; sensing is disabled without one
    pub replay_path: Option<String>,
    /// Restart the recording when it ends
    pub looping: bool,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(path.is_some());
        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("DROWSY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dms::HeadAbsencePolicy;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr(), "0.0.0.0:5000");
        assert_eq!(config.timer.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.logging.level, "info");
        assert!(config.source.replay_path.is_none());
        assert_eq!(config.detection.hand_threshold, 13.0);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("drowsy-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[server]
port = 8081

[detection]
eye_sustain_secs = 3.0
head_absence = "feed_zero"

[source]
replay_path = "session.jsonl"
looping = true
"#,
        )
        .unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.detection.eye_sustain_secs, 3.0);
        assert_eq!(config.detection.head_absence, HeadAbsencePolicy::FeedZero);
        assert_eq!(config.detection.eye_threshold, 0.015);
        assert_eq!(config.source.replay_path.as_deref(), Some("session.jsonl"));
        assert!(config.source.looping);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        assert!(AppConfig::load(Some("/nonexistent/drowsy-monitor.toml")).is_err());
    }
}
