/// Configuration management for the PR mock
use crate::error::{PrError, PrResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub monitoring: MonitoringConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub ip: String,
    pub port: u16,
    /// Maximum request body size in MiB
    pub input_max_size: usize,
    /// Build the application but do not bind a listener
    pub do_not_start: bool,
    pub version: String,
}

/// Health and metrics publishing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// 0 publishes monitoring routes on the main port
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                ip: "0.0.0.0".to_string(),
                port: 8080,
                input_max_size: 1,
                do_not_start: false,
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            monitoring: MonitoringConfig { port: 0 },
            logging: LoggingConfig {
                level: "pr_mock=info,tower_http=info".to_string(),
                format: LogFormat::Text,
            },
        }
    }
}

/// Parse a boolean environment flag
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> PrResult<Self> {
        dotenv::dotenv().ok();

        let defaults = Self::default();

        let ip = env::var("PR_IP").unwrap_or(defaults.service.ip);
        let port = env::var("PR_PORT")
            .unwrap_or_else(|_| defaults.service.port.to_string())
            .parse()
            .map_err(|_| PrError::Validation("Invalid port number".to_string()))?;
        let monitoring_port = env::var("PR_MONITORING_PORT")
            .unwrap_or_else(|_| defaults.monitoring.port.to_string())
            .parse()
            .map_err(|_| PrError::Validation("Invalid monitoring port number".to_string()))?;
        let input_max_size = env::var("PR_INPUT_MAX_SIZE")
            .unwrap_or_else(|_| defaults.service.input_max_size.to_string())
            .parse()
            .map_err(|_| PrError::Validation("Invalid input max size".to_string()))?;
        let do_not_start = match env::var("PR_DO_NOT_START") {
            Ok(value) => parse_flag(&value)
                .ok_or_else(|| PrError::Validation(format!("Invalid do-not-start flag '{}'", value)))?,
            Err(_) => defaults.service.do_not_start,
        };

        let level = env::var("RUST_LOG").unwrap_or(defaults.logging.level);
        let format = match env::var("PR_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("text") | Err(_) => LogFormat::Text,
            Ok(other) => {
                return Err(PrError::Validation(format!("Unknown log format '{}'", other)))
            }
        };

        let config = ServerConfig {
            service: ServiceConfig {
                ip,
                port,
                input_max_size,
                do_not_start,
                version: defaults.service.version,
            },
            monitoring: MonitoringConfig {
                port: monitoring_port,
            },
            logging: LoggingConfig { level, format },
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> PrResult<()> {
        if self.service.ip.is_empty() {
            return Err(PrError::Validation("Bind address cannot be empty".to_string()));
        }

        if self.service.port == 0 {
            return Err(PrError::Validation("Port cannot be 0".to_string()));
        }

        if self.service.input_max_size == 0 {
            return Err(PrError::Validation(
                "Input max size must be at least 1 MiB".to_string(),
            ));
        }

        Ok(())
    }

    /// Request body limit in bytes
    pub fn body_limit(&self) -> usize {
        self.service.input_max_size * 1024 * 1024
    }

    /// Whether health and metrics get their own listener
    pub fn separate_monitoring(&self) -> bool {
        self.monitoring.port != 0 && self.monitoring.port != self.service.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.body_limit(), 1024 * 1024);
        assert!(!config.separate_monitoring());
    }

    #[test]
    fn test_separate_monitoring() {
        let mut config = ServerConfig::default();
        config.monitoring.port = config.service.port;
        assert!(!config.separate_monitoring());

        config.monitoring.port = 9090;
        assert!(config.separate_monitoring());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("yes"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_validate_rejects_zero_body_limit() {
        let mut config = ServerConfig::default();
        config.service.input_max_size = 0;
        assert!(matches!(config.validate(), Err(PrError::Validation(_))));
    }
}
