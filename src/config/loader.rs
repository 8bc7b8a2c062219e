//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file.
///
/// Only syntax is checked here; semantic validation runs once the CLI
/// overrides have been applied.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_config;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [listener]
            host = "127.0.0.1"
            port = 8081

            [store]
            backend = "sqlite"
            database_url = "sqlite::memory:"

            [timeouts]
            request_secs = 5

            [routing]
            legacy_dispatch = false

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address(), "127.0.0.1:8081");
        assert_eq!(config.store.database_url, "sqlite::memory:");
        assert_eq!(config.timeouts.request_secs, 5);
        assert!(!config.routing.legacy_dispatch);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[listener\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_message() {
        let config = parse_config("[timeouts]\nrequest_secs = 0").unwrap();
        let err = ConfigError::Validation(validate_config(&config).unwrap_err());
        assert_eq!(
            err.to_string(),
            "Validation failed: timeouts.request_secs must be greater than zero"
        );
    }

    #[test]
    fn test_invalid_file_value_can_be_overridden() {
        let mut config = parse_config("[observability]\nlog_level = \"loud\"").unwrap();
        assert!(validate_config(&config).is_err());

        config.observability.log_level = "info".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/online_shop.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
