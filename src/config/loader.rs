//! Configuration loading from disk and environment.
//!
//! A TOML file provides the declarative parts (allow-list, rate budgets,
//! timeouts); deployment-provided values (port, store URL, relay
//! credentials) come from environment variables and override the file.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration, apply environment overrides, and validate.
///
/// With no file path the defaults are used as the base, which keeps a
/// fully env-driven deployment possible.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = fs::read_to_string(p)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Environment variables recognized at startup. Each one overrides the
/// corresponding config-file field when set.
fn apply_env_overrides(config: &mut AppConfig) {
    if let Some(port) = env_var("PORT") {
        match port.parse::<u16>() {
            Ok(port) => config.server.bind_address = format!("0.0.0.0:{}", port),
            Err(e) => tracing::warn!(value = %port, error = %e, "Ignoring invalid PORT"),
        }
    }

    if let Some(url) = env_var("DATABASE_URL") {
        config.database.url = url;
    }

    if let Some(flag) = env_var("DATABASE_TLS_INSECURE") {
        config.database.tls_insecure = is_truthy(&flag);
    }

    if let Some(flag) = env_var("TRUST_PROXY") {
        config.server.trust_proxy = is_truthy(&flag);
    }

    if let Some(dir) = env_var("STATIC_DIR") {
        config.server.static_dir = Some(dir);
    }

    if let Some(origins) = env_var("CORS_ORIGINS") {
        config.cors.origins = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(username) = env_var("SMTP_USERNAME") {
        config.mail.username = username;
    }

    if let Some(password) = env_var("SMTP_PASSWORD") {
        config.mail.password = password;
    }
}

fn env_var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => {
            tracing::debug!(key = %key, "Applying environment override");
            Some(value)
        }
        _ => None,
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
