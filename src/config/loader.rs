//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{AppConfig, Environment};
use crate::config::validation::{validate_config, ValidationError};

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

/// Load configuration: optional TOML file, then environment overrides,
/// then semantic validation.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so callers (and tests) can supply
/// their own source.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(env) = lookup("NODE_ENV") {
        config.environment = Environment::parse(&env);
    }
    if let Some(email) = lookup("TEST_USER_EMAIL") {
        config.auth.user_email = email;
    }
    if let Some(password) = lookup("TEST_USER_PASSWORD") {
        config.auth.user_password = password;
    }
    if let Some(secret) = lookup("JWT_SECRET") {
        config.auth.jwt_secret = secret;
    }
    if let Some(origins) = lookup("ALLOWED_ORIGINS") {
        config.cors.allowed_origins = parse_origins(&origins);
    }
    if let Some(bind) = lookup("BIND_ADDRESS") {
        config.listener.bind_address = bind;
    }
    if let Some(path) = lookup("VENDOR_STORE_PATH") {
        config.storage.snapshot_path = Some(path).filter(|p| !p.is_empty());
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("NODE_ENV", "production"),
                ("TEST_USER_EMAIL", "ops@example.com"),
                ("TEST_USER_PASSWORD", "hunter22"),
                ("JWT_SECRET", "s3cret"),
                ("ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ]),
        );

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.auth.user_email, "ops@example.com");
        assert_eq!(config.auth.user_password, "hunter22");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_defaults_without_env() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, env(&[]));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.auth.user_email, "test@example.com");
        assert_eq!(config.rate_limit.max_requests, 60);
        assert!(config.storage.snapshot_path.is_none());
    }

    #[test]
    fn test_toml_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            environment = "test"

            [rate_limit]
            max_requests = 5

            [storage]
            snapshot_path = "vendors.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.storage.snapshot_path.as_deref(), Some("vendors.json"));
    }
}
