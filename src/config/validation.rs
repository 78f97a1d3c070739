//! Configuration validation.
//!
//! Semantic checks run after deserialization. All problems are collected
//! and returned together.

use thiserror::Error;
use url::Url;

use crate::config::schema::{AppConfig, DEFAULT_JWT_SECRET};

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("auth.jwt_secret must not be empty")]
    EmptySecret,

    #[error("auth.jwt_secret uses the built-in default in production")]
    DefaultSecretInProduction,

    #[error("auth credentials must not be empty")]
    EmptyCredentials,

    #[error("auth.session_ttl_secs must be positive")]
    InvalidSessionTtl,

    #[error("rate_limit.{0} must be positive")]
    InvalidRateLimit(&'static str),

    #[error("cors origin {0:?} is not a valid URL")]
    InvalidOrigin(String),

    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),
}

/// Validate `config`, returning every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.auth.jwt_secret.is_empty() {
        errors.push(ValidationError::EmptySecret);
    } else if config.environment.is_production() && config.auth.jwt_secret == DEFAULT_JWT_SECRET {
        errors.push(ValidationError::DefaultSecretInProduction);
    }

    if config.auth.user_email.is_empty() || config.auth.user_password.is_empty() {
        errors.push(ValidationError::EmptyCredentials);
    }

    if config.auth.session_ttl_secs <= 0 {
        errors.push(ValidationError::InvalidSessionTtl);
    }

    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError::InvalidRateLimit("window_secs"));
    }
    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::InvalidRateLimit("max_requests"));
    }

    for origin in &config.cors.allowed_origins {
        if Url::parse(origin).is_err() {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Environment;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.environment = Environment::Production;
        config.rate_limit.window_secs = 0;
        config.rate_limit.max_requests = 0;
        config.cors.allowed_origins = vec!["not a url".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DefaultSecretInProduction,
                ValidationError::InvalidRateLimit("window_secs"),
                ValidationError::InvalidRateLimit("max_requests"),
                ValidationError::InvalidOrigin("not a url".into()),
            ]
        );
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret.clear();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::EmptySecret]
        );
    }
}
