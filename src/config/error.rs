//! Configuration error types

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Settings that loaded but cannot be used.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Request timeout of {0}s is out of range")]
    InvalidTimeout(u64),

    #[error("CORS origin '{0}' must include an http or https scheme")]
    InvalidCorsOrigin(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool size {0} is out of range")]
    InvalidPoolSize(u32),

    #[error("JWT secret must be at least 32 bytes")]
    WeakJwtSecret,

    #[error("Token issuer must use HTTPS in production")]
    IssuerMustBeHttps,

    #[error("Verbose errors must be disabled in production")]
    VerboseErrorsInProduction,
}
