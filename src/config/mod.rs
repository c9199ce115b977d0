//! Configuration management for the token service
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::Duration;
use thiserror::Error;

use crate::auth::TokenPolicy;

const DEV_JWT_SECRET: &str = "development-secret-change-in-production";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Current environment
    pub environment: Environment,

    /// Listen address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum database connections
    pub db_max_connections: u32,

    /// CORS allowed origins (comma separated)
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// HMAC secret for access-token signing
    pub jwt_secret: String,

    /// True when `JWT_SECRET` was unset and the development secret is in use
    pub jwt_secret_is_default: bool,

    /// Access token TTL in seconds (default: 900 = 15 minutes)
    pub jwt_access_token_ttl_seconds: i64,

    /// Refresh token TTL in days (default: 7)
    pub jwt_refresh_token_ttl_days: i64,

    /// bcrypt cost for stored refresh-token hashes
    pub bcrypt_cost: u32,

    /// Upper bound for a single token store round-trip
    pub store_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::parse(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let db_max_connections = parse_var("DB_MAX_CONNECTIONS", 5u32)?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let (jwt_secret, jwt_secret_is_default) =
            resolve_jwt_secret(env::var("JWT_SECRET").ok(), &environment)?;

        let jwt_access_token_ttl_seconds = parse_var("JWT_ACCESS_TOKEN_TTL_SECONDS", 900i64)?;
        let jwt_refresh_token_ttl_days = parse_var("JWT_REFRESH_TOKEN_TTL_DAYS", 7i64)?;
        if jwt_access_token_ttl_seconds <= 0 || jwt_refresh_token_ttl_days <= 0 {
            return Err(ConfigError::InvalidValue(
                "token lifetimes must be positive".to_string(),
            ));
        }

        let bcrypt_cost = parse_var("BCRYPT_COST", 10u32)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue(format!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                bcrypt_cost
            )));
        }

        let store_timeout_ms = parse_var("STORE_TIMEOUT_MS", 3000u64)?;

        Ok(Config {
            database_url,
            environment,
            host,
            port,
            db_max_connections,
            cors_allowed_origins,
            log_level,
            jwt_secret,
            jwt_secret_is_default,
            jwt_access_token_ttl_seconds,
            jwt_refresh_token_ttl_days,
            bcrypt_cost,
            store_timeout_ms,
        })
    }

    /// Token lifetimes and store bound derived from this configuration
    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy {
            access_token_ttl: Duration::seconds(self.jwt_access_token_ttl_seconds),
            refresh_token_ttl: Duration::days(self.jwt_refresh_token_ttl_days),
            store_timeout: StdDuration::from_millis(self.store_timeout_ms),
        }
    }

    /// Get database URL with the password masked, for logging
    pub fn database_url_masked(&self) -> String {
        if let Some(at_pos) = self.database_url.find('@') {
            if let Some(colon_pos) = self.database_url[..at_pos].rfind(':') {
                let prefix = &self.database_url[..colon_pos + 1];
                let suffix = &self.database_url[at_pos..];
                return format!("{}****{}", prefix, suffix);
            }
        }
        self.database_url.clone()
    }
}

/// Signing secret from the environment, falling back to the development
/// secret outside production. The flag reports the fallback.
fn resolve_jwt_secret(
    raw: Option<String>,
    environment: &Environment,
) -> Result<(String, bool), ConfigError> {
    match raw {
        Some(secret) if !secret.is_empty() => Ok((secret, false)),
        _ if environment.is_production() => {
            Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()))
        }
        _ => Ok((DEV_JWT_SECRET.to_string(), true)),
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(format!("{} has invalid value '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}
