// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management for production deployment

use crate::constants::{env_config, limits, ports};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Environment type for security and other configurations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite { path: PathBuf },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error for unsupported URL schemes
    pub fn parse_url(s: &str) -> Result<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else {
            anyhow::bail!("Unsupported database URL scheme: {s}")
        }
    }

    /// Render as a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_string(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret bytes used to sign HS256 access tokens
    pub jwt_secret: String,
    /// Access token validity in hours
    pub jwt_expiry_hours: i64,
}

/// Email gateway configuration. When no provider endpoint is configured the
/// server falls back to the log-only gateway.
#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    /// Provider HTTP API endpoint
    pub api_url: Option<String>,
    /// Provider API key
    pub api_key: Option<String>,
    /// Sender address for outbound mail
    pub from_address: String,
}

/// Top-level server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Database location
    pub database_url: DatabaseUrl,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Outbound email settings
    pub email: EmailConfig,
    /// Base URL embedded in invitation deep links
    pub invite_base_url: String,
    /// Deployment environment
    pub environment: Environment,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or malformed
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var(env_config::HTTP_PORT) {
            Ok(value) => value
                .parse()
                .with_context(|| format!("Invalid {}: {value}", env_config::HTTP_PORT))?,
            Err(_) => ports::DEFAULT_HTTP_PORT,
        };

        let database_url = DatabaseUrl::parse_url(
            &env::var(env_config::DATABASE_URL)
                .unwrap_or_else(|_| "sqlite:groomdesk.db".to_string()),
        )?;

        let jwt_secret = env::var(env_config::JWT_SECRET)
            .with_context(|| format!("{} must be set", env_config::JWT_SECRET))?;

        let email = EmailConfig {
            api_url: env::var(env_config::EMAIL_API_URL).ok(),
            api_key: env::var(env_config::EMAIL_API_KEY).ok(),
            from_address: env::var(env_config::EMAIL_FROM_ADDRESS)
                .unwrap_or_else(|_| "no-reply@groomdesk.io".to_string()),
        };

        let invite_base_url = env::var(env_config::INVITE_BASE_URL)
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let environment = Environment::from_str_or_default(
            &env::var(env_config::ENVIRONMENT).unwrap_or_default(),
        );

        Ok(Self {
            http_port,
            database_url,
            auth: AuthConfig {
                jwt_secret,
                jwt_expiry_hours: limits::JWT_EXPIRY_HOURS,
            },
            email,
            invite_base_url,
            environment,
        })
    }

    /// One-line configuration summary logged at startup. Secrets excluded.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} http_port={} database={} email_provider={}",
            self.environment,
            self.http_port,
            self.database_url.to_connection_string(),
            if self.email.api_url.is_some() {
                "http"
            } else {
                "log-only"
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert!(matches!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        ));
        let url = DatabaseUrl::parse_url("sqlite:groomdesk.db").unwrap();
        assert_eq!(url.to_connection_string(), "sqlite:groomdesk.db");
        assert!(DatabaseUrl::parse_url("mysql://nope").is_err());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("unknown"),
            Environment::Development
        );
    }
}
