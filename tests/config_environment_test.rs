// ABOUTME: Integration tests for environment-driven server configuration
// ABOUTME: Covers required variables, defaults, database URL parsing, and file-backed SQLite

use groomdesk_server::config::environment::{DatabaseUrl, ServerConfig};
use groomdesk_server::database::Database;
use serial_test::serial;
use std::env;

fn clear_config_env() {
    for key in [
        "HTTP_PORT",
        "DATABASE_URL",
        "JWT_SECRET",
        "INVITE_BASE_URL",
        "EMAIL_API_URL",
        "EMAIL_API_KEY",
        "EMAIL_FROM_ADDRESS",
        "ENVIRONMENT",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_jwt_secret_is_required() {
    clear_config_env();
    assert!(ServerConfig::from_env().is_err());
}

#[test]
#[serial]
fn test_defaults_applied_when_only_secret_is_set() {
    clear_config_env();
    env::set_var("JWT_SECRET", "test-secret-material");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8081);
    assert!(config.email.api_url.is_none());
    assert_eq!(config.auth.jwt_secret, "test-secret-material");
    assert!(config.summary().contains("log-only"));

    clear_config_env();
}

#[test]
#[serial]
fn test_overrides_from_environment() {
    clear_config_env();
    env::set_var("JWT_SECRET", "test-secret-material");
    env::set_var("HTTP_PORT", "9090");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("EMAIL_API_URL", "https://mail.example.com/v1/send");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9090);
    assert!(matches!(config.database_url, DatabaseUrl::Memory));
    assert!(config.environment.is_production());
    assert!(config.summary().contains("email_provider=http"));

    clear_config_env();
}

#[tokio::test]
#[serial]
async fn test_file_backed_database_is_created_on_first_connect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groomdesk.db");
    let url = DatabaseUrl::parse_url(&format!("sqlite:{}", path.display())).unwrap();

    let db = Database::new(&url.to_connection_string()).await.unwrap();
    assert!(path.exists());

    // Migrations are idempotent: a second connect over the same file works
    drop(db);
    Database::new(&url.to_connection_string()).await.unwrap();
}
