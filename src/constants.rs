// ABOUTME: System-wide constants and configuration values for the Groomdesk API
// ABOUTME: Contains protocol constants, default ports, and lifecycle limits
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Centralized constants for the Groomdesk server.

/// Service identity constants
pub mod service_names {
    /// Canonical service name used in logging and configuration
    pub const GROOMDESK_SERVER: &str = "groomdesk-server";

    /// Audience claim expected in access tokens issued by this server
    pub const TOKEN_AUDIENCE: &str = "groomdesk";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Default network ports
pub mod ports {
    /// Default HTTP API port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// Lifecycle and sizing limits
pub mod limits {
    /// Minimum accepted password length at registration
    pub const MIN_PASSWORD_LENGTH: usize = 8;

    /// Access token validity in hours
    pub const JWT_EXPIRY_HOURS: i64 = 24;

    /// Refresh token validity in days
    pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

    /// Invitation validity window in days
    pub const INVITATION_EXPIRY_DAYS: i64 = 7;

    /// Entropy of opaque security tokens (invitations, refresh tokens).
    /// 32 bytes = 256 bits, hex-encoded to 64 characters.
    pub const SECURITY_TOKEN_BYTES: usize = 32;

    /// Maximum service lines accepted on a single appointment
    pub const MAX_SERVICE_LINES_PER_APPOINTMENT: usize = 20;
}

/// Environment variable names read by configuration
pub mod env_config {
    /// HTTP port override
    pub const HTTP_PORT: &str = "HTTP_PORT";

    /// Database connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";

    /// JWT signing secret
    pub const JWT_SECRET: &str = "JWT_SECRET";

    /// Base URL embedded in invitation deep links
    pub const INVITE_BASE_URL: &str = "INVITE_BASE_URL";

    /// Email provider API endpoint
    pub const EMAIL_API_URL: &str = "EMAIL_API_URL";

    /// Email provider API key
    pub const EMAIL_API_KEY: &str = "EMAIL_API_KEY";

    /// Sender address for outbound mail
    pub const EMAIL_FROM_ADDRESS: &str = "EMAIL_FROM_ADDRESS";

    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}
