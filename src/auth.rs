// ABOUTME: JWT-based user authentication and authorization system
// ABOUTME: Handles password verification, token generation, validation, and refresh rotation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Groomdesk.io

//! # Authentication and Session Management
//!
//! This module provides JWT-based authentication for the multi-tenant
//! Groomdesk server. Access tokens are short-lived HS256 JWTs; long-lived
//! sessions use opaque refresh tokens stored as digests and rotated on
//! every use.

use crate::constants::{limits, service_names};
use crate::crypto;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience (who the token is intended for)
    pub aud: String,
}

/// Authenticated request context extracted from a bearer token
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Authenticated user `ID`
    pub user_id: Uuid,
    /// Authenticated user email
    pub email: String,
}

/// A freshly issued refresh token: the opaque value handed to the client
/// once, and the digest persisted in its place
#[derive(Debug)]
pub struct IssuedRefreshToken {
    /// Opaque value returned to the client
    pub token: String,
    /// Hex SHA-256 digest stored at rest
    pub digest: String,
    /// Expiry of the new token
    pub expires_at: DateTime<Utc>,
}

/// Authentication manager for `JWT` access tokens and refresh rotation
#[derive(Clone)]
pub struct AuthManager {
    jwt_secret: Vec<u8>,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager
    #[must_use]
    pub fn new(jwt_secret: Vec<u8>, token_expiry_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_expiry_hours,
        }
    }

    /// Access token validity in seconds, for login responses
    #[must_use]
    pub const fn expires_in_secs(&self) -> i64 {
        self.token_expiry_hours * 3600
    }

    /// Generate an `HS256` access token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            aud: service_names::TOKEN_AUDIENCE.to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.jwt_secret),
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))
    }

    /// Validate an access token and return its claims
    ///
    /// # Errors
    ///
    /// Returns an error if the signature is invalid, the token is expired,
    /// or the audience does not match
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[service_names::TOKEN_AUDIENCE]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.jwt_secret),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::auth_expired(),
            _ => AppError::auth_invalid(format!("Invalid token: {e}")),
        })?;

        Ok(token_data.claims)
    }

    /// Extract and authenticate a user from an `Authorization` header value
    ///
    /// # Errors
    ///
    /// Returns an error if the header is missing, not a bearer token, or
    /// the token does not validate
    pub fn authenticate_header(&self, auth_header: Option<&str>) -> AppResult<AuthResult> {
        let header = auth_header.ok_or_else(AppError::auth_required)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Authorization header is not a bearer token"))?;

        let claims = self.validate_token(token)?;
        let user_id = crate::utils::uuid::parse_uuid(&claims.sub)
            .map_err(|_| AppError::auth_invalid("Invalid user ID in token"))?;

        Ok(AuthResult {
            user_id,
            email: claims.email,
        })
    }

    /// Issue a new opaque refresh token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the system RNG fails
    pub fn issue_refresh_token(&self) -> AppResult<IssuedRefreshToken> {
        let token = crypto::generate_security_token()?;
        let digest = crypto::sha256_hex(&token);
        Ok(IssuedRefreshToken {
            token,
            digest,
            expires_at: Utc::now() + Duration::days(limits::REFRESH_TOKEN_EXPIRY_DAYS),
        })
    }

    /// Validate a presented refresh token against storage and rotate it.
    ///
    /// The presented token is revoked and a replacement issued atomically;
    /// a revoked or expired token is rejected without side effects.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown, revoked, expired, or the
    /// rotation write fails
    pub async fn rotate_refresh_token(
        &self,
        database: &Database,
        presented: &str,
    ) -> AppResult<(Uuid, IssuedRefreshToken)> {
        let digest = crypto::sha256_hex(presented);
        let record = database
            .get_refresh_token_by_digest(&digest)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Unknown refresh token"))?;

        if record.revoked {
            tracing::warn!(user_id = %record.user_id, "revoked refresh token presented");
            return Err(AppError::auth_invalid("Refresh token has been revoked"));
        }
        if Utc::now() > record.expires_at {
            return Err(AppError::auth_expired());
        }

        let replacement = self.issue_refresh_token()?;
        database
            .rotate_refresh_token(
                record.id,
                record.user_id,
                &replacement.digest,
                replacement.expires_at,
            )
            .await?;

        Ok((record.user_id, replacement))
    }
}

/// Hash a password for storage
///
/// # Errors
///
/// Returns an error if bcrypt fails
pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash
///
/// # Errors
///
/// Returns an error if the hash is malformed
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::internal(format!("Failed to verify password: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            "groomer@example.com".into(),
            "hash".into(),
            Some("Groomer".into()),
        )
    }

    fn manager() -> AuthManager {
        AuthManager::new(b"test-secret-test-secret-test-secret!".to_vec(), 24)
    }

    #[test]
    fn test_token_round_trip() {
        let manager = manager();
        let user = test_user();

        let token = manager.generate_token(&user).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.aud, service_names::TOKEN_AUDIENCE);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = manager().generate_token(&test_user()).unwrap();
        let other = AuthManager::new(b"another-secret-another-secret!!!".to_vec(), 24);
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_authenticate_header() {
        let manager = manager();
        let user = test_user();
        let token = manager.generate_token(&user).unwrap();

        let auth = manager
            .authenticate_header(Some(&format!("Bearer {token}")))
            .unwrap();
        assert_eq!(auth.user_id, user.id);

        assert!(manager.authenticate_header(None).is_err());
        assert!(manager.authenticate_header(Some(&token)).is_err());
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong pony", &hash).unwrap());
    }

    #[test]
    fn test_issued_refresh_tokens_are_distinct() {
        let manager = manager();
        let a = manager.issue_refresh_token().unwrap();
        let b = manager.issue_refresh_token().unwrap();
        assert_ne!(a.token, b.token);
        assert_eq!(a.digest, crate::crypto::sha256_hex(&a.token));
    }
}
