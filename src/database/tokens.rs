// ABOUTME: Refresh token database operations with digest-at-rest storage
// ABOUTME: Handles issuance, lookup by digest, and atomic rotation of refresh tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use super::Database;
use crate::errors::AppResult;
use crate::utils::uuid::parse_stored_uuid;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

/// Stored refresh token. Only the SHA-256 digest of the opaque value is
/// persisted; the token itself is returned to the client once at issuance.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    /// Unique record identifier
    pub id: Uuid,
    /// User this token authenticates
    pub user_id: Uuid,
    /// Hex-encoded SHA-256 digest of the opaque token
    pub token_digest: String,
    /// Moment after which the token is rejected
    pub expires_at: DateTime<Utc>,
    /// Set on rotation or logout; revoked tokens are rejected
    pub revoked: bool,
    /// When the token was issued
    pub created_at: DateTime<Utc>,
}

impl Database {
    /// Create the refresh_tokens table
    pub(super) async fn migrate_refresh_tokens(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS refresh_tokens (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                token_digest TEXT UNIQUE NOT NULL,
                expires_at DATETIME NOT NULL,
                revoked BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_refresh_tokens_user ON refresh_tokens(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a newly issued refresh token digest
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_refresh_token(
        &self,
        user_id: Uuid,
        token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (id, user_id, token_digest, expires_at, revoked)
            VALUES ($1, $2, $3, $4, 0)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(token_digest)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Look up a refresh token by its digest
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn get_refresh_token_by_digest(
        &self,
        token_digest: &str,
    ) -> AppResult<Option<RefreshTokenRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, token_digest, expires_at, revoked, created_at
            FROM refresh_tokens WHERE token_digest = $1
            ",
        )
        .bind(token_digest)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let id: String = r.get("id");
            let user_id: String = r.get("user_id");
            Ok(RefreshTokenRecord {
                id: parse_stored_uuid(&id)?,
                user_id: parse_stored_uuid(&user_id)?,
                token_digest: r.get("token_digest"),
                expires_at: r.get("expires_at"),
                revoked: r.get("revoked"),
                created_at: r.get("created_at"),
            })
        })
        .transpose()
    }

    /// Revoke the presented token and issue a replacement as one transaction.
    ///
    /// Rotation must be atomic: a crash between revoke and insert would
    /// otherwise log the user out entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails
    pub async fn rotate_refresh_token(
        &self,
        old_token_id: Uuid,
        user_id: Uuid,
        new_token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Uuid> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE refresh_tokens SET revoked = 1 WHERE id = $1")
            .bind(old_token_id.to_string())
            .execute(&mut *tx)
            .await?;

        let new_id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (id, user_id, token_digest, expires_at, revoked)
            VALUES ($1, $2, $3, $4, 0)
            ",
        )
        .bind(new_id.to_string())
        .bind(user_id.to_string())
        .bind(new_token_digest)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(new_id)
    }

    /// Revoke every refresh token issued to a user (logout-everywhere)
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn revoke_refresh_tokens_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("UPDATE refresh_tokens SET revoked = 1 WHERE user_id = $1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
