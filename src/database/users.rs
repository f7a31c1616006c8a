// ABOUTME: User account database operations
// ABOUTME: Handles user registration rows, lookups by email, and primary shop updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::utils::uuid::parse_stored_uuid;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                display_name TEXT,
                password_hash TEXT NOT NULL,
                primary_shop_id TEXT,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                last_active DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already in use or the insert fails
    pub async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(AppError::new(
                crate::errors::ErrorCode::ResourceAlreadyExists,
                "Email already in use by another user",
            ));
        }

        sqlx::query(
            r"
            INSERT INTO users (id, email, display_name, password_hash, primary_shop_id,
                               is_active, created_at, last_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.primary_shop_id.map(|id| id.to_string()))
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.last_active)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, email, display_name, password_hash, primary_shop_id,
                   is_active, created_at, last_active
            FROM users WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Get a user by email (exact match; emails are stored lowercased)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, email, display_name, password_hash, primary_shop_id,
                   is_active, created_at, last_active
            FROM users WHERE LOWER(email) = LOWER($1)
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Point the user's primary shop at the given shop
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn set_primary_shop(&self, user_id: Uuid, shop_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET primary_shop_id = $2 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(shop_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record authenticated activity for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn touch_last_active(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_active = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub(super) fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let id: String = row.get("id");
        let primary_shop_id: Option<String> = row.get("primary_shop_id");

        Ok(User {
            id: parse_stored_uuid(&id)?,
            email: row.get("email"),
            display_name: row.get("display_name"),
            password_hash: row.get("password_hash"),
            primary_shop_id: primary_shop_id
                .as_deref()
                .map(parse_stored_uuid)
                .transpose()?,
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
            last_active: row.get("last_active"),
        })
    }
}
