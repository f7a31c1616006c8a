// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Database Management
//!
//! This module provides database functionality for the multi-tenant Groomdesk
//! server. The schema is created by idempotent migrations at startup; writes
//! that must be atomic as a unit (invitation acceptance, appointment line
//! replacement) run inside a single transaction.
//!
//! Correctness under concurrent requests relies on the store's transactional
//! guarantees and unique constraints (unique invitation token, unique
//! (shop, user) membership) rather than application-level locking.

mod appointments;
mod catalog;
mod customers;
mod invitations;
mod shops;
mod tokens;
mod users;

pub mod test_utils;

pub use appointments::{RevenueSummary, ServiceLineDetail, StatusRevenue};
pub use tokens::RefreshTokenRecord;

use crate::errors::AppResult;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database manager for all persistent state
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or a
    /// migration statement fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        // An in-memory database exists per connection; the pool must not
        // hand out a second connection that has never seen the schema.
        let pool = if connection_options.contains(":memory:") {
            sqlx::sqlite::SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&connection_options)
                .await?
        } else {
            SqlitePool::connect(&connection_options).await?
        };

        let db = Self { pool };

        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_refresh_tokens().await?;
        self.migrate_shops().await?;
        self.migrate_invitations().await?;
        self.migrate_customers().await?;
        self.migrate_catalog().await?;
        self.migrate_appointments().await?;

        Ok(())
    }
}
