// ABOUTME: Grooming service catalog database operations
// ABOUTME: Shop-scoped CRUD with logical delete and name-based find-or-create
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use super::Database;
use crate::errors::AppResult;
use crate::models::GroomingServiceType;
use crate::utils::uuid::parse_stored_uuid;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the grooming_service_types table
    pub(super) async fn migrate_catalog(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS grooming_service_types (
                id TEXT PRIMARY KEY,
                shop_id TEXT NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT,
                default_price INTEGER NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (shop_id, name)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_grooming_service_types_shop ON grooming_service_types(shop_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new catalog entry
    ///
    /// # Errors
    ///
    /// Returns an error if the (shop, name) pair already exists or the
    /// insert fails
    pub async fn create_service_type(&self, service: &GroomingServiceType) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO grooming_service_types (id, shop_id, name, description, default_price,
                                                is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(service.id.to_string())
        .bind(service.shop_id.to_string())
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.default_price)
        .bind(service.is_active)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a catalog entry by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn get_service_type(
        &self,
        service_type_id: Uuid,
    ) -> AppResult<Option<GroomingServiceType>> {
        let row = sqlx::query(
            r"
            SELECT id, shop_id, name, description, default_price, is_active,
                   created_at, updated_at
            FROM grooming_service_types WHERE id = $1
            ",
        )
        .bind(service_type_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_service_type(&r)).transpose()
    }

    /// Find a catalog entry by (shop, name), used by legacy label absorption
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn find_service_type_by_name(
        &self,
        shop_id: Uuid,
        name: &str,
    ) -> AppResult<Option<GroomingServiceType>> {
        let row = sqlx::query(
            r"
            SELECT id, shop_id, name, description, default_price, is_active,
                   created_at, updated_at
            FROM grooming_service_types WHERE shop_id = $1 AND name = $2
            ",
        )
        .bind(shop_id.to_string())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_service_type(&r)).transpose()
    }

    /// List catalog entries for a shop
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupted
    pub async fn list_service_types(
        &self,
        shop_id: Uuid,
        include_inactive: bool,
    ) -> AppResult<Vec<GroomingServiceType>> {
        let rows = if include_inactive {
            sqlx::query(
                r"
                SELECT id, shop_id, name, description, default_price, is_active,
                       created_at, updated_at
                FROM grooming_service_types WHERE shop_id = $1
                ORDER BY name
                ",
            )
            .bind(shop_id.to_string())
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(
                r"
                SELECT id, shop_id, name, description, default_price, is_active,
                       created_at, updated_at
                FROM grooming_service_types WHERE shop_id = $1 AND is_active = 1
                ORDER BY name
                ",
            )
            .bind(shop_id.to_string())
            .fetch_all(&self.pool)
            .await?
        };

        rows.iter().map(Self::row_to_service_type).collect()
    }

    /// Update a catalog entry's editable fields
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_service_type(&self, service: &GroomingServiceType) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE grooming_service_types
            SET name = $2, description = $3, default_price = $4, is_active = $5,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(service.id.to_string())
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.default_price)
        .bind(service.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Logical delete: flip the active flag off. The row stays because
    /// historical appointment lines reference it.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn deactivate_service_type(&self, service_type_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE grooming_service_types SET is_active = 0, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(service_type_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn row_to_service_type(row: &SqliteRow) -> AppResult<GroomingServiceType> {
        let id: String = row.get("id");
        let shop_id: String = row.get("shop_id");
        Ok(GroomingServiceType {
            id: parse_stored_uuid(&id)?,
            shop_id: parse_stored_uuid(&shop_id)?,
            name: row.get("name"),
            description: row.get("description"),
            default_price: row.get("default_price"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
