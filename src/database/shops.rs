// ABOUTME: Shop and staff membership database operations
// ABOUTME: Handles shop creation with owner bootstrap, membership lookups, and staff listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use std::str::FromStr;

use super::Database;
use crate::errors::AppResult;
use crate::models::{Shop, ShopMembership, StaffRole};
use crate::utils::uuid::parse_stored_uuid;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the shops and shop_members tables
    pub(super) async fn migrate_shops(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS shops (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT UNIQUE NOT NULL,
                phone TEXT,
                address TEXT,
                owner_user_id TEXT NOT NULL REFERENCES users(id),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // UNIQUE(shop_id, user_id) is the race-breaker for concurrent
        // membership inserts (double-accept of the same invitation).
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS shop_members (
                id TEXT PRIMARY KEY,
                shop_id TEXT NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                role TEXT NOT NULL CHECK (role IN ('owner', 'manager', 'staff')),
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (shop_id, user_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_shop_members_user ON shop_members(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Create a shop, its owner membership, and the creator's primary-shop
    /// pointer as one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three writes fails
    pub async fn create_shop_with_owner(&self, shop: &Shop) -> AppResult<ShopMembership> {
        let membership = ShopMembership::new(shop.id, shop.owner_user_id, StaffRole::Owner);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO shops (id, name, slug, phone, address, owner_user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(shop.id.to_string())
        .bind(&shop.name)
        .bind(&shop.slug)
        .bind(&shop.phone)
        .bind(&shop.address)
        .bind(shop.owner_user_id.to_string())
        .bind(shop.created_at)
        .bind(shop.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO shop_members (id, shop_id, user_id, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(membership.id.to_string())
        .bind(membership.shop_id.to_string())
        .bind(membership.user_id.to_string())
        .bind(membership.role.as_str())
        .bind(membership.is_active)
        .bind(membership.created_at)
        .bind(membership.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET primary_shop_id = $2 WHERE id = $1")
            .bind(shop.owner_user_id.to_string())
            .bind(shop.id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(membership)
    }

    /// Get a shop by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn get_shop(&self, shop_id: Uuid) -> AppResult<Option<Shop>> {
        let row = sqlx::query(
            r"
            SELECT id, name, slug, phone, address, owner_user_id, created_at, updated_at
            FROM shops WHERE id = $1
            ",
        )
        .bind(shop_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_shop(&r)).transpose()
    }

    /// Update a shop's editable fields
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_shop(&self, shop: &Shop) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE shops SET name = $2, phone = $3, address = $4,
                             updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(shop.id.to_string())
        .bind(&shop.name)
        .bind(&shop.phone)
        .bind(&shop.address)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List every shop the user holds an active membership of
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupted
    pub async fn list_shops_for_user(&self, user_id: Uuid) -> AppResult<Vec<Shop>> {
        let rows = sqlx::query(
            r"
            SELECT s.id, s.name, s.slug, s.phone, s.address, s.owner_user_id,
                   s.created_at, s.updated_at
            FROM shops s
            JOIN shop_members m ON m.shop_id = s.id
            WHERE m.user_id = $1 AND m.is_active = 1
            ORDER BY s.created_at
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_shop).collect()
    }

    /// Get the membership row for a (shop, user) pair
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn get_membership(
        &self,
        shop_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<ShopMembership>> {
        let row = sqlx::query(
            r"
            SELECT id, shop_id, user_id, role, is_active, created_at, updated_at
            FROM shop_members WHERE shop_id = $1 AND user_id = $2
            ",
        )
        .bind(shop_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_membership(&r)).transpose()
    }

    /// List all active members of a shop
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupted
    pub async fn list_members(&self, shop_id: Uuid) -> AppResult<Vec<ShopMembership>> {
        let rows = sqlx::query(
            r"
            SELECT id, shop_id, user_id, role, is_active, created_at, updated_at
            FROM shop_members WHERE shop_id = $1 AND is_active = 1
            ORDER BY created_at
            ",
        )
        .bind(shop_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_membership).collect()
    }

    /// Insert a membership row directly (staff added without an invitation)
    ///
    /// # Errors
    ///
    /// Returns an error if the (shop, user) pair already exists or the
    /// insert fails
    pub async fn add_member(&self, membership: &ShopMembership) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO shop_members (id, shop_id, user_id, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(membership.id.to_string())
        .bind(membership.shop_id.to_string())
        .bind(membership.user_id.to_string())
        .bind(membership.role.as_str())
        .bind(membership.is_active)
        .bind(membership.created_at)
        .bind(membership.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deactivate a member (history-preserving removal)
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn deactivate_member(&self, shop_id: Uuid, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE shop_members SET is_active = 0, updated_at = CURRENT_TIMESTAMP
            WHERE shop_id = $1 AND user_id = $2
            ",
        )
        .bind(shop_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn row_to_shop(row: &SqliteRow) -> AppResult<Shop> {
        let id: String = row.get("id");
        let owner: String = row.get("owner_user_id");
        Ok(Shop {
            id: parse_stored_uuid(&id)?,
            name: row.get("name"),
            slug: row.get("slug"),
            phone: row.get("phone"),
            address: row.get("address"),
            owner_user_id: parse_stored_uuid(&owner)?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    pub(super) fn row_to_membership(row: &SqliteRow) -> AppResult<ShopMembership> {
        let id: String = row.get("id");
        let shop_id: String = row.get("shop_id");
        let user_id: String = row.get("user_id");
        let role: String = row.get("role");
        Ok(ShopMembership {
            id: parse_stored_uuid(&id)?,
            shop_id: parse_stored_uuid(&shop_id)?,
            user_id: parse_stored_uuid(&user_id)?,
            role: StaffRole::from_str(&role)?,
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
