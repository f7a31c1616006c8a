// ABOUTME: Customer database operations for pet owners and dogs
// ABOUTME: Shop-scoped CRUD for owner and dog records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use super::Database;
use crate::errors::AppResult;
use crate::models::{Dog, PetOwner};
use crate::utils::uuid::parse_stored_uuid;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the pet_owners and dogs tables
    pub(super) async fn migrate_customers(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS pet_owners (
                id TEXT PRIMARY KEY,
                shop_id TEXT NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                email TEXT,
                memo TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS dogs (
                id TEXT PRIMARY KEY,
                shop_id TEXT NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
                owner_id TEXT NOT NULL REFERENCES pet_owners(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                breed TEXT,
                weight_kg REAL,
                birth_date DATE,
                memo TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_pet_owners_shop ON pet_owners(shop_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_dogs_owner ON dogs(owner_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new pet owner
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_pet_owner(&self, owner: &PetOwner) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO pet_owners (id, shop_id, name, phone, email, memo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(owner.id.to_string())
        .bind(owner.shop_id.to_string())
        .bind(&owner.name)
        .bind(&owner.phone)
        .bind(&owner.email)
        .bind(&owner.memo)
        .bind(owner.created_at)
        .bind(owner.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a pet owner by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn get_pet_owner(&self, owner_id: Uuid) -> AppResult<Option<PetOwner>> {
        let row = sqlx::query(
            r"
            SELECT id, shop_id, name, phone, email, memo, created_at, updated_at
            FROM pet_owners WHERE id = $1
            ",
        )
        .bind(owner_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_owner(&r)).transpose()
    }

    /// List pet owners for a shop
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupted
    pub async fn list_pet_owners(&self, shop_id: Uuid) -> AppResult<Vec<PetOwner>> {
        let rows = sqlx::query(
            r"
            SELECT id, shop_id, name, phone, email, memo, created_at, updated_at
            FROM pet_owners WHERE shop_id = $1
            ORDER BY name
            ",
        )
        .bind(shop_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_owner).collect()
    }

    /// Update a pet owner's editable fields
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_pet_owner(&self, owner: &PetOwner) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE pet_owners SET name = $2, phone = $3, email = $4, memo = $5,
                                  updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(owner.id.to_string())
        .bind(&owner.name)
        .bind(&owner.phone)
        .bind(&owner.email)
        .bind(&owner.memo)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new dog
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_dog(&self, dog: &Dog) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO dogs (id, shop_id, owner_id, name, breed, weight_kg, birth_date,
                              memo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(dog.id.to_string())
        .bind(dog.shop_id.to_string())
        .bind(dog.owner_id.to_string())
        .bind(&dog.name)
        .bind(&dog.breed)
        .bind(dog.weight_kg)
        .bind(dog.birth_date)
        .bind(&dog.memo)
        .bind(dog.created_at)
        .bind(dog.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a dog by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn get_dog(&self, dog_id: Uuid) -> AppResult<Option<Dog>> {
        let row = sqlx::query(
            r"
            SELECT id, shop_id, owner_id, name, breed, weight_kg, birth_date,
                   memo, created_at, updated_at
            FROM dogs WHERE id = $1
            ",
        )
        .bind(dog_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_dog(&r)).transpose()
    }

    /// List dogs for an owner
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupted
    pub async fn list_dogs_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<Dog>> {
        let rows = sqlx::query(
            r"
            SELECT id, shop_id, owner_id, name, breed, weight_kg, birth_date,
                   memo, created_at, updated_at
            FROM dogs WHERE owner_id = $1
            ORDER BY name
            ",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_dog).collect()
    }

    /// Update a dog's editable fields
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_dog(&self, dog: &Dog) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE dogs SET name = $2, breed = $3, weight_kg = $4, birth_date = $5,
                            memo = $6, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(dog.id.to_string())
        .bind(&dog.name)
        .bind(&dog.breed)
        .bind(dog.weight_kg)
        .bind(dog.birth_date)
        .bind(&dog.memo)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn row_to_owner(row: &SqliteRow) -> AppResult<PetOwner> {
        let id: String = row.get("id");
        let shop_id: String = row.get("shop_id");
        Ok(PetOwner {
            id: parse_stored_uuid(&id)?,
            shop_id: parse_stored_uuid(&shop_id)?,
            name: row.get("name"),
            phone: row.get("phone"),
            email: row.get("email"),
            memo: row.get("memo"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn row_to_dog(row: &SqliteRow) -> AppResult<Dog> {
        let id: String = row.get("id");
        let shop_id: String = row.get("shop_id");
        let owner_id: String = row.get("owner_id");
        Ok(Dog {
            id: parse_stored_uuid(&id)?,
            shop_id: parse_stored_uuid(&shop_id)?,
            owner_id: parse_stored_uuid(&owner_id)?,
            name: row.get("name"),
            breed: row.get("breed"),
            weight_kg: row.get("weight_kg"),
            birth_date: row.get("birth_date"),
            memo: row.get("memo"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
