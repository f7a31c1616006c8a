// ABOUTME: Customer models for pet owners and their dogs, both scoped to a shop
// ABOUTME: PetOwner and Dog definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer of one shop. Owners are shop-scoped records, not login accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetOwner {
    /// Unique owner identifier
    pub id: Uuid,
    /// Shop this customer belongs to
    pub shop_id: Uuid,
    /// Owner name
    pub name: String,
    /// Contact phone number
    pub phone: String,
    /// Contact email, if provided
    pub email: Option<String>,
    /// Free-form staff notes
    pub memo: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl PetOwner {
    /// Creates a new customer record for a shop
    #[must_use]
    pub fn new(shop_id: Uuid, name: String, phone: String, email: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            shop_id,
            name,
            phone,
            email,
            memo: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A dog registered at a shop, attached to one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dog {
    /// Unique dog identifier
    pub id: Uuid,
    /// Shop this dog is registered at
    pub shop_id: Uuid,
    /// Owning customer
    pub owner_id: Uuid,
    /// Dog name
    pub name: String,
    /// Breed, if known
    pub breed: Option<String>,
    /// Weight in kilograms, used for pricing guidance
    pub weight_kg: Option<f64>,
    /// Birth date, if known
    pub birth_date: Option<NaiveDate>,
    /// Grooming notes (temperament, clipper sensitivities)
    pub memo: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Dog {
    /// Creates a new dog record under the given owner
    #[must_use]
    pub fn new(shop_id: Uuid, owner_id: Uuid, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            shop_id,
            owner_id,
            name,
            breed: None,
            weight_kg: None,
            birth_date: None,
            memo: None,
            created_at: now,
            updated_at: now,
        }
    }
}
