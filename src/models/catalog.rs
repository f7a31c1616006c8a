// ABOUTME: Shop-scoped grooming service catalog entries with default pricing
// ABOUTME: GroomingServiceType definition with logical-delete semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One billable service offering in a shop's catalog.
///
/// Entries are never physically removed: historical appointment lines
/// reference them, so deletion flips `is_active` to false. Inactive entries
/// can no longer be attached to new appointments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroomingServiceType {
    /// Unique service identifier
    pub id: Uuid,
    /// Shop whose catalog this entry belongs to
    pub shop_id: Uuid,
    /// Service name, unique within the shop
    pub name: String,
    /// Customer-facing description
    pub description: Option<String>,
    /// Default price in minor currency units, applied when a line does not
    /// carry an explicit price
    pub default_price: i64,
    /// Logical-delete flag
    pub is_active: bool,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
    /// When the entry was last updated
    pub updated_at: DateTime<Utc>,
}

impl GroomingServiceType {
    /// Creates a new active catalog entry
    #[must_use]
    pub fn new(shop_id: Uuid, name: String, default_price: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            shop_id,
            name,
            description: None,
            default_price,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
