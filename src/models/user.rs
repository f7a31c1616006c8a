// ABOUTME: User account model for the multi-tenant authentication system
// ABOUTME: Staff and owner accounts authenticate with email + password and carry a primary shop pointer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a staff or owner account.
///
/// Shop membership is managed via the `shop_members` junction table, allowing
/// a user to work at multiple shops. `primary_shop_id` is a convenience
/// pointer updated when the user creates a shop or accepts an invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Login email, unique across the system
    pub email: String,
    /// Display name shown in schedules and invitations
    pub display_name: Option<String>,
    /// Bcrypt password hash
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Shop shown by default after login
    pub primary_shop_id: Option<Uuid>,
    /// Whether the account can log in
    pub is_active: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Last authenticated activity
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Creates a new active user with a fresh id
    #[must_use]
    pub fn new(email: String, password_hash: String, display_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            primary_shop_id: None,
            is_active: true,
            created_at: now,
            last_active: now,
        }
    }
}
