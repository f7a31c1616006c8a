// ABOUTME: Shop tenant model and staff membership with role-based permissions
// ABOUTME: Shop, ShopMembership, and StaffRole definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// A tenant business entity. All catalog and scheduling data is scoped to one shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    /// Unique shop identifier
    pub id: Uuid,
    /// Shop display name
    pub name: String,
    /// URL-safe slug
    pub slug: String,
    /// Contact phone number
    pub phone: Option<String>,
    /// Street address
    pub address: Option<String>,
    /// User ID of the shop creator
    pub owner_user_id: Uuid,
    /// When the shop was created
    pub created_at: DateTime<Utc>,
    /// When the shop was last updated
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    /// Creates a new shop owned by the given user
    #[must_use]
    pub fn new(
        name: String,
        slug: String,
        phone: Option<String>,
        address: Option<String>,
        owner_user_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            phone,
            address,
            owner_user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Role of a staff member within one shop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    /// Shop owner, assigned automatically to the shop's creator
    Owner,
    /// Manager, may administer staff and invitations
    Manager,
    /// Regular groomer
    Staff,
}

impl StaffRole {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }

    /// Whether this role may manage staff, invitations, and the service catalog
    #[must_use]
    pub const fn can_manage_shop(&self) -> bool {
        matches!(self, Self::Owner | Self::Manager)
    }
}

impl Display for StaffRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(AppError::invalid_input(format!("Invalid staff role: {s}"))),
        }
    }
}

/// Association of a user to a shop with a role.
///
/// The (shop, user) pair is unique at the storage layer; that constraint,
/// not the application pre-check, is what breaks concurrent double-inserts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopMembership {
    /// Unique membership identifier
    pub id: Uuid,
    /// Shop this membership belongs to
    pub shop_id: Uuid,
    /// Member user
    pub user_id: Uuid,
    /// Role within the shop
    pub role: StaffRole,
    /// Inactive members keep their row for history but lose access
    pub is_active: bool,
    /// When the membership was created
    pub created_at: DateTime<Utc>,
    /// When the membership was last updated
    pub updated_at: DateTime<Utc>,
}

impl ShopMembership {
    /// Creates a new active membership
    #[must_use]
    pub fn new(shop_id: Uuid, user_id: Uuid, role: StaffRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            shop_id,
            user_id,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [StaffRole::Owner, StaffRole::Manager, StaffRole::Staff] {
            assert_eq!(StaffRole::from_str(role.as_str()).unwrap(), role);
        }
        assert!(StaffRole::from_str("janitor").is_err());
    }

    #[test]
    fn test_manage_permissions() {
        assert!(StaffRole::Owner.can_manage_shop());
        assert!(StaffRole::Manager.can_manage_shop());
        assert!(!StaffRole::Staff.can_manage_shop());
    }
}
