// ABOUTME: Staff invitation model with a single-use token and four-state lifecycle
// ABOUTME: Invitation and InvitationStatus definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::limits::INVITATION_EXPIRY_DAYS;
use crate::errors::AppError;
use crate::models::StaffRole;

/// Lifecycle state of an invitation.
///
/// Transitions are monotonic except pending -> expired, which is detected
/// lazily whenever a pending invitation is read past its expiry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Awaiting a response; the only state from which transitions are possible
    Pending,
    /// Consumed by the invited user; terminal
    Accepted,
    /// Expiry passed before acceptance; terminal
    Expired,
    /// Withdrawn by a shop manager; terminal
    Cancelled,
}

impl InvitationStatus {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether this is a terminal state
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl Display for InvitationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AppError::invalid_input(format!(
                "Invalid invitation status: {s}"
            ))),
        }
    }
}

/// A time-boxed, single-use token granting a specific email the right to
/// join a specific shop with a specific role.
///
/// The token is globally unique and delivered only via the email side
/// channel; API responses to the creator never carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    /// Unique invitation identifier
    pub id: Uuid,
    /// Shop the invitee would join
    pub shop_id: Uuid,
    /// User who issued the invitation
    pub inviter_user_id: Uuid,
    /// Invitee email address
    pub email: String,
    /// Single-use opaque token, unique across all invitations
    #[serde(skip_serializing)]
    pub token: String,
    /// Role granted on acceptance
    pub role: StaffRole,
    /// Current lifecycle state
    pub status: InvitationStatus,
    /// Moment after which the invitation can no longer be accepted
    pub expires_at: DateTime<Utc>,
    /// When the invitation was created
    pub created_at: DateTime<Utc>,
    /// When the invitation was last updated
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    /// Creates a pending invitation with a 7-day expiry window
    #[must_use]
    pub fn new(
        shop_id: Uuid,
        inviter_user_id: Uuid,
        email: String,
        role: StaffRole,
        token: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            shop_id,
            inviter_user_id,
            email,
            token,
            role,
            status: InvitationStatus::Pending,
            expires_at: now + Duration::days(INVITATION_EXPIRY_DAYS),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the expiry timestamp has passed
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            InvitationStatus::Pending,
            InvitationStatus::Accepted,
            InvitationStatus::Expired,
            InvitationStatus::Cancelled,
        ] {
            assert_eq!(InvitationStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_only_pending_is_non_terminal() {
        assert!(!InvitationStatus::Pending.is_terminal());
        assert!(InvitationStatus::Accepted.is_terminal());
        assert!(InvitationStatus::Expired.is_terminal());
        assert!(InvitationStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_new_invitation_expires_in_seven_days() {
        let invitation = Invitation::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "groomer@example.com".into(),
            StaffRole::Staff,
            "token".into(),
        );
        let window = invitation.expires_at - invitation.created_at;
        assert_eq!(window.num_days(), INVITATION_EXPIRY_DAYS);
        assert!(!invitation.is_expired());
    }
}
