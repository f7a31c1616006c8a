// ABOUTME: Invitation database operations including the transactional acceptance path
// ABOUTME: Handles token lookups, lazy expiry persistence, token refresh, and rollback deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use std::str::FromStr;

use super::Database;
use crate::errors::AppResult;
use crate::models::{Invitation, InvitationStatus, ShopMembership, StaffRole};
use crate::utils::uuid::parse_stored_uuid;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the invitations table
    pub(super) async fn migrate_invitations(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS invitations (
                id TEXT PRIMARY KEY,
                shop_id TEXT NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
                inviter_user_id TEXT NOT NULL REFERENCES users(id),
                email TEXT NOT NULL,
                token TEXT UNIQUE NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('owner', 'manager', 'staff')),
                status TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'accepted', 'expired', 'cancelled')),
                expires_at DATETIME NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Partial unique index: at most one pending invitation per
        // (shop, email). The application pre-check is only the fast path;
        // this index is what actually breaks the create/create race.
        sqlx::query(
            r"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_invitations_pending_unique
            ON invitations(shop_id, email) WHERE status = 'pending'
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_invitations_token ON invitations(token)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new invitation
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including when the pending
    /// unique index rejects a duplicate
    pub async fn insert_invitation(&self, invitation: &Invitation) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO invitations (id, shop_id, inviter_user_id, email, token, role,
                                     status, expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(invitation.id.to_string())
        .bind(invitation.shop_id.to_string())
        .bind(invitation.inviter_user_id.to_string())
        .bind(&invitation.email)
        .bind(&invitation.token)
        .bind(invitation.role.as_str())
        .bind(invitation.status.as_str())
        .bind(invitation.expires_at)
        .bind(invitation.created_at)
        .bind(invitation.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get an invitation by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn get_invitation(&self, invitation_id: Uuid) -> AppResult<Option<Invitation>> {
        let row = sqlx::query(
            r"
            SELECT id, shop_id, inviter_user_id, email, token, role, status,
                   expires_at, created_at, updated_at
            FROM invitations WHERE id = $1
            ",
        )
        .bind(invitation_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_invitation(&r)).transpose()
    }

    /// Get an invitation by exact token match
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn get_invitation_by_token(&self, token: &str) -> AppResult<Option<Invitation>> {
        let row = sqlx::query(
            r"
            SELECT id, shop_id, inviter_user_id, email, token, role, status,
                   expires_at, created_at, updated_at
            FROM invitations WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_invitation(&r)).transpose()
    }

    /// Find the pending invitation for a (shop, email) pair, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn find_pending_invitation(
        &self,
        shop_id: Uuid,
        email: &str,
    ) -> AppResult<Option<Invitation>> {
        let row = sqlx::query(
            r"
            SELECT id, shop_id, inviter_user_id, email, token, role, status,
                   expires_at, created_at, updated_at
            FROM invitations
            WHERE shop_id = $1 AND LOWER(email) = LOWER($2) AND status = 'pending'
            ",
        )
        .bind(shop_id.to_string())
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_invitation(&r)).transpose()
    }

    /// List invitations for a shop, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupted
    pub async fn list_invitations_for_shop(&self, shop_id: Uuid) -> AppResult<Vec<Invitation>> {
        let rows = sqlx::query(
            r"
            SELECT id, shop_id, inviter_user_id, email, token, role, status,
                   expires_at, created_at, updated_at
            FROM invitations WHERE shop_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(shop_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_invitation).collect()
    }

    /// Persist a status transition
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn set_invitation_status(
        &self,
        invitation_id: Uuid,
        status: InvitationStatus,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE invitations SET status = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(invitation_id.to_string())
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replace the token and expiry of a pending invitation (resend path).
    /// The old token becomes implicitly invalid since lookup is by exact match.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn refresh_invitation_token(
        &self,
        invitation_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE invitations SET token = $2, expires_at = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(invitation_id.to_string())
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete an invitation row. Used only to roll back creation when the
    /// invitation email could not be delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete_invitation(&self, invitation_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(invitation_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Consume an invitation: membership insert, primary-shop update, and
    /// status transition as one transaction.
    ///
    /// Partial application would allow a double-accept race, so either all
    /// three writes land or none do. A concurrent accept of the same token
    /// fails here on the unique (shop, user) membership constraint.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails
    pub async fn accept_invitation(
        &self,
        invitation: &Invitation,
        user_id: Uuid,
    ) -> AppResult<ShopMembership> {
        let membership = ShopMembership::new(invitation.shop_id, user_id, invitation.role);

        let mut tx = self.pool.begin().await?;

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
            .bind(user_id.to_string())
            .bind(invitation.shop_id.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"
            UPDATE invitations SET status = 'accepted', updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(invitation.id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(membership)
    }

    fn row_to_invitation(row: &SqliteRow) -> AppResult<Invitation> {
        let id: String = row.get("id");
        let shop_id: String = row.get("shop_id");
        let inviter: String = row.get("inviter_user_id");
        let role: String = row.get("role");
        let status: String = row.get("status");
        Ok(Invitation {
            id: parse_stored_uuid(&id)?,
            shop_id: parse_stored_uuid(&shop_id)?,
            inviter_user_id: parse_stored_uuid(&inviter)?,
            email: row.get("email"),
            token: row.get("token"),
            role: StaffRole::from_str(&role)?,
            status: InvitationStatus::from_str(&status)?,
            expires_at: row.get("expires_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
