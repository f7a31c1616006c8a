// ABOUTME: Staff invitation lifecycle service: create, view by token, accept, cancel, resend
// ABOUTME: Owns token issuance, lazy expiry, email delivery semantics, and transactional acceptance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::limits::INVITATION_EXPIRY_DAYS;
use crate::crypto;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Invitation, InvitationStatus, StaffRole};
use crate::notifications::{EmailGateway, EmailMessage};

/// What the creator gets back. Deliberately excludes the token: it is
/// delivered only via the email side channel.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationSummary {
    /// Invitation identifier
    pub id: Uuid,
    /// Invitee email
    pub email: String,
    /// Role granted on acceptance
    pub role: StaffRole,
    /// Current lifecycle state
    pub status: InvitationStatus,
    /// Expiry of the current token
    pub expires_at: DateTime<Utc>,
}

impl From<&Invitation> for InvitationSummary {
    fn from(invitation: &Invitation) -> Self {
        Self {
            id: invitation.id,
            email: invitation.email.clone(),
            role: invitation.role,
            status: invitation.status,
            expires_at: invitation.expires_at,
        }
    }
}

/// What an unauthenticated viewer of an invitation link sees. Excludes the
/// token and internal ids the viewer has no use for.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationView {
    /// Invitee email
    pub email: String,
    /// Role granted on acceptance
    pub role: StaffRole,
    /// Expiry of the invitation
    pub expires_at: DateTime<Utc>,
    /// Name of the shop the invitee would join
    pub shop_name: String,
}

/// Result of a successful acceptance
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedMembership {
    /// Shop joined
    pub shop_id: Uuid,
    /// Shop display name
    pub shop_name: String,
    /// Role granted
    pub role: StaffRole,
}

/// Owns the lifecycle of shop-staff invitations.
///
/// The email gateway is an injected dependency rather than a process-wide
/// singleton so the service can be exercised with a fake gateway.
pub struct InvitationService {
    database: Database,
    email: Arc<dyn EmailGateway>,
    invite_base_url: String,
}

impl InvitationService {
    /// Create the service with its collaborators
    #[must_use]
    pub fn new(database: Database, email: Arc<dyn EmailGateway>, invite_base_url: String) -> Self {
        Self {
            database,
            email,
            invite_base_url,
        }
    }

    /// Create a pending invitation and send the invitation email.
    ///
    /// If the email cannot be delivered the freshly created row is deleted
    /// again: the system does not keep invitations nobody was told about.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the shop does not exist
    /// - `AlreadyMember` if a user with this email is already an active employee
    /// - `DuplicatePendingInvitation` if a pending invitation exists for this email
    /// - `EmailDeliveryFailed` if the invitation email could not be sent
    pub async fn create(
        &self,
        shop_id: Uuid,
        inviter_user_id: Uuid,
        email: &str,
        role: StaffRole,
    ) -> AppResult<InvitationSummary> {
        let shop = self
            .database
            .get_shop(shop_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shop"))?;

        // Fast-path friendly errors; the partial unique index on pending
        // (shop, email) and the unique (shop, user) membership are the
        // actual race-breakers.
        if let Some(existing_user) = self.database.get_user_by_email(email).await? {
            if let Some(membership) = self.database.get_membership(shop_id, existing_user.id).await?
            {
                if membership.is_active {
                    return Err(AppError::already_member(shop_id));
                }
            }
        }

        if self
            .database
            .find_pending_invitation(shop_id, email)
            .await?
            .is_some()
        {
            return Err(AppError::duplicate_pending_invitation(email));
        }

        let token = crypto::generate_security_token()?;
        let invitation = Invitation::new(
            shop_id,
            inviter_user_id,
            email.to_lowercase(),
            role,
            token,
        );
        self.database.insert_invitation(&invitation).await?;

        if let Err(send_error) = self
            .email
            .send(&self.invitation_email(&invitation, &shop.name))
            .await
        {
            warn!(
                invitation_id = %invitation.id,
                shop_id = %shop_id,
                "invitation email failed; rolling back invitation row"
            );
            self.database.delete_invitation(invitation.id).await?;
            return Err(send_error);
        }

        info!(
            invitation_id = %invitation.id,
            shop_id = %shop_id,
            role = %role,
            "invitation created"
        );

        Ok(InvitationSummary::from(&invitation))
    }

    /// Look up an invitation by token for an unauthenticated viewer.
    ///
    /// A pending invitation past its expiry is transitioned to `expired`
    /// here, persisted, and then reported as expired; repeated reads keep
    /// returning `Expired`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no invitation matches the token
    /// - `Expired` if the expiry has passed
    /// - `AlreadyProcessed` if the invitation is accepted or cancelled
    pub async fn get_by_token(&self, token: &str) -> AppResult<InvitationView> {
        let invitation = self.resolve_pending(token).await?;

        let shop = self
            .database
            .get_shop(invitation.shop_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shop"))?;

        Ok(InvitationView {
            email: invitation.email,
            role: invitation.role,
            expires_at: invitation.expires_at,
            shop_name: shop.name,
        })
    }

    /// Accept an invitation as the authenticated user.
    ///
    /// The membership insert, the user's primary-shop update, and the status
    /// transition land in one transaction.
    ///
    /// # Errors
    ///
    /// - everything `get_by_token` can return
    /// - `EmailMismatch` if the authenticated user's email differs from the
    ///   invitee email (case-insensitive comparison)
    /// - `AlreadyMember` if the user already holds an active membership; the
    ///   invitation is still closed as accepted in that case
    pub async fn accept(&self, token: &str, user_id: Uuid) -> AppResult<AcceptedMembership> {
        let invitation = self.resolve_pending(token).await?;

        let user = self
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if !user.email.eq_ignore_ascii_case(&invitation.email) {
            warn!(
                invitation_id = %invitation.id,
                user_id = %user_id,
                "invitation accept attempted by a different email"
            );
            return Err(AppError::email_mismatch());
        }

        if let Some(membership) = self
            .database
            .get_membership(invitation.shop_id, user_id)
            .await?
        {
            if membership.is_active {
                // Idempotent closure: the invitation is spent even though no
                // new membership was created.
                self.database
                    .set_invitation_status(invitation.id, InvitationStatus::Accepted)
                    .await?;
                return Err(AppError::already_member(invitation.shop_id));
            }
        }

        let shop = self
            .database
            .get_shop(invitation.shop_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shop"))?;

        let membership = self.database.accept_invitation(&invitation, user_id).await?;

        info!(
            invitation_id = %invitation.id,
            shop_id = %invitation.shop_id,
            user_id = %user_id,
            role = %membership.role,
            "invitation accepted"
        );

        Ok(AcceptedMembership {
            shop_id: shop.id,
            shop_name: shop.name,
            role: membership.role,
        })
    }

    /// Cancel a pending invitation. Terminal; a cancelled invitation can be
    /// neither resent nor accepted.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the invitation does not exist
    /// - `InvalidState` if it is not pending
    pub async fn cancel(&self, invitation_id: Uuid, actor_id: Uuid) -> AppResult<()> {
        let invitation = self
            .database
            .get_invitation(invitation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation"))?;

        if invitation.status != InvitationStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Only pending invitations can be cancelled; this one is {}",
                invitation.status
            )));
        }

        self.database
            .set_invitation_status(invitation_id, InvitationStatus::Cancelled)
            .await?;

        info!(
            invitation_id = %invitation_id,
            actor_id = %actor_id,
            "invitation cancelled"
        );

        Ok(())
    }

    /// Regenerate the token and expiry of a pending invitation and re-send
    /// the email. The previous token becomes useless because lookups are by
    /// exact match.
    ///
    /// A failed resend reports `EmailDeliveryFailed` but does NOT roll back
    /// the refreshed token: a valid invitation existed before this call and
    /// destroying it would punish the invitee for a mail-provider hiccup.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the invitation does not exist
    /// - `InvalidState` if it is not pending
    /// - `EmailDeliveryFailed` if the email could not be sent
    pub async fn resend(&self, invitation_id: Uuid) -> AppResult<InvitationSummary> {
        let invitation = self
            .database
            .get_invitation(invitation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation"))?;

        if invitation.status != InvitationStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Only pending invitations can be resent; this one is {}",
                invitation.status
            )));
        }

        let shop = self
            .database
            .get_shop(invitation.shop_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shop"))?;

        let token = crypto::generate_security_token()?;
        let expires_at = Utc::now() + Duration::days(INVITATION_EXPIRY_DAYS);
        self.database
            .refresh_invitation_token(invitation.id, &token, expires_at)
            .await?;

        let refreshed = Invitation {
            token,
            expires_at,
            ..invitation
        };

        self.email
            .send(&self.invitation_email(&refreshed, &shop.name))
            .await?;

        info!(invitation_id = %refreshed.id, "invitation resent");

        Ok(InvitationSummary::from(&refreshed))
    }

    /// Shared lookup + lazy expiry + status gate for token-based operations
    async fn resolve_pending(&self, token: &str) -> AppResult<Invitation> {
        let invitation = self
            .database
            .get_invitation_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation"))?;

        if invitation.status == InvitationStatus::Pending && invitation.is_expired() {
            self.database
                .set_invitation_status(invitation.id, InvitationStatus::Expired)
                .await?;
            return Err(AppError::invitation_expired());
        }

        match invitation.status {
            InvitationStatus::Pending => Ok(invitation),
            InvitationStatus::Expired => Err(AppError::invitation_expired()),
            status => Err(AppError::invitation_already_processed(status)),
        }
    }

    fn invitation_email(&self, invitation: &Invitation, shop_name: &str) -> EmailMessage {
        let link = format!(
            "{}/invitations/{}",
            self.invite_base_url.trim_end_matches('/'),
            invitation.token
        );
        EmailMessage {
            to: invitation.email.clone(),
            subject: format!("You've been invited to join {shop_name}"),
            html_body: format!(
                "<p>You've been invited to join <strong>{shop_name}</strong> as {role}.</p>\
                 <p><a href=\"{link}\">Accept your invitation</a></p>\
                 <p>This link expires on {expiry}.</p>",
                role = invitation.role,
                expiry = invitation.expires_at.format("%Y-%m-%d")
            ),
            text_body: format!(
                "You've been invited to join {shop_name} as {role}.\n\
                 Accept your invitation: {link}\n\
                 This link expires on {expiry}.",
                role = invitation.role,
                expiry = invitation.expires_at.format("%Y-%m-%d")
            ),
        }
    }
}
