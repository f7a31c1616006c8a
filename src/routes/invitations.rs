// ABOUTME: Staff invitation route handlers wrapping the invitation lifecycle service
// ABOUTME: Create, view by token, accept, cancel, resend, and per-shop listing endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

//! Staff invitation routes
//!
//! Viewing an invitation by token is unauthenticated (the link lands in the
//! invitee's inbox before they have an account); every other operation
//! requires a valid bearer token, and issuing or cancelling requires an
//! owner or manager role in the invitation's shop.

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::StaffRole;
use crate::routes;
use crate::utils::uuid::parse_uuid;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body for creating an invitation
#[derive(Debug, Deserialize)]
pub struct CreateInvitationRequest {
    /// Shop the invitee would join
    pub shop_id: String,
    /// Invitee email
    pub email: String,
    /// Role granted on acceptance; defaults to staff
    pub role: Option<StaffRole>,
}

/// Response after a successful resend
#[derive(Debug, Serialize)]
pub struct ResendResponse {
    /// New expiry of the refreshed invitation
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Invitation routes implementation
pub struct InvitationRoutes;

impl InvitationRoutes {
    /// Create all invitation routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/invitations", post(Self::handle_create))
            .route("/invitations/token/:token", get(Self::handle_get_by_token))
            .route(
                "/invitations/token/:token/accept",
                post(Self::handle_accept),
            )
            .route("/invitations/:id", delete(Self::handle_cancel))
            .route("/invitations/:id/resend", post(Self::handle_resend))
            .route("/shops/:shop_id/invitations", get(Self::handle_list))
            .with_state(resources)
    }

    /// Handle invitation creation
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateInvitationRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&request.shop_id)?;
        routes::require_manager(&resources, shop_id, auth.user_id).await?;

        let email = request.email.trim();
        if !email.contains('@') {
            return Err(AppError::invalid_input("Invalid invitee email address"));
        }

        let summary = resources
            .invitations
            .create(
                shop_id,
                auth.user_id,
                email,
                request.role.unwrap_or(StaffRole::Staff),
            )
            .await?;

        Ok((StatusCode::CREATED, Json(summary)).into_response())
    }

    /// Handle unauthenticated invitation viewing by token
    async fn handle_get_by_token(
        State(resources): State<Arc<ServerResources>>,
        Path(token): Path<String>,
    ) -> Result<Response, AppError> {
        let view = resources.invitations.get_by_token(&token).await?;

        Ok((StatusCode::OK, Json(view)).into_response())
    }

    /// Handle invitation acceptance by the authenticated user
    async fn handle_accept(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(token): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;

        let accepted = resources.invitations.accept(&token, auth.user_id).await?;

        Ok((StatusCode::OK, Json(accepted)).into_response())
    }

    /// Handle invitation cancellation
    async fn handle_cancel(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let invitation_id = parse_uuid(&id)?;

        let invitation = resources
            .database
            .get_invitation(invitation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation"))?;
        routes::require_manager(&resources, invitation.shop_id, auth.user_id).await?;

        resources
            .invitations
            .cancel(invitation_id, auth.user_id)
            .await?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle invitation resend with token refresh
    async fn handle_resend(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let invitation_id = parse_uuid(&id)?;

        let invitation = resources
            .database
            .get_invitation(invitation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation"))?;
        routes::require_manager(&resources, invitation.shop_id, auth.user_id).await?;

        let summary = resources.invitations.resend(invitation_id).await?;

        Ok((
            StatusCode::OK,
            Json(ResendResponse {
                expires_at: summary.expires_at,
            }),
        )
            .into_response())
    }

    /// Handle listing a shop's invitations
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(shop_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&shop_id)?;
        routes::require_manager(&resources, shop_id, auth.user_id).await?;

        let invitations = resources.database.list_invitations_for_shop(shop_id).await?;
        let summaries: Vec<crate::services::InvitationSummary> =
            invitations.iter().map(Into::into).collect();

        Ok((StatusCode::OK, Json(summaries)).into_response())
    }
}
