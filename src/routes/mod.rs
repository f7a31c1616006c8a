// ABOUTME: Route module organization for Groomdesk HTTP endpoints
// ABOUTME: Provides centralized route definitions organized by domain with shared auth helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

//! Route module for the Groomdesk server
//!
//! This module organizes all HTTP routes by domain. Each domain module
//! contains route definitions and thin handler functions that delegate to
//! the service layer; handlers translate typed failures into 4xx responses
//! and infrastructure failures into opaque 5xx responses.

/// Appointment scheduling routes
pub mod appointments;
/// Authentication and session routes
pub mod auth;
/// Grooming service catalog routes
pub mod catalog;
/// Customer (pet owner and dog) routes
pub mod customers;
/// Health check and system status routes
pub mod health;
/// Staff invitation routes
pub mod invitations;
/// Shop management routes
pub mod shops;

pub use appointments::AppointmentRoutes;
pub use auth::AuthRoutes;
pub use catalog::CatalogRoutes;
pub use customers::CustomerRoutes;
pub use health::HealthRoutes;
pub use invitations::InvitationRoutes;
pub use shops::ShopRoutes;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::AuthResult;
use crate::context::ServerResources;
use crate::errors::{AppError, AppResult};
use crate::models::ShopMembership;

/// Build the complete application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(ShopRoutes::routes(Arc::clone(&resources)))
        .merge(InvitationRoutes::routes(Arc::clone(&resources)))
        .merge(CustomerRoutes::routes(Arc::clone(&resources)))
        .merge(CatalogRoutes::routes(Arc::clone(&resources)))
        .merge(AppointmentRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Extract and authenticate the user from the authorization header
pub(crate) fn authenticate(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<AuthResult> {
    let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
    resources.auth_manager.authenticate_header(auth_header)
}

/// Require an active membership of the given shop
pub(crate) async fn require_membership(
    resources: &ServerResources,
    shop_id: Uuid,
    user_id: Uuid,
) -> AppResult<ShopMembership> {
    let membership = resources
        .database
        .get_membership(shop_id, user_id)
        .await?
        .filter(|m| m.is_active)
        .ok_or_else(|| AppError::permission_denied("Not a member of this shop"))?;

    Ok(membership)
}

/// Require a role that may manage staff, invitations, and the catalog
pub(crate) async fn require_manager(
    resources: &ServerResources,
    shop_id: Uuid,
    user_id: Uuid,
) -> AppResult<ShopMembership> {
    let membership = require_membership(resources, shop_id, user_id).await?;

    if !membership.role.can_manage_shop() {
        return Err(AppError::permission_denied(
            "Owner or manager role required",
        ));
    }

    Ok(membership)
}
