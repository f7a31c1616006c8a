// ABOUTME: Shop management route handlers for multi-tenant operations
// ABOUTME: Shop creation with owner bootstrap, staff listing, and revenue summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

//! Shop management routes
//!
//! Creating a shop makes the creator its owner and points their primary
//! shop at it, all in one transaction. Revenue summaries are manager-only.

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::Shop;
use crate::routes;
use crate::utils::uuid::parse_uuid;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Reserved shop slugs that cannot be used for user-created shops
const RESERVED_SLUGS: &[&str] = &[
    "admin", "api", "www", "app", "auth", "login", "logout", "signup", "system", "root",
    "public", "static", "assets",
];

/// Maximum allowed length for shop slugs
const MAX_SLUG_LENGTH: usize = 63;

/// Request body for creating a shop
#[derive(Debug, Deserialize)]
pub struct CreateShopRequest {
    /// Shop display name
    pub name: String,
    /// URL-safe slug, unique across the system
    pub slug: String,
    /// Contact phone number
    pub phone: Option<String>,
    /// Street address
    pub address: Option<String>,
}

/// Request body for updating a shop
#[derive(Debug, Deserialize)]
pub struct UpdateShopRequest {
    /// New display name
    pub name: Option<String>,
    /// New phone number
    pub phone: Option<String>,
    /// New street address
    pub address: Option<String>,
}

/// Query parameters for the revenue summary endpoint
#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    /// Inclusive period start
    pub from: NaiveDate,
    /// Inclusive period end
    pub to: NaiveDate,
}

/// Shop routes implementation
pub struct ShopRoutes;

impl ShopRoutes {
    /// Create all shop management routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/shops", post(Self::handle_create))
            .route("/shops", get(Self::handle_list_mine))
            .route("/shops/:id", get(Self::handle_get))
            .route("/shops/:id", put(Self::handle_update))
            .route("/shops/:id/staff", get(Self::handle_list_staff))
            .route("/shops/:id/revenue", get(Self::handle_revenue))
            .with_state(resources)
    }

    /// Handle shop creation; the creator becomes the owner
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateShopRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;

        if request.name.trim().is_empty() {
            return Err(AppError::invalid_input("Shop name cannot be empty"));
        }
        validate_shop_slug(&request.slug)?;

        let shop = Shop::new(
            request.name.trim().to_string(),
            request.slug,
            request.phone,
            request.address,
            auth.user_id,
        );
        resources.database.create_shop_with_owner(&shop).await?;

        info!(shop_id = %shop.id, owner = %auth.user_id, "shop created");

        Ok((StatusCode::CREATED, Json(shop)).into_response())
    }

    /// Handle listing shops the authenticated user belongs to
    async fn handle_list_mine(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;

        let shops = resources.database.list_shops_for_user(auth.user_id).await?;

        Ok((StatusCode::OK, Json(shops)).into_response())
    }

    /// Handle fetching one shop
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&id)?;
        routes::require_membership(&resources, shop_id, auth.user_id).await?;

        let shop = resources
            .database
            .get_shop(shop_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shop"))?;

        Ok((StatusCode::OK, Json(shop)).into_response())
    }

    /// Handle updating a shop's editable fields
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateShopRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&id)?;
        routes::require_manager(&resources, shop_id, auth.user_id).await?;

        let mut shop = resources
            .database
            .get_shop(shop_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shop"))?;

        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(AppError::invalid_input("Shop name cannot be empty"));
            }
            shop.name = name.trim().to_string();
        }
        if let Some(phone) = request.phone {
            shop.phone = Some(phone);
        }
        if let Some(address) = request.address {
            shop.address = Some(address);
        }

        resources.database.update_shop(&shop).await?;

        Ok((StatusCode::OK, Json(shop)).into_response())
    }

    /// Handle listing a shop's active staff
    async fn handle_list_staff(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&id)?;
        routes::require_membership(&resources, shop_id, auth.user_id).await?;

        let members = resources.database.list_members(shop_id).await?;

        Ok((StatusCode::OK, Json(members)).into_response())
    }

    /// Handle the per-period revenue summary
    async fn handle_revenue(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Query(query): Query<RevenueQuery>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&id)?;
        routes::require_manager(&resources, shop_id, auth.user_id).await?;

        if query.from > query.to {
            return Err(AppError::invalid_input(
                "Period start must not be after period end",
            ));
        }

        let summary = resources
            .database
            .revenue_summary(shop_id, query.from, query.to)
            .await?;

        Ok((StatusCode::OK, Json(summary)).into_response())
    }
}

/// Validate a shop slug against naming rules
///
/// Slugs must be non-empty, 63 characters or fewer, contain only ASCII
/// alphanumerics and hyphens, not start or end with a hyphen, and not be a
/// reserved word.
///
/// # Errors
///
/// Returns an error describing which validation rule failed
fn validate_shop_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() {
        return Err(AppError::invalid_input("Shop slug cannot be empty"));
    }

    if slug.len() > MAX_SLUG_LENGTH {
        return Err(AppError::invalid_input(
            "Shop slug must be 63 characters or less",
        ));
    }

    if !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(AppError::invalid_input(
            "Shop slug can only contain letters, numbers, and hyphens",
        ));
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(AppError::invalid_input(
            "Shop slug cannot start or end with a hyphen",
        ));
    }

    if RESERVED_SLUGS.contains(&slug) {
        return Err(AppError::invalid_input(format!(
            "Shop slug '{slug}' is reserved and cannot be used",
        )));
    }

    Ok(())
}
