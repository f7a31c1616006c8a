// ABOUTME: Grooming service catalog route handlers
// ABOUTME: Shop-scoped catalog CRUD where delete means deactivate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

//! Grooming service catalog routes
//!
//! Catalog entries are never physically deleted; historical appointment
//! lines reference them, so DELETE flips the active flag off.

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::GroomingServiceType;
use crate::routes;
use crate::utils::uuid::parse_uuid;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Request body for creating a catalog entry
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    /// Service name, unique within the shop
    pub name: String,
    /// Customer-facing description
    pub description: Option<String>,
    /// Default price in minor currency units
    pub default_price: i64,
}

/// Request body for updating a catalog entry
#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New default price
    pub default_price: Option<i64>,
    /// Reactivate or deactivate
    pub is_active: Option<bool>,
}

/// Query parameters for the catalog listing
#[derive(Debug, Default, Deserialize)]
pub struct ListServicesQuery {
    /// Include deactivated entries
    #[serde(default)]
    pub include_inactive: bool,
}

/// Catalog routes implementation
pub struct CatalogRoutes;

impl CatalogRoutes {
    /// Create all catalog routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/shops/:shop_id/services", post(Self::handle_create))
            .route("/shops/:shop_id/services", get(Self::handle_list))
            .route("/services/:id", put(Self::handle_update))
            .route("/services/:id", delete(Self::handle_deactivate))
            .with_state(resources)
    }

    /// Handle catalog entry creation
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(shop_id): Path<String>,
        Json(request): Json<CreateServiceRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&shop_id)?;
        routes::require_manager(&resources, shop_id, auth.user_id).await?;

        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Service name cannot be empty"));
        }
        if request.default_price < 0 {
            return Err(AppError::invalid_input("Default price cannot be negative"));
        }
        if resources
            .database
            .find_service_type_by_name(shop_id, name)
            .await?
            .is_some()
        {
            return Err(AppError::new(
                crate::errors::ErrorCode::ResourceAlreadyExists,
                format!("A service named \"{name}\" already exists"),
            ));
        }

        let mut service =
            GroomingServiceType::new(shop_id, name.to_string(), request.default_price);
        service.description = request.description;
        resources.database.create_service_type(&service).await?;

        Ok((StatusCode::CREATED, Json(service)).into_response())
    }

    /// Handle listing a shop's catalog
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(shop_id): Path<String>,
        Query(query): Query<ListServicesQuery>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&shop_id)?;
        routes::require_membership(&resources, shop_id, auth.user_id).await?;

        let services = resources
            .database
            .list_service_types(shop_id, query.include_inactive)
            .await?;

        Ok((StatusCode::OK, Json(services)).into_response())
    }

    /// Handle updating a catalog entry
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateServiceRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let service_id = parse_uuid(&id)?;

        let mut service = resources
            .database
            .get_service_type(service_id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;
        routes::require_manager(&resources, service.shop_id, auth.user_id).await?;

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::invalid_input("Service name cannot be empty"));
            }
            service.name = name;
        }
        if let Some(description) = request.description {
            service.description = Some(description);
        }
        if let Some(price) = request.default_price {
            if price < 0 {
                return Err(AppError::invalid_input("Default price cannot be negative"));
            }
            service.default_price = price;
        }
        if let Some(is_active) = request.is_active {
            service.is_active = is_active;
        }

        resources.database.update_service_type(&service).await?;

        Ok((StatusCode::OK, Json(service)).into_response())
    }

    /// Handle logical deletion of a catalog entry
    async fn handle_deactivate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let service_id = parse_uuid(&id)?;

        let service = resources
            .database
            .get_service_type(service_id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;
        routes::require_manager(&resources, service.shop_id, auth.user_id).await?;

        resources.database.deactivate_service_type(service_id).await?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
