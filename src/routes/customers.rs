// ABOUTME: Customer route handlers for pet owners and their dogs
// ABOUTME: Shop-scoped CRUD plus per-dog appointment history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

//! Customer routes
//!
//! Pet owners and dogs are shop-scoped records; every handler checks that
//! the authenticated user is an active member of the owning shop.

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::{Dog, PetOwner};
use crate::routes;
use crate::utils::uuid::parse_uuid;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

/// Request body for creating or updating a pet owner
#[derive(Debug, Deserialize)]
pub struct PetOwnerRequest {
    /// Owner name
    pub name: String,
    /// Contact phone number
    pub phone: String,
    /// Contact email
    pub email: Option<String>,
    /// Staff notes
    pub memo: Option<String>,
}

/// Request body for creating or updating a dog
#[derive(Debug, Deserialize)]
pub struct DogRequest {
    /// Dog name
    pub name: String,
    /// Breed, if known
    pub breed: Option<String>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Birth date
    pub birth_date: Option<NaiveDate>,
    /// Grooming notes
    pub memo: Option<String>,
}

/// Customer routes implementation
pub struct CustomerRoutes;

impl CustomerRoutes {
    /// Create all customer routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/shops/:shop_id/owners", post(Self::handle_create_owner))
            .route("/shops/:shop_id/owners", get(Self::handle_list_owners))
            .route("/owners/:id", get(Self::handle_get_owner))
            .route("/owners/:id", put(Self::handle_update_owner))
            .route("/owners/:owner_id/dogs", post(Self::handle_create_dog))
            .route("/owners/:owner_id/dogs", get(Self::handle_list_dogs))
            .route("/dogs/:id", get(Self::handle_get_dog))
            .route("/dogs/:id", put(Self::handle_update_dog))
            .route("/dogs/:id/appointments", get(Self::handle_dog_history))
            .with_state(resources)
    }

    /// Handle pet owner creation
    async fn handle_create_owner(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(shop_id): Path<String>,
        Json(request): Json<PetOwnerRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&shop_id)?;
        routes::require_membership(&resources, shop_id, auth.user_id).await?;

        if request.name.trim().is_empty() {
            return Err(AppError::invalid_input("Owner name cannot be empty"));
        }

        let mut owner = PetOwner::new(
            shop_id,
            request.name.trim().to_string(),
            request.phone,
            request.email,
        );
        owner.memo = request.memo;
        resources.database.create_pet_owner(&owner).await?;

        Ok((StatusCode::CREATED, Json(owner)).into_response())
    }

    /// Handle listing a shop's pet owners
    async fn handle_list_owners(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(shop_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&shop_id)?;
        routes::require_membership(&resources, shop_id, auth.user_id).await?;

        let owners = resources.database.list_pet_owners(shop_id).await?;

        Ok((StatusCode::OK, Json(owners)).into_response())
    }

    /// Handle fetching one pet owner
    async fn handle_get_owner(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let owner = Self::owner_for_member(&resources, &id, auth.user_id).await?;

        Ok((StatusCode::OK, Json(owner)).into_response())
    }

    /// Handle updating a pet owner
    async fn handle_update_owner(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<PetOwnerRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let mut owner = Self::owner_for_member(&resources, &id, auth.user_id).await?;

        if request.name.trim().is_empty() {
            return Err(AppError::invalid_input("Owner name cannot be empty"));
        }

        owner.name = request.name.trim().to_string();
        owner.phone = request.phone;
        owner.email = request.email;
        owner.memo = request.memo;
        resources.database.update_pet_owner(&owner).await?;

        Ok((StatusCode::OK, Json(owner)).into_response())
    }

    /// Handle dog creation under an owner
    async fn handle_create_dog(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(owner_id): Path<String>,
        Json(request): Json<DogRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let owner = Self::owner_for_member(&resources, &owner_id, auth.user_id).await?;

        if request.name.trim().is_empty() {
            return Err(AppError::invalid_input("Dog name cannot be empty"));
        }

        let mut dog = Dog::new(owner.shop_id, owner.id, request.name.trim().to_string());
        dog.breed = request.breed;
        dog.weight_kg = request.weight_kg;
        dog.birth_date = request.birth_date;
        dog.memo = request.memo;
        resources.database.create_dog(&dog).await?;

        Ok((StatusCode::CREATED, Json(dog)).into_response())
    }

    /// Handle listing an owner's dogs
    async fn handle_list_dogs(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(owner_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let owner = Self::owner_for_member(&resources, &owner_id, auth.user_id).await?;

        let dogs = resources.database.list_dogs_for_owner(owner.id).await?;

        Ok((StatusCode::OK, Json(dogs)).into_response())
    }

    /// Handle fetching one dog
    async fn handle_get_dog(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let dog = Self::dog_for_member(&resources, &id, auth.user_id).await?;

        Ok((StatusCode::OK, Json(dog)).into_response())
    }

    /// Handle updating a dog
    async fn handle_update_dog(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<DogRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let mut dog = Self::dog_for_member(&resources, &id, auth.user_id).await?;

        if request.name.trim().is_empty() {
            return Err(AppError::invalid_input("Dog name cannot be empty"));
        }

        dog.name = request.name.trim().to_string();
        dog.breed = request.breed;
        dog.weight_kg = request.weight_kg;
        dog.birth_date = request.birth_date;
        dog.memo = request.memo;
        resources.database.update_dog(&dog).await?;

        Ok((StatusCode::OK, Json(dog)).into_response())
    }

    /// Handle a dog's appointment history
    async fn handle_dog_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let dog = Self::dog_for_member(&resources, &id, auth.user_id).await?;

        let history = resources.database.list_appointments_for_dog(dog.id).await?;

        Ok((StatusCode::OK, Json(history)).into_response())
    }

    /// Fetch an owner and verify the caller's membership of its shop
    async fn owner_for_member(
        resources: &ServerResources,
        owner_id: &str,
        user_id: uuid::Uuid,
    ) -> Result<PetOwner, AppError> {
        let owner = resources
            .database
            .get_pet_owner(parse_uuid(owner_id)?)
            .await?
            .ok_or_else(|| AppError::not_found("Owner"))?;
        routes::require_membership(resources, owner.shop_id, user_id).await?;
        Ok(owner)
    }

    /// Fetch a dog and verify the caller's membership of its shop
    async fn dog_for_member(
        resources: &ServerResources,
        dog_id: &str,
        user_id: uuid::Uuid,
    ) -> Result<Dog, AppError> {
        let dog = resources
            .database
            .get_dog(parse_uuid(dog_id)?)
            .await?
            .ok_or_else(|| AppError::not_found("Dog"))?;
        routes::require_membership(resources, dog.shop_id, user_id).await?;
        Ok(dog)
    }
}
