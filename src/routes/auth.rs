// ABOUTME: Authentication route handlers for registration, login, and refresh rotation
// ABOUTME: Issues HS256 access tokens and rotates opaque refresh tokens on every use
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

//! Authentication routes
//!
//! Registration and login are email + password; sessions are a short-lived
//! access token plus a rotating refresh token stored as a digest.

use crate::constants::limits::MIN_PASSWORD_LENGTH;
use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::User;
use crate::{auth, routes};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Registration request payload
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Login email
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Optional display name
    pub display_name: Option<String>,
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// New user id
    pub user_id: String,
    /// Normalized login email
    pub email: String,
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// Login response with both tokens
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer access token
    pub access_token: String,
    /// Opaque refresh token, shown once
    pub refresh_token: String,
    /// Access token validity in seconds
    pub expires_in: i64,
    /// Authenticated user summary
    pub user: UserSummary,
}

/// User profile summary returned by auth endpoints
#[derive(Debug, Serialize)]
pub struct UserSummary {
    /// User id
    pub id: String,
    /// Login email
    pub email: String,
    /// Display name
    pub display_name: Option<String>,
    /// Primary shop pointer
    pub primary_shop_id: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            primary_shop_id: user.primary_shop_id.map(|id| id.to_string()),
        }
    }
}

/// Refresh request payload
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    /// Previously issued refresh token
    pub refresh_token: String,
}

/// Authentication routes implementation
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/register", post(Self::handle_register))
            .route("/auth/login", post(Self::handle_login))
            .route("/auth/refresh", post(Self::handle_refresh))
            .route("/auth/me", get(Self::handle_me))
            .with_state(resources)
    }

    /// Handle user registration
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let email = request.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::invalid_input("Invalid email address"));
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let password_hash = auth::hash_password(&request.password)?;
        let user = User::new(email, password_hash, request.display_name);
        resources.database.create_user(&user).await?;

        info!(user_id = %user.id, "user registered");

        Ok((
            StatusCode::CREATED,
            Json(RegisterResponse {
                user_id: user.id.to_string(),
                email: user.email,
            }),
        )
            .into_response())
    }

    /// Handle login: verify credentials, issue access and refresh tokens
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let user = resources
            .database
            .get_user_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        if !user.is_active {
            return Err(AppError::auth_invalid("Account is deactivated"));
        }

        if !auth::verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        let access_token = resources.auth_manager.generate_token(&user)?;
        let refresh = resources.auth_manager.issue_refresh_token()?;
        resources
            .database
            .insert_refresh_token(user.id, &refresh.digest, refresh.expires_at)
            .await?;
        resources.database.touch_last_active(user.id).await?;

        info!(user_id = %user.id, "user logged in");

        Ok((
            StatusCode::OK,
            Json(LoginResponse {
                access_token,
                refresh_token: refresh.token,
                expires_in: resources.auth_manager.expires_in_secs(),
                user: UserSummary::from(&user),
            }),
        )
            .into_response())
    }

    /// Handle token refresh with rotation: the presented refresh token is
    /// revoked and a replacement issued
    async fn handle_refresh(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RefreshTokenRequest>,
    ) -> Result<Response, AppError> {
        let (user_id, replacement) = resources
            .auth_manager
            .rotate_refresh_token(&resources.database, &request.refresh_token)
            .await?;

        let user = resources
            .database
            .get_user(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::auth_invalid("Account is deactivated"))?;

        let access_token = resources.auth_manager.generate_token(&user)?;

        Ok((
            StatusCode::OK,
            Json(LoginResponse {
                access_token,
                refresh_token: replacement.token,
                expires_in: resources.auth_manager.expires_in_secs(),
                user: UserSummary::from(&user),
            }),
        )
            .into_response())
    }

    /// Return the authenticated user's profile
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;

        let user = resources
            .database
            .get_user(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        Ok((StatusCode::OK, Json(UserSummary::from(&user))).into_response())
    }
}
