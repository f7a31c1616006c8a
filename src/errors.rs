// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Unified Error Handling System
//!
//! This module provides a centralized error handling system for the Groomdesk server.
//! It defines standard error types, error codes, and HTTP response formatting to ensure
//! consistent error handling across all modules and APIs.
//!
//! Business-rule outcomes (duplicate invitation, expired token, inactive service type)
//! are typed failures translated to 4xx responses. Only unexpected infrastructure
//! failures surface as opaque 5xx errors. Nothing in this crate retries automatically.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired = 1002,
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1003,

    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "RESOURCE_ALREADY_EXISTS")]
    ResourceAlreadyExists = 4001,

    // Invitation lifecycle (5000-5999)
    #[serde(rename = "ALREADY_MEMBER")]
    AlreadyMember = 5000,
    #[serde(rename = "DUPLICATE_PENDING_INVITATION")]
    DuplicatePendingInvitation = 5001,
    #[serde(rename = "INVITATION_EXPIRED")]
    InvitationExpired = 5002,
    #[serde(rename = "INVITATION_ALREADY_PROCESSED")]
    InvitationAlreadyProcessed = 5003,
    #[serde(rename = "EMAIL_MISMATCH")]
    EmailMismatch = 5004,
    #[serde(rename = "INVALID_STATE")]
    InvalidState = 5005,

    // Service catalog (6000-6999)
    #[serde(rename = "UNKNOWN_SERVICE_TYPE")]
    UnknownServiceType = 6000,
    #[serde(rename = "INACTIVE_SERVICE_TYPE")]
    InactiveServiceType = 6001,

    // External Services (7000-7999)
    #[serde(rename = "EMAIL_DELIVERY_FAILED")]
    EmailDeliveryFailed = 7000,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::UnknownServiceType
            | Self::InactiveServiceType => 400,

            // 401 Unauthorized
            Self::AuthRequired | Self::AuthInvalid => 401,

            // 403 Forbidden
            Self::AuthExpired | Self::PermissionDenied | Self::EmailMismatch => 403,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 409 Conflict
            Self::ResourceAlreadyExists
            | Self::AlreadyMember
            | Self::DuplicatePendingInvitation
            | Self::InvitationAlreadyProcessed
            | Self::InvalidState => 409,

            // 410 Gone
            Self::InvitationExpired => 410,

            // 502 Bad Gateway
            Self::EmailDeliveryFailed => 502,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::AuthExpired => "The authentication token has expired",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceAlreadyExists => "A resource with this identifier already exists",
            Self::AlreadyMember => "The user is already an employee of this shop",
            Self::DuplicatePendingInvitation => {
                "A pending invitation already exists for this email"
            }
            Self::InvitationExpired => "The invitation has expired",
            Self::InvitationAlreadyProcessed => "The invitation has already been processed",
            Self::EmailMismatch => "The invitation was issued for a different email address",
            Self::InvalidState => "The requested transition is not valid from the current state",
            Self::UnknownServiceType => "The referenced grooming service does not exist",
            Self::InactiveServiceType => "The referenced grooming service is no longer offered",
            Self::EmailDeliveryFailed => "The invitation email could not be delivered",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// User ID if available
    pub user_id: Option<Uuid>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            request_id: None,
            user_id: None,
            resource_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a request ID to the error context
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.context.request_id = Some(request_id.into());
        self
    }

    /// Add a user ID to the error context
    #[must_use]
    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.context.user_id = Some(user_id);
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorResponseDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                request_id: error.context.request_id,
                details: error.context.details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code = ?self.code, message = %self.message, "request failed");
        }
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Authentication required
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authentication expired
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, "Authentication token has expired")
    }

    /// Permission denied
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Actor is already an active employee of the target shop
    pub fn already_member(shop_id: Uuid) -> Self {
        Self::new(
            ErrorCode::AlreadyMember,
            "User is already an employee of this shop",
        )
        .with_resource_id(shop_id.to_string())
    }

    /// A pending invitation already exists for this (shop, email) pair
    pub fn duplicate_pending_invitation(email: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::DuplicatePendingInvitation,
            format!("A pending invitation already exists for {}", email.into()),
        )
    }

    /// Invitation expiry has passed
    pub fn invitation_expired() -> Self {
        Self::new(ErrorCode::InvitationExpired, "Invitation has expired")
    }

    /// Invitation is in a terminal state; the message names which one
    pub fn invitation_already_processed(status: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvitationAlreadyProcessed,
            format!("Invitation has already been {status}"),
        )
    }

    /// Authenticated user's email does not match the invitee email
    pub fn email_mismatch() -> Self {
        Self::new(
            ErrorCode::EmailMismatch,
            "This invitation was issued for a different email address",
        )
    }

    /// Requested lifecycle transition is not allowed from the current state
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidState, message)
    }

    /// Referenced grooming service type does not exist for this shop
    pub fn unknown_service_type(reference: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::UnknownServiceType,
            format!("Unknown grooming service: {reference}"),
        )
    }

    /// Referenced grooming service type is deactivated; names the offender
    pub fn inactive_service_type(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            ErrorCode::InactiveServiceType,
            format!("Grooming service \"{name}\" is no longer offered"),
        )
        .with_details(serde_json::json!({ "service_name": name }))
    }

    /// Outbound email send failed
    pub fn email_delivery_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EmailDeliveryFailed, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

/// Conversion from anyhow::Error to `AppError`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.source() {
            Some(source) => Self::new(ErrorCode::InternalError, error.to_string()).with_details(
                serde_json::json!({
                    "source": source.to_string()
                }),
            ),
            None => Self::new(ErrorCode::InternalError, error.to_string()),
        }
    }
}

/// Conversion from sqlx::Error to `AppError`
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => Self::not_found("Record"),
            _ => Self::database(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), 401);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::AlreadyMember.http_status(), 409);
        assert_eq!(ErrorCode::InvitationExpired.http_status(), 410);
        assert_eq!(ErrorCode::EmailDeliveryFailed.http_status(), 502);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_app_error_creation() {
        let error = AppError::already_member(Uuid::new_v4()).with_request_id("req-123");

        assert_eq!(error.code, ErrorCode::AlreadyMember);
        assert!(error.context.request_id.is_some());
        assert!(error.context.resource_id.is_some());
    }

    #[test]
    fn test_inactive_service_type_names_offender() {
        let error = AppError::inactive_service_type("Trim");
        assert!(error.message.contains("Trim"));
        assert_eq!(error.context.details["service_name"], "Trim");
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::duplicate_pending_invitation("groomer@example.com");
        let response = ErrorResponse::from(error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("DUPLICATE_PENDING_INVITATION"));
        assert!(json.contains("groomer@example.com"));
    }
}
