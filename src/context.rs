// ABOUTME: Shared dependency container handed to every route module
// ABOUTME: Bundles the database, auth manager, email gateway, and domain services behind Arcs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

//! Dependency injection context for route handlers.
//!
//! One `ServerResources` is built at startup and shared across all routers
//! as axum state. Domain services are constructed here once so every entry
//! point runs the same business rules.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::notifications::EmailGateway;
use crate::services::{GroomingResolver, InvitationService};

/// Shared resources for the HTTP server
pub struct ServerResources {
    /// Database manager
    pub database: Database,
    /// JWT authentication manager
    pub auth_manager: Arc<AuthManager>,
    /// Outbound email gateway
    pub email: Arc<dyn EmailGateway>,
    /// Invitation lifecycle service
    pub invitations: InvitationService,
    /// Grooming line validation and pricing service
    pub grooming: GroomingResolver,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(
        database: Database,
        auth_manager: AuthManager,
        email: Arc<dyn EmailGateway>,
        config: Arc<ServerConfig>,
    ) -> Self {
        let invitations = InvitationService::new(
            database.clone(),
            Arc::clone(&email),
            config.invite_base_url.clone(),
        );
        let grooming = GroomingResolver::new(database.clone());

        Self {
            database,
            auth_manager: Arc::new(auth_manager),
            email,
            invitations,
            grooming,
            config,
        }
    }
}
