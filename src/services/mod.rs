// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Provides protocol-agnostic invitation lifecycle and grooming-line resolution services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

//! Domain service layer
//!
//! This module contains business logic extracted from route handlers so the
//! rules stay consistent regardless of the entry point. Services validate
//! against the database, derive resulting state, perform writes, and return
//! typed failures for the controller layer to translate into HTTP responses.

/// Grooming service-line validation and pricing resolution
pub mod grooming;

/// Staff invitation lifecycle: create, view, accept, cancel, resend
pub mod invitations;

pub use grooming::{GroomingResolver, ServiceLineRequest, ValidatedServiceLine};
pub use invitations::{
    AcceptedMembership, InvitationService, InvitationSummary, InvitationView,
};
