// ABOUTME: Main library entry point for the Groomdesk scheduling platform
// ABOUTME: Provides the REST API for multi-tenant dog-grooming shop management
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

#![deny(unsafe_code)]

//! # Groomdesk Server
//!
//! A multi-tenant scheduling backend for dog-grooming shops. Shop owners
//! manage staff, customers (dogs and their owners), grooming-service
//! catalogs, and time-slotted appointments; staff join shops through
//! email-token invitations; revenue summaries are computed per shop per
//! period.
//!
//! ## Architecture
//!
//! - **Models**: Domain structures scoped to one shop per row
//! - **Database**: `SQLite` persistence with transactional multi-writes
//! - **Services**: Invitation lifecycle and grooming-line resolution
//! - **Routes**: Thin axum handlers translating typed failures to HTTP
//! - **Notifications**: Injected email gateway for invitation delivery
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use groomdesk_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Groomdesk configured: {}", config.summary());
//!     Ok(())
//! }
//! ```

/// Authentication and session management
pub mod auth;

/// Configuration management and persistence
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Shared dependency container for route handlers
pub mod context;

/// Cryptographic utilities for token generation
pub mod crypto;

/// Multi-tenant database management
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Structured logging configuration
pub mod logging;

/// Domain models
pub mod models;

/// Outbound email notifications
pub mod notifications;

/// HTTP route handlers
pub mod routes;

/// Domain service layer
pub mod services;

/// Shared utilities
pub mod utils;
