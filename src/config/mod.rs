// ABOUTME: Configuration module for deployment-specific settings
// ABOUTME: Environment-driven server configuration with typed sub-configs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Groomdesk.io

//! Configuration management for the Groomdesk server

/// Environment-based configuration management
pub mod environment;

pub use environment::{
    AuthConfig, DatabaseUrl, EmailConfig, Environment, ServerConfig,
};
