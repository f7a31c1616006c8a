// ABOUTME: Shared utility functions used across route and database modules
// ABOUTME: UUID parsing helpers with consistent error handling
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Groomdesk.io

//! Shared utilities for the Groomdesk server

/// UUID parsing and validation utilities
pub mod uuid;
