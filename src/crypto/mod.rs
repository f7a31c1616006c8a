// ABOUTME: Cryptography module providing secure random token generation and digests
// ABOUTME: Centralizes all cryptographic operations for the Groomdesk server
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Groomdesk.io

//! Cryptographic utilities for the Groomdesk server.
//!
//! All opaque security tokens (invitation tokens, refresh tokens) are produced
//! here so entropy and encoding stay uniform across the crate.

pub mod tokens;

pub use tokens::{generate_security_token, sha256_hex};
