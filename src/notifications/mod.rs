// ABOUTME: Outbound notification module for transactional email delivery
// ABOUTME: Defines the EmailGateway boundary and its HTTP provider and development implementations
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Groomdesk.io

//! Outbound notifications for the Groomdesk server.
//!
//! Email delivery is best-effort and synchronous from the caller's
//! perspective: there is no queue and no retry. Callers decide what a failed
//! send means for their own state (invitation creation rolls back, resend
//! does not).

/// Transactional email gateway trait and implementations
pub mod email;

pub use email::{EmailGateway, EmailMessage, EmailReceipt, HttpEmailGateway, LogOnlyEmailGateway};
