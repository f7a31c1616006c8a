// ABOUTME: UUID parsing and validation utilities to eliminate duplication across the codebase
// ABOUTME: Provides safe UUID parsing with consistent error handling and format validation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Groomdesk.io

use crate::errors::{AppError, AppResult};
use uuid::Uuid;

/// Parse a UUID from a string with consistent error handling
///
/// # Errors
///
/// Returns an error if the string is not a valid UUID format
pub fn parse_uuid(uuid_str: &str) -> AppResult<Uuid> {
    Uuid::parse_str(uuid_str)
        .map_err(|_| AppError::invalid_input(format!("Invalid UUID format: '{uuid_str}'")))
}

/// Parse a UUID stored in a database column.
///
/// Ids are written by this crate, so a malformed value indicates a corrupted
/// row rather than bad input; the failure maps to an internal error.
///
/// # Errors
///
/// Returns an error if the stored value is not a valid UUID
pub fn parse_stored_uuid(uuid_str: &str) -> AppResult<Uuid> {
    Uuid::parse_str(uuid_str)
        .map_err(|_| AppError::internal(format!("Corrupted UUID in storage: '{uuid_str}'")))
}

/// Parse an optional UUID string
///
/// Returns None if the input is None, otherwise attempts to parse the UUID
///
/// # Errors
///
/// Returns an error if the string is Some but not a valid UUID
pub fn parse_optional_uuid(uuid_str: Option<&str>) -> AppResult<Option<Uuid>> {
    uuid_str.map(parse_uuid).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid_valid_and_invalid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid(&id.to_string()).unwrap(), id);
        assert!(parse_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_parse_optional_uuid() {
        assert_eq!(parse_optional_uuid(None).unwrap(), None);
        let id = Uuid::new_v4();
        assert_eq!(
            parse_optional_uuid(Some(id.to_string().as_str())).unwrap(),
            Some(id)
        );
        assert!(parse_optional_uuid(Some("bogus")).is_err());
    }
}
