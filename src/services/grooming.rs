// ABOUTME: Grooming service-line validation and pricing resolution for appointments
// ABOUTME: Shop-scoped validation, applied-price resolution, replace semantics, and legacy label absorption
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::constants::limits::MAX_SERVICE_LINES_PER_APPOINTMENT;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{AppointmentServiceLine, GroomingServiceType};

/// One requested service line as it arrives from the client
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceLineRequest {
    /// Referenced catalog entry
    pub grooming_type_id: Uuid,
    /// Price override. Absent means "use the catalog default"; an explicit
    /// zero is honored as zero.
    pub applied_price: Option<i64>,
}

/// A service line that passed validation, with its price resolved
#[derive(Debug, Clone)]
pub struct ValidatedServiceLine {
    /// Referenced catalog entry
    pub grooming_type_id: Uuid,
    /// Catalog name, used in read responses and error messages
    pub name: String,
    /// Resolved price for this line
    pub applied_price: i64,
}

impl ValidatedServiceLine {
    /// Materialize a join row for the given appointment
    #[must_use]
    pub fn into_line(self, appointment_id: Uuid) -> AppointmentServiceLine {
        AppointmentServiceLine {
            id: Uuid::new_v4(),
            appointment_id,
            grooming_type_id: self.grooming_type_id,
            applied_price: self.applied_price,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Owns validation and pricing resolution when an appointment is associated
/// with a set of grooming-service line items.
pub struct GroomingResolver {
    database: Database,
}

impl GroomingResolver {
    /// Create the resolver over the given database
    #[must_use]
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Validate a requested line set against a shop's catalog and resolve
    /// each line's applied price.
    ///
    /// The whole set is validated before any caller performs a write: a
    /// single invalid line aborts the operation, so callers never end up
    /// with partial line sets.
    ///
    /// Price resolution per line: explicit value if supplied (explicit zero
    /// included), otherwise the catalog's current default price.
    ///
    /// # Errors
    ///
    /// - `UnknownServiceType` if a referenced id does not exist or belongs
    ///   to a different shop (cross-tenant references are rejected, never
    ///   silently ignored)
    /// - `InactiveServiceType` naming the offending service if its active
    ///   flag is off
    pub async fn validate_service_lines(
        &self,
        shop_id: Uuid,
        lines: &[ServiceLineRequest],
    ) -> AppResult<Vec<ValidatedServiceLine>> {
        if lines.len() > MAX_SERVICE_LINES_PER_APPOINTMENT {
            return Err(AppError::invalid_input(format!(
                "At most {MAX_SERVICE_LINES_PER_APPOINTMENT} service lines per appointment"
            )));
        }

        let mut validated = Vec::with_capacity(lines.len());

        for line in lines {
            let service = self
                .database
                .get_service_type(line.grooming_type_id)
                .await?
                .filter(|s| s.shop_id == shop_id)
                .ok_or_else(|| AppError::unknown_service_type(line.grooming_type_id))?;

            if !service.is_active {
                return Err(AppError::inactive_service_type(service.name));
            }

            validated.push(ValidatedServiceLine {
                grooming_type_id: service.id,
                applied_price: line.applied_price.unwrap_or(service.default_price),
                name: service.name,
            });
        }

        Ok(validated)
    }

    /// Attach validated lines to a freshly created appointment. Additive
    /// only; the create path never has pre-existing lines to replace.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointment does not exist or the insert fails
    pub async fn attach_to_appointment(
        &self,
        appointment_id: Uuid,
        validated: Vec<ValidatedServiceLine>,
    ) -> AppResult<()> {
        self.database
            .get_appointment(appointment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Appointment"))?;

        let lines: Vec<AppointmentServiceLine> = validated
            .into_iter()
            .map(|v| v.into_line(appointment_id))
            .collect();

        self.database.attach_service_lines(&lines).await
    }

    /// Replace an appointment's lines with a newly validated set.
    ///
    /// Full replace, not a diff: a line missing from the input disappears
    /// from the appointment, and each kept line's price comes from the new
    /// request rather than being carried over. Delete and re-insert happen
    /// in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointment does not exist or the writes fail
    pub async fn replace_appointment_lines(
        &self,
        appointment_id: Uuid,
        validated: Vec<ValidatedServiceLine>,
    ) -> AppResult<()> {
        self.database
            .get_appointment(appointment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Appointment"))?;

        let lines: Vec<AppointmentServiceLine> = validated
            .into_iter()
            .map(|v| v.into_line(appointment_id))
            .collect();

        self.database
            .replace_service_lines(appointment_id, &lines)
            .await?;

        info!(
            appointment_id = %appointment_id,
            lines = lines.len(),
            "appointment service lines replaced"
        );
        Ok(())
    }

    /// Absorb a legacy free-text label into the structured catalog.
    ///
    /// A non-blank label find-or-creates a catalog entry by (shop, name).
    /// This does not attach a service line; the legacy label and the
    /// structured lines are independent mechanisms that may coexist on the
    /// same appointment.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or insert fails
    pub async fn absorb_legacy_label(
        &self,
        shop_id: Uuid,
        label: &str,
    ) -> AppResult<Option<Uuid>> {
        let name = label.trim();
        if name.is_empty() {
            return Ok(None);
        }

        if let Some(existing) = self.database.find_service_type_by_name(shop_id, name).await? {
            return Ok(Some(existing.id));
        }

        let service = GroomingServiceType::new(shop_id, name.to_string(), 0);
        self.database.create_service_type(&service).await?;
        info!(
            shop_id = %shop_id,
            service_id = %service.id,
            name = %name,
            "legacy grooming label absorbed into catalog"
        );

        Ok(Some(service.id))
    }

    /// Synthesize the display label for an appointment from its attached
    /// lines. Derived on every read, never persisted. Returns `None` when
    /// no lines are attached so callers can fall back to the stored legacy
    /// label.
    #[must_use]
    pub fn display_label(line_names: &[String]) -> Option<String> {
        if line_names.is_empty() {
            None
        } else {
            Some(line_names.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_joins_names() {
        let names = vec!["Bath".to_string(), "Cut".to_string()];
        assert_eq!(
            GroomingResolver::display_label(&names),
            Some("Bath, Cut".to_string())
        );
        assert_eq!(GroomingResolver::display_label(&[]), None);
    }
}
