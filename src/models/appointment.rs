// ABOUTME: Appointment scheduling model with status lifecycle and priced service lines
// ABOUTME: Appointment, AppointmentStatus, NewAppointment, and AppointmentServiceLine definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Lifecycle state of an appointment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked, not yet started
    Scheduled,
    /// Grooming in progress
    InProgress,
    /// Grooming finished, payment outstanding
    Completed,
    /// Cancelled before completion; excluded from revenue
    Cancelled,
    /// Completed and paid
    Settled,
}

impl AppointmentStatus {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Settled => "settled",
        }
    }

    /// Whether a transition from this state to `next` is allowed.
    ///
    /// Cancellation is possible until the appointment completes; settled and
    /// cancelled are terminal.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::InProgress | Self::Cancelled)
                | (Self::InProgress, Self::Completed | Self::Cancelled)
                | (Self::Completed, Self::Settled)
        )
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "settled" => Ok(Self::Settled),
            _ => Err(AppError::invalid_input(format!(
                "Invalid appointment status: {s}"
            ))),
        }
    }
}

/// A time-slotted grooming appointment for one dog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique appointment identifier
    pub id: Uuid,
    /// Shop this appointment belongs to
    pub shop_id: Uuid,
    /// Dog being groomed
    pub dog_id: Uuid,
    /// User who booked the appointment
    pub created_by: Uuid,
    /// Groomer assigned to the slot, if any
    pub assigned_to: Option<Uuid>,
    /// Calendar date of the slot
    pub scheduled_date: NaiveDate,
    /// Slot start time of day
    pub start_time: NaiveTime,
    /// Slot end time of day, if booked with a fixed duration
    pub end_time: Option<NaiveTime>,
    /// Legacy free-text service label. Read responses prefer the label
    /// synthesized from attached service lines; this field is kept for
    /// entries booked before the structured catalog existed.
    pub grooming_label: Option<String>,
    /// Free-form staff notes
    pub memo: Option<String>,
    /// Total charged amount in minor currency units
    pub total_amount: i64,
    /// Current lifecycle state
    pub status: AppointmentStatus,
    /// When the appointment was created
    pub created_at: DateTime<Utc>,
    /// When the appointment was last updated
    pub updated_at: DateTime<Utc>,
}

/// Parameters for booking a new appointment
pub struct NewAppointment {
    /// Shop the appointment belongs to
    pub shop_id: Uuid,
    /// Dog being groomed
    pub dog_id: Uuid,
    /// User booking the appointment
    pub created_by: Uuid,
    /// Groomer assigned to the slot, if any
    pub assigned_to: Option<Uuid>,
    /// Calendar date of the slot
    pub scheduled_date: NaiveDate,
    /// Slot start time of day
    pub start_time: NaiveTime,
    /// Slot end time of day, if any
    pub end_time: Option<NaiveTime>,
    /// Legacy free-text service label
    pub grooming_label: Option<String>,
    /// Free-form staff notes
    pub memo: Option<String>,
    /// Total charged amount in minor currency units
    pub total_amount: i64,
}

impl Appointment {
    /// Creates a scheduled appointment from booking parameters
    #[must_use]
    pub fn new(params: NewAppointment) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            shop_id: params.shop_id,
            dog_id: params.dog_id,
            created_by: params.created_by,
            assigned_to: params.assigned_to,
            scheduled_date: params.scheduled_date,
            start_time: params.start_time,
            end_time: params.end_time,
            grooming_label: params.grooming_label,
            memo: params.memo,
            total_amount: params.total_amount,
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A join record attaching one catalog service to one appointment with the
/// price captured at booking time, decoupled from the catalog's current
/// default price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentServiceLine {
    /// Unique line identifier
    pub id: Uuid,
    /// Appointment this line belongs to
    pub appointment_id: Uuid,
    /// Referenced catalog entry
    pub grooming_type_id: Uuid,
    /// Price actually charged for this line
    pub applied_price: i64,
    /// When the line was attached
    pub created_at: DateTime<Utc>,
}
