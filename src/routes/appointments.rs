// ABOUTME: Appointment route handlers wrapping the grooming resolver for line validation
// ABOUTME: Booking, updates with full line replacement, status transitions, and range listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

//! Appointment routes
//!
//! Create and update accept an optional `grooming_types` array of structured
//! line items alongside the legacy free-text `grooming_type` field. Lines
//! are validated in full before any write; updates that supply a line set
//! replace the existing set, and updates that omit it leave lines untouched.
//! Read responses synthesize the display label from attached lines, falling
//! back to the stored legacy label.

use crate::context::ServerResources;
use crate::database::ServiceLineDetail;
use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus, NewAppointment};
use crate::routes;
use crate::services::{GroomingResolver, ServiceLineRequest};
use crate::utils::uuid::parse_uuid;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Request body for booking an appointment
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    /// Dog being groomed
    pub dog_id: String,
    /// Groomer assigned to the slot
    pub assigned_to: Option<String>,
    /// Calendar date of the slot
    pub scheduled_date: NaiveDate,
    /// Slot start time of day
    pub start_time: NaiveTime,
    /// Slot end time of day
    pub end_time: Option<NaiveTime>,
    /// Legacy free-text service label
    pub grooming_type: Option<String>,
    /// Free-form staff notes
    pub memo: Option<String>,
    /// Explicit total; defaults to the sum of line prices
    pub total_amount: Option<i64>,
    /// Structured service line items
    pub grooming_types: Option<Vec<ServiceLineRequest>>,
}

/// Request body for updating an appointment.
///
/// `grooming_types: None` leaves the existing line set untouched; supplying
/// it (even empty) replaces the set wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentRequest {
    /// New dog reference
    pub dog_id: Option<String>,
    /// New assigned groomer
    pub assigned_to: Option<String>,
    /// New slot date
    pub scheduled_date: Option<NaiveDate>,
    /// New start time
    pub start_time: Option<NaiveTime>,
    /// New end time
    pub end_time: Option<NaiveTime>,
    /// Legacy free-text service label
    pub grooming_type: Option<String>,
    /// New staff notes
    pub memo: Option<String>,
    /// Explicit total; when lines are supplied without a total, the total
    /// is recomputed from the new line prices
    pub total_amount: Option<i64>,
    /// Replacement service line items
    pub grooming_types: Option<Vec<ServiceLineRequest>>,
}

/// Request body for a status transition
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// Target status
    pub status: AppointmentStatus,
}

/// Query parameters for the schedule listing
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    /// Inclusive range start
    pub from: NaiveDate,
    /// Inclusive range end
    pub to: NaiveDate,
}

/// Read representation: the appointment plus its lines and the synthesized
/// display label
#[derive(Debug, Serialize)]
pub struct AppointmentDetail {
    /// The appointment row
    #[serde(flatten)]
    pub appointment: Appointment,
    /// Display label synthesized from attached lines, falling back to the
    /// stored legacy label. Never persisted; computed fresh on every read.
    pub grooming_type: Option<String>,
    /// Attached service lines with catalog names
    pub service_lines: Vec<ServiceLineDetail>,
}

/// Appointment routes implementation
pub struct AppointmentRoutes;

impl AppointmentRoutes {
    /// Create all appointment routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/shops/:shop_id/appointments",
                post(Self::handle_create),
            )
            .route("/shops/:shop_id/appointments", get(Self::handle_list))
            .route("/appointments/:id", get(Self::handle_get))
            .route("/appointments/:id", put(Self::handle_update))
            .route("/appointments/:id/status", post(Self::handle_status))
            .with_state(resources)
    }

    /// Handle booking a new appointment
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(shop_id): Path<String>,
        Json(request): Json<CreateAppointmentRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&shop_id)?;
        routes::require_membership(&resources, shop_id, auth.user_id).await?;

        let dog = resources
            .database
            .get_dog(parse_uuid(&request.dog_id)?)
            .await?
            .filter(|d| d.shop_id == shop_id)
            .ok_or_else(|| AppError::not_found("Dog"))?;

        let assigned_to = match request.assigned_to.as_deref() {
            Some(raw) => {
                let groomer_id = parse_uuid(raw)?;
                routes::require_membership(&resources, shop_id, groomer_id).await?;
                Some(groomer_id)
            }
            None => None,
        };

        // Validation runs over the entire requested set before any write.
        let validated = match &request.grooming_types {
            Some(lines) => {
                resources
                    .grooming
                    .validate_service_lines(shop_id, lines)
                    .await?
            }
            None => Vec::new(),
        };

        if let Some(label) = request.grooming_type.as_deref() {
            resources.grooming.absorb_legacy_label(shop_id, label).await?;
        }

        let line_total: i64 = validated.iter().map(|l| l.applied_price).sum();
        let total_amount = request.total_amount.unwrap_or(line_total);

        let appointment = Appointment::new(NewAppointment {
            shop_id,
            dog_id: dog.id,
            created_by: auth.user_id,
            assigned_to,
            scheduled_date: request.scheduled_date,
            start_time: request.start_time,
            end_time: request.end_time,
            grooming_label: request.grooming_type,
            memo: request.memo,
            total_amount,
        });

        let lines: Vec<_> = validated
            .into_iter()
            .map(|v| v.into_line(appointment.id))
            .collect();
        resources
            .database
            .create_appointment_with_lines(&appointment, &lines)
            .await?;

        info!(
            appointment_id = %appointment.id,
            shop_id = %shop_id,
            lines = lines.len(),
            "appointment booked"
        );

        let detail = Self::detail(&resources, appointment).await?;
        Ok((StatusCode::CREATED, Json(detail)).into_response())
    }

    /// Handle a shop's schedule listing over a date range
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(shop_id): Path<String>,
        Query(query): Query<ScheduleQuery>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let shop_id = parse_uuid(&shop_id)?;
        routes::require_membership(&resources, shop_id, auth.user_id).await?;

        if query.from > query.to {
            return Err(AppError::invalid_input(
                "Range start must not be after range end",
            ));
        }

        let appointments = resources
            .database
            .list_appointments(shop_id, query.from, query.to)
            .await?;

        let mut details = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            details.push(Self::detail(&resources, appointment).await?);
        }

        Ok((StatusCode::OK, Json(details)).into_response())
    }

    /// Handle fetching one appointment
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let appointment = Self::appointment_for_member(&resources, &id, auth.user_id).await?;

        let detail = Self::detail(&resources, appointment).await?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle updating an appointment, optionally replacing its line set
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateAppointmentRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let mut appointment =
            Self::appointment_for_member(&resources, &id, auth.user_id).await?;

        if let Some(dog_id) = request.dog_id.as_deref() {
            let dog = resources
                .database
                .get_dog(parse_uuid(dog_id)?)
                .await?
                .filter(|d| d.shop_id == appointment.shop_id)
                .ok_or_else(|| AppError::not_found("Dog"))?;
            appointment.dog_id = dog.id;
        }
        if let Some(raw) = request.assigned_to.as_deref() {
            let groomer_id = parse_uuid(raw)?;
            routes::require_membership(&resources, appointment.shop_id, groomer_id).await?;
            appointment.assigned_to = Some(groomer_id);
        }
        if let Some(date) = request.scheduled_date {
            appointment.scheduled_date = date;
        }
        if let Some(start) = request.start_time {
            appointment.start_time = start;
        }
        if let Some(end) = request.end_time {
            appointment.end_time = Some(end);
        }
        if let Some(memo) = request.memo {
            appointment.memo = Some(memo);
        }
        if let Some(label) = request.grooming_type.as_deref() {
            resources
                .grooming
                .absorb_legacy_label(appointment.shop_id, label)
                .await?;
            appointment.grooming_label = Some(label.to_string());
        }

        // Full validation of the replacement set before any write; an
        // invalid line aborts with the existing lines intact.
        let replacement = match &request.grooming_types {
            Some(lines) => Some(
                resources
                    .grooming
                    .validate_service_lines(appointment.shop_id, lines)
                    .await?,
            ),
            None => None,
        };

        if let Some(total) = request.total_amount {
            appointment.total_amount = total;
        } else if let Some(validated) = &replacement {
            appointment.total_amount = validated.iter().map(|l| l.applied_price).sum();
        }

        let lines = replacement.map(|validated| {
            validated
                .into_iter()
                .map(|v| v.into_line(appointment.id))
                .collect::<Vec<_>>()
        });
        resources
            .database
            .update_appointment_with_lines(&appointment, lines.as_deref())
            .await?;

        let detail = Self::detail(&resources, appointment).await?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle a status transition
    async fn handle_status(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<StatusRequest>,
    ) -> Result<Response, AppError> {
        let auth = routes::authenticate(&headers, &resources)?;
        let mut appointment =
            Self::appointment_for_member(&resources, &id, auth.user_id).await?;

        if !appointment.status.can_transition_to(request.status) {
            return Err(AppError::invalid_state(format!(
                "Cannot transition appointment from {} to {}",
                appointment.status, request.status
            )));
        }

        resources
            .database
            .set_appointment_status(appointment.id, request.status)
            .await?;
        appointment.status = request.status;

        info!(
            appointment_id = %appointment.id,
            status = %request.status,
            "appointment status updated"
        );

        let detail = Self::detail(&resources, appointment).await?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Fetch an appointment and verify the caller's membership of its shop
    async fn appointment_for_member(
        resources: &ServerResources,
        appointment_id: &str,
        user_id: uuid::Uuid,
    ) -> Result<Appointment, AppError> {
        let appointment = resources
            .database
            .get_appointment(parse_uuid(appointment_id)?)
            .await?
            .ok_or_else(|| AppError::not_found("Appointment"))?;
        routes::require_membership(resources, appointment.shop_id, user_id).await?;
        Ok(appointment)
    }

    /// Build the read representation with lines and the synthesized label
    async fn detail(
        resources: &ServerResources,
        appointment: Appointment,
    ) -> Result<AppointmentDetail, AppError> {
        let service_lines = resources.database.list_service_lines(appointment.id).await?;
        let names: Vec<String> = service_lines.iter().map(|l| l.name.clone()).collect();
        let grooming_type =
            GroomingResolver::display_label(&names).or_else(|| appointment.grooming_label.clone());

        Ok(AppointmentDetail {
            appointment,
            grooming_type,
            service_lines,
        })
    }
}
