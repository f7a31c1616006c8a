// ABOUTME: Appointment database operations including transactional service-line replacement
// ABOUTME: Handles booking, updates, status transitions, line listings, and revenue summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Groomdesk

use std::str::FromStr;

use super::Database;
use crate::errors::AppResult;
use crate::models::{Appointment, AppointmentServiceLine, AppointmentStatus};
use crate::utils::uuid::parse_stored_uuid;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};
use uuid::Uuid;

/// One attached service line joined with its catalog name, for read responses
#[derive(Debug, Clone, Serialize)]
pub struct ServiceLineDetail {
    /// Line identifier
    pub id: Uuid,
    /// Referenced catalog entry
    pub grooming_type_id: Uuid,
    /// Catalog name at read time
    pub name: String,
    /// Price captured at booking time
    pub applied_price: i64,
}

/// Revenue attributed to one appointment status within a period
#[derive(Debug, Clone, Serialize)]
pub struct StatusRevenue {
    /// Appointment status
    pub status: AppointmentStatus,
    /// Number of appointments in this status
    pub count: i64,
    /// Sum of total amounts in minor currency units
    pub amount: i64,
}

/// Per-shop revenue summary over a date range.
///
/// Cancelled appointments are listed in the breakdown but excluded from the
/// headline totals.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueSummary {
    /// Shop the summary covers
    pub shop_id: Uuid,
    /// Inclusive period start
    pub from: NaiveDate,
    /// Inclusive period end
    pub to: NaiveDate,
    /// Revenue across non-cancelled appointments
    pub total_amount: i64,
    /// Count of non-cancelled appointments
    pub appointment_count: i64,
    /// Breakdown by status, cancelled included for visibility
    pub by_status: Vec<StatusRevenue>,
}

impl Database {
    /// Create the appointments and appointment_service_lines tables
    pub(super) async fn migrate_appointments(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS appointments (
                id TEXT PRIMARY KEY,
                shop_id TEXT NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
                dog_id TEXT NOT NULL REFERENCES dogs(id),
                created_by TEXT NOT NULL REFERENCES users(id),
                assigned_to TEXT REFERENCES users(id),
                scheduled_date DATE NOT NULL,
                start_time TIME NOT NULL,
                end_time TIME,
                grooming_label TEXT,
                memo TEXT,
                total_amount INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'scheduled'
                    CHECK (status IN ('scheduled', 'in_progress', 'completed', 'cancelled', 'settled')),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS appointment_service_lines (
                id TEXT PRIMARY KEY,
                appointment_id TEXT NOT NULL REFERENCES appointments(id) ON DELETE CASCADE,
                grooming_type_id TEXT NOT NULL REFERENCES grooming_service_types(id),
                applied_price INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_appointments_shop_date ON appointments(shop_id, scheduled_date)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_service_lines_appointment ON appointment_service_lines(appointment_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Book an appointment and attach its validated service lines as one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails
    pub async fn create_appointment_with_lines(
        &self,
        appointment: &Appointment,
        lines: &[AppointmentServiceLine],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO appointments (id, shop_id, dog_id, created_by, assigned_to,
                                      scheduled_date, start_time, end_time, grooming_label,
                                      memo, total_amount, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(appointment.id.to_string())
        .bind(appointment.shop_id.to_string())
        .bind(appointment.dog_id.to_string())
        .bind(appointment.created_by.to_string())
        .bind(appointment.assigned_to.map(|id| id.to_string()))
        .bind(appointment.scheduled_date)
        .bind(appointment.start_time)
        .bind(appointment.end_time)
        .bind(&appointment.grooming_label)
        .bind(&appointment.memo)
        .bind(appointment.total_amount)
        .bind(appointment.status.as_str())
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&mut *tx)
        .await?;

        Self::insert_lines(&mut tx, lines).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Update an appointment's fields and, when a new line set is supplied,
    /// replace its service lines inside the same transaction.
    ///
    /// The replace is delete-all then re-insert; running it inside one
    /// transaction means a crash between the two cannot strand the
    /// appointment with zero lines. `lines: None` leaves existing lines
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn update_appointment_with_lines(
        &self,
        appointment: &Appointment,
        lines: Option<&[AppointmentServiceLine]>,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            UPDATE appointments
            SET dog_id = $2, assigned_to = $3, scheduled_date = $4, start_time = $5,
                end_time = $6, grooming_label = $7, memo = $8, total_amount = $9,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(appointment.id.to_string())
        .bind(appointment.dog_id.to_string())
        .bind(appointment.assigned_to.map(|id| id.to_string()))
        .bind(appointment.scheduled_date)
        .bind(appointment.start_time)
        .bind(appointment.end_time)
        .bind(&appointment.grooming_label)
        .bind(&appointment.memo)
        .bind(appointment.total_amount)
        .execute(&mut *tx)
        .await?;

        if let Some(lines) = lines {
            sqlx::query("DELETE FROM appointment_service_lines WHERE appointment_id = $1")
                .bind(appointment.id.to_string())
                .execute(&mut *tx)
                .await?;

            Self::insert_lines(&mut tx, lines).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Insert join rows for an existing appointment (additive, create path)
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails
    pub async fn attach_service_lines(
        &self,
        lines: &[AppointmentServiceLine],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::insert_lines(&mut tx, lines).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Delete every join row for an appointment and insert the new set as
    /// one transaction (update path, full replace).
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn replace_service_lines(
        &self,
        appointment_id: Uuid,
        lines: &[AppointmentServiceLine],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM appointment_service_lines WHERE appointment_id = $1")
            .bind(appointment_id.to_string())
            .execute(&mut *tx)
            .await?;

        Self::insert_lines(&mut tx, lines).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn insert_lines(
        tx: &mut Transaction<'_, Sqlite>,
        lines: &[AppointmentServiceLine],
    ) -> AppResult<()> {
        for line in lines {
            sqlx::query(
                r"
                INSERT INTO appointment_service_lines (id, appointment_id, grooming_type_id,
                                                       applied_price, created_at)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(line.id.to_string())
            .bind(line.appointment_id.to_string())
            .bind(line.grooming_type_id.to_string())
            .bind(line.applied_price)
            .bind(line.created_at)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    /// Get an appointment by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupted
    pub async fn get_appointment(&self, appointment_id: Uuid) -> AppResult<Option<Appointment>> {
        let row = sqlx::query(
            r"
            SELECT id, shop_id, dog_id, created_by, assigned_to, scheduled_date,
                   start_time, end_time, grooming_label, memo, total_amount, status,
                   created_at, updated_at
            FROM appointments WHERE id = $1
            ",
        )
        .bind(appointment_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_appointment(&r)).transpose()
    }

    /// List appointments for a shop within an inclusive date range
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupted
    pub async fn list_appointments(
        &self,
        shop_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Appointment>> {
        let rows = sqlx::query(
            r"
            SELECT id, shop_id, dog_id, created_by, assigned_to, scheduled_date,
                   start_time, end_time, grooming_label, memo, total_amount, status,
                   created_at, updated_at
            FROM appointments
            WHERE shop_id = $1 AND scheduled_date >= $2 AND scheduled_date <= $3
            ORDER BY scheduled_date, start_time
            ",
        )
        .bind(shop_id.to_string())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_appointment).collect()
    }

    /// List a dog's appointment history, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupted
    pub async fn list_appointments_for_dog(&self, dog_id: Uuid) -> AppResult<Vec<Appointment>> {
        let rows = sqlx::query(
            r"
            SELECT id, shop_id, dog_id, created_by, assigned_to, scheduled_date,
                   start_time, end_time, grooming_label, memo, total_amount, status,
                   created_at, updated_at
            FROM appointments WHERE dog_id = $1
            ORDER BY scheduled_date DESC, start_time DESC
            ",
        )
        .bind(dog_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_appointment).collect()
    }

    /// Persist an appointment status transition
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn set_appointment_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE appointments SET status = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(appointment_id.to_string())
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List an appointment's service lines joined with their catalog names
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupted
    pub async fn list_service_lines(
        &self,
        appointment_id: Uuid,
    ) -> AppResult<Vec<ServiceLineDetail>> {
        let rows = sqlx::query(
            r"
            SELECT l.id, l.grooming_type_id, l.applied_price, t.name
            FROM appointment_service_lines l
            JOIN grooming_service_types t ON t.id = l.grooming_type_id
            WHERE l.appointment_id = $1
            ORDER BY l.created_at
            ",
        )
        .bind(appointment_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| {
                let id: String = r.get("id");
                let grooming_type_id: String = r.get("grooming_type_id");
                Ok(ServiceLineDetail {
                    id: parse_stored_uuid(&id)?,
                    grooming_type_id: parse_stored_uuid(&grooming_type_id)?,
                    name: r.get("name"),
                    applied_price: r.get("applied_price"),
                })
            })
            .collect()
    }

    /// Compute a revenue summary for a shop over an inclusive date range.
    ///
    /// Grouping happens in SQL; cancelled appointments appear in the
    /// breakdown but are excluded from the headline totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupted
    pub async fn revenue_summary(
        &self,
        shop_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<RevenueSummary> {
        let rows = sqlx::query(
            r"
            SELECT status, COUNT(*) AS cnt, COALESCE(SUM(total_amount), 0) AS amount
            FROM appointments
            WHERE shop_id = $1 AND scheduled_date >= $2 AND scheduled_date <= $3
            GROUP BY status
            ",
        )
        .bind(shop_id.to_string())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let mut by_status = Vec::with_capacity(rows.len());
        let mut total_amount = 0i64;
        let mut appointment_count = 0i64;

        for row in &rows {
            let status_str: String = row.get("status");
            let status = AppointmentStatus::from_str(&status_str)?;
            let count: i64 = row.get("cnt");
            let amount: i64 = row.get("amount");

            if status != AppointmentStatus::Cancelled {
                total_amount += amount;
                appointment_count += count;
            }

            by_status.push(StatusRevenue {
                status,
                count,
                amount,
            });
        }

        Ok(RevenueSummary {
            shop_id,
            from,
            to,
            total_amount,
            appointment_count,
            by_status,
        })
    }

    fn row_to_appointment(row: &SqliteRow) -> AppResult<Appointment> {
        let id: String = row.get("id");
        let shop_id: String = row.get("shop_id");
        let dog_id: String = row.get("dog_id");
        let created_by: String = row.get("created_by");
        let assigned_to: Option<String> = row.get("assigned_to");
        let status: String = row.get("status");
        Ok(Appointment {
            id: parse_stored_uuid(&id)?,
            shop_id: parse_stored_uuid(&shop_id)?,
            dog_id: parse_stored_uuid(&dog_id)?,
            created_by: parse_stored_uuid(&created_by)?,
            assigned_to: assigned_to.as_deref().map(parse_stored_uuid).transpose()?,
            scheduled_date: row.get("scheduled_date"),
            start_time: row.get("start_time"),
            end_time: row.get("end_time"),
            grooming_label: row.get("grooming_label"),
            memo: row.get("memo"),
            total_amount: row.get("total_amount"),
            status: AppointmentStatus::from_str(&status)?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
