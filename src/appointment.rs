//! Appointment scheduling: form types, validation and the edit flow.
//!
//! Appointments are composed on a 12-hour clock through [`TimeDraft`] and
//! stored as 24-hour timestamps. Saving an edit that changes nothing skips
//! the database write.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::appointment_time::{from_hour24, TimeDraft};
use crate::db::{self, DatabaseError};
use crate::models::{Appointment, AppointmentStatus, Period};

// ─── Types ────────────────────────────────────────────────────────────────────

/// Form payload for a new appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub patient_id: String,
    pub date: String, // YYYY-MM-DD
    pub hour: String, // 01..12
    pub minute: String, // 00..59
    pub period: Period,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
}

/// The editable view of an appointment, one field per form control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentEdit {
    pub date: Option<NaiveDate>,
    pub hour: String,
    pub minute: String,
    pub period: Period,
    pub patient_id: Uuid,
    pub reason: String,
    pub status: AppointmentStatus,
}

/// Result of saving an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    Unchanged,
    Updated,
}

/// Row of the agenda list, with the patient's name resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentListItem {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub scheduled_at: String,
    pub date: String,
    pub hour: String,
    pub minute: String,
    pub period: Period,
    pub reason: String,
    pub status: AppointmentStatus,
}

impl AppointmentEdit {
    /// Splits a stored appointment into form fields.
    pub fn from_record(appt: &Appointment) -> Self {
        let draft = TimeDraft::from_timestamp(Some(appt.scheduled_at));
        Self {
            date: draft.date(),
            hour: draft.hour().to_string(),
            minute: draft.minute().to_string(),
            period: draft.period(),
            patient_id: appt.patient_id,
            reason: appt.reason.clone(),
            status: appt.status,
        }
    }

    /// Field-by-field comparison against the form state of the stored record.
    pub fn is_unchanged_from(&self, original: &AppointmentEdit) -> bool {
        self.date == original.date
            && self.hour == original.hour
            && self.minute == original.minute
            && self.period == original.period
            && self.patient_id == original.patient_id
            && self.reason == original.reason
            && self.status == original.status
    }

    /// Builds the 24-hour timestamp the way the form does.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let mut draft = TimeDraft::new();
        draft.set_hour(&self.hour);
        draft.set_minute(&self.minute);
        draft.set_period(self.period);
        draft.set_date(self.date);
        draft.timestamp()
    }
}

// ─── Validation ───────────────────────────────────────────────────────────────

/// Checks the hour and minute strings a form may send.
/// Returns the pair as numbers.
pub fn validate_time_fields(hour: &str, minute: &str) -> Result<(u32, u32), String> {
    let h = match hour.trim().parse::<u32>() {
        Ok(h) if (1..=12).contains(&h) => h,
        _ => return Err(format!("Invalid hour: {hour}. Use 01-12")),
    };
    let m = match minute.trim().parse::<u32>() {
        Ok(m) if m <= 59 => m,
        _ => return Err(format!("Invalid minute: {minute}. Use 00-59")),
    };
    Ok((h, m))
}

/// Validates a request and turns it into the editable form.
pub fn edit_from_request(request: &AppointmentRequest) -> Result<AppointmentEdit, String> {
    let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
        .map_err(|_| "Invalid date format. Use YYYY-MM-DD")?;
    let (hour, minute) = validate_time_fields(&request.hour, &request.minute)?;
    let patient_id = Uuid::parse_str(&request.patient_id)
        .map_err(|_| format!("Invalid patient id: {}", request.patient_id))?;
    if request.reason.len() > 500 {
        return Err("Reason too long (max 500 chars)".into());
    }

    Ok(AppointmentEdit {
        date: Some(date),
        // Same zero-padded form as from_record
        hour: format!("{hour:02}"),
        minute: format!("{minute:02}"),
        period: request.period,
        patient_id,
        reason: request.reason.trim().to_string(),
        status: request.status.unwrap_or_default(),
    })
}

// ─── Repository functions ─────────────────────────────────────────────────────

/// Creates an appointment for `user_id` and returns the stored record.
pub fn create_appointment(
    conn: &Connection,
    user_id: &Uuid,
    edit: &AppointmentEdit,
) -> Result<Appointment, DatabaseError> {
    let scheduled_at = edit.timestamp().ok_or_else(|| {
        DatabaseError::ConstraintViolation("Appointment date is required".into())
    })?;
    ensure_patient_belongs_to(conn, &edit.patient_id, user_id)?;

    let appt = Appointment {
        id: Uuid::new_v4(),
        user_id: *user_id,
        patient_id: edit.patient_id,
        scheduled_at,
        reason: edit.reason.clone(),
        status: edit.status,
    };
    db::insert_appointment(conn, &appt)?;
    tracing::info!(appointment_id = %appt.id, "Appointment created");
    Ok(appt)
}

/// Saves an edit. Returns `Unchanged` without writing when every tracked
/// field matches the stored record.
pub fn update_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
    edit: &AppointmentEdit,
) -> Result<UpdateOutcome, DatabaseError> {
    let stored = db::get_appointment(conn, appointment_id)?
        .ok_or_else(|| DatabaseError::not_found("Appointment", appointment_id))?;

    if edit.is_unchanged_from(&AppointmentEdit::from_record(&stored)) {
        tracing::debug!(%appointment_id, "Appointment unchanged, skipping write");
        return Ok(UpdateOutcome::Unchanged);
    }

    let scheduled_at = edit.timestamp().ok_or_else(|| {
        DatabaseError::ConstraintViolation("Appointment date is required".into())
    })?;
    if edit.patient_id != stored.patient_id {
        ensure_patient_belongs_to(conn, &edit.patient_id, &stored.user_id)?;
    }

    let updated = Appointment {
        patient_id: edit.patient_id,
        scheduled_at,
        reason: edit.reason.clone(),
        status: edit.status,
        ..stored
    };
    db::update_appointment_row(conn, &updated)?;
    tracing::info!(%appointment_id, "Appointment updated");
    Ok(UpdateOutcome::Updated)
}

pub fn delete_appointment(conn: &Connection, appointment_id: &Uuid) -> Result<(), DatabaseError> {
    db::delete_appointment(conn, appointment_id)?;
    tracing::info!(%appointment_id, "Appointment deleted");
    Ok(())
}

/// Agenda for one user, earliest first, with patient names.
pub fn list_appointments(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<AppointmentListItem>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.patient_id, p.name, a.scheduled_at, a.reason, a.status
         FROM appointments a
         JOIN patients p ON a.patient_id = p.id
         WHERE a.user_id = ?1
         ORDER BY a.scheduled_at ASC",
    )?;

    let rows = stmt.query_map(params![user_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            db::repository::datetime_column(row, 3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    rows.map(|r| -> Result<AppointmentListItem, DatabaseError> {
        let (id, patient_id, patient_name, scheduled_at, reason, status) = r?;
        let (hour12, period) = from_hour24(scheduled_at.hour());
        Ok(AppointmentListItem {
            id,
            patient_id,
            patient_name,
            scheduled_at: db::repository::format_datetime(&scheduled_at),
            date: scheduled_at.date().to_string(),
            hour: format!("{hour12:02}"),
            minute: scheduled_at.format("%M").to_string(),
            period,
            reason,
            status: status.parse()?,
        })
    })
    .collect()
}

fn ensure_patient_belongs_to(
    conn: &Connection,
    patient_id: &Uuid,
    user_id: &Uuid,
) -> Result<(), DatabaseError> {
    match db::get_patient(conn, patient_id)? {
        Some(p) if p.user_id == *user_id => Ok(()),
        _ => Err(DatabaseError::not_found("Patient", patient_id)),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
