use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{datetime_column, format_datetime, uuid_column};
use crate::db::DatabaseError;
use crate::models::*;

const APPOINTMENT_COLUMNS: &str = "id, user_id, patient_id, scheduled_at, reason, status";

fn appointment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Appointment, String)> {
    Ok((
        Appointment {
            id: uuid_column(row, 0)?,
            user_id: uuid_column(row, 1)?,
            patient_id: uuid_column(row, 2)?,
            scheduled_at: datetime_column(row, 3)?,
            reason: row.get(4)?,
            status: AppointmentStatus::Pending,
        },
        row.get::<_, String>(5)?,
    ))
}

fn with_status((mut appt, status): (Appointment, String)) -> Result<Appointment, DatabaseError> {
    appt.status = AppointmentStatus::from_str(&status)?;
    Ok(appt)
}

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, user_id, patient_id, scheduled_at, reason, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            appt.id.to_string(),
            appt.user_id.to_string(),
            appt.patient_id.to_string(),
            format_datetime(&appt.scheduled_at),
            appt.reason,
            appt.status.as_str(),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1");
    conn.query_row(&sql, params![id.to_string()], appointment_from_row)
        .optional()?
        .map(with_status)
        .transpose()
}

/// Writes every mutable column of an appointment.
pub fn update_appointment_row(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET patient_id = ?2, scheduled_at = ?3, reason = ?4, status = ?5
         WHERE id = ?1",
        params![
            appt.id.to_string(),
            appt.patient_id.to_string(),
            format_datetime(&appt.scheduled_at),
            appt.reason,
            appt.status.as_str(),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Appointment", appt.id));
    }
    Ok(())
}

pub fn delete_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM appointments WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Appointment", id));
    }
    Ok(())
}
