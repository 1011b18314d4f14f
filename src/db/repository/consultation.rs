use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{date_column, format_date, optional_date_column, uuid_column};
use crate::db::DatabaseError;
use crate::models::*;

const CONSULTATION_COLUMNS: &str = "id, user_id, patient_id, date, reason, diagnosis,
     treatment, medications, notes, next_visit";

fn consultation_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Consultation, String)> {
    Ok((
        Consultation {
            id: uuid_column(row, 0)?,
            user_id: uuid_column(row, 1)?,
            patient_id: uuid_column(row, 2)?,
            date: date_column(row, 3)?,
            reason: row.get(4)?,
            diagnosis: row.get(5)?,
            treatment: row.get(6)?,
            medications: Vec::new(),
            notes: row.get(8)?,
            next_visit: optional_date_column(row, 9)?,
        },
        row.get::<_, String>(7)?,
    ))
}

fn with_medications(
    (mut consultation, medications): (Consultation, String),
) -> Result<Consultation, DatabaseError> {
    consultation.medications = serde_json::from_str(&medications).map_err(|e| {
        DatabaseError::ConstraintViolation(format!(
            "Malformed medications for consultation {}: {e}",
            consultation.id
        ))
    })?;
    Ok(consultation)
}

pub fn insert_consultation(conn: &Connection, c: &Consultation) -> Result<(), DatabaseError> {
    let medications = serde_json::to_string(&c.medications)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("JSON serialization: {e}")))?;

    conn.execute(
        "INSERT INTO consultations (id, user_id, patient_id, date, reason, diagnosis,
         treatment, medications, notes, next_visit)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            c.id.to_string(),
            c.user_id.to_string(),
            c.patient_id.to_string(),
            format_date(&c.date),
            c.reason,
            c.diagnosis,
            c.treatment,
            medications,
            c.notes,
            c.next_visit.as_ref().map(format_date),
        ],
    )?;
    Ok(())
}

pub fn get_consultation(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<Consultation>, DatabaseError> {
    let sql = format!("SELECT {CONSULTATION_COLUMNS} FROM consultations WHERE id = ?1");
    conn.query_row(&sql, params![id.to_string()], consultation_from_row)
        .optional()?
        .map(with_medications)
        .transpose()
}

/// Consultations of one patient, newest first.
pub fn list_consultations_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Consultation>, DatabaseError> {
    let sql = format!(
        "SELECT {CONSULTATION_COLUMNS} FROM consultations WHERE patient_id = ?1
         ORDER BY date DESC, rowid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![patient_id.to_string()], consultation_from_row)?;

    rows.map(|r| r.map_err(DatabaseError::from).and_then(with_medications))
        .collect()
}

pub fn delete_consultation(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM consultations WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Consultation", id));
    }
    Ok(())
}
