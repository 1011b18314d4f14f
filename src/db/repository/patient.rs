use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{datetime_column, format_date, format_datetime, optional_date_column, uuid_column};
use crate::db::DatabaseError;
use crate::models::*;

const PATIENT_COLUMNS: &str = "id, user_id, name, document_id, birth_date, gender, phone,
     email, insurance, address, notes, created_at";

fn patient_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: uuid_column(row, 0)?,
        user_id: uuid_column(row, 1)?,
        name: row.get(2)?,
        document_id: row.get(3)?,
        birth_date: optional_date_column(row, 4)?,
        gender: row.get(5)?,
        phone: row.get(6)?,
        email: row.get(7)?,
        insurance: row.get(8)?,
        address: row.get(9)?,
        notes: row.get(10)?,
        created_at: datetime_column(row, 11)?,
    })
}

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, user_id, name, document_id, birth_date, gender, phone,
         email, insurance, address, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            patient.id.to_string(),
            patient.user_id.to_string(),
            patient.name,
            patient.document_id,
            patient.birth_date.as_ref().map(format_date),
            patient.gender,
            patient.phone,
            patient.email,
            patient.insurance,
            patient.address,
            patient.notes,
            format_datetime(&patient.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1");
    conn.query_row(&sql, params![id.to_string()], patient_from_row)
        .optional()
        .map_err(DatabaseError::from)
}

/// Patients owned by `user_id`, ordered by name.
pub fn list_patients_for_user(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<Patient>, DatabaseError> {
    let sql = format!(
        "SELECT {PATIENT_COLUMNS} FROM patients WHERE user_id = ?1
         ORDER BY name COLLATE NOCASE ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id.to_string()], patient_from_row)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET name = ?2, document_id = ?3, birth_date = ?4, gender = ?5,
         phone = ?6, email = ?7, insurance = ?8, address = ?9, notes = ?10
         WHERE id = ?1",
        params![
            patient.id.to_string(),
            patient.name,
            patient.document_id,
            patient.birth_date.as_ref().map(format_date),
            patient.gender,
            patient.phone,
            patient.email,
            patient.insurance,
            patient.address,
            patient.notes,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Patient", patient.id));
    }
    Ok(())
}

/// Deletes a patient. Their appointments go with them (ON DELETE CASCADE).
pub fn delete_patient(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM patients WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Patient", id));
    }
    Ok(())
}
