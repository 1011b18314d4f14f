use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{datetime_column, format_datetime, uuid_column};
use crate::db::DatabaseError;
use crate::models::*;

const USER_COLUMNS: &str = "id, name, email, gender, speciality, phone, address,
     license_number, logo_url, created_at";

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        gender: row.get(3)?,
        speciality: row.get(4)?,
        phone: row.get(5)?,
        address: row.get(6)?,
        license_number: row.get(7)?,
        logo_url: row.get(8)?,
        created_at: datetime_column(row, 9)?,
    })
}

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, name, email, gender, speciality, phone, address,
         license_number, logo_url, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            user.id.to_string(),
            user.name,
            user.email,
            user.gender,
            user.speciality,
            user.phone,
            user.address,
            user.license_number,
            user.logo_url,
            format_datetime(&user.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<Option<User>, DatabaseError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    conn.query_row(&sql, params![id.to_string()], user_from_row)
        .optional()
        .map_err(DatabaseError::from)
}

/// Overwrites the profile fields of an existing user. `created_at` is kept.
pub fn update_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE users SET name = ?2, email = ?3, gender = ?4, speciality = ?5,
         phone = ?6, address = ?7, license_number = ?8, logo_url = ?9
         WHERE id = ?1",
        params![
            user.id.to_string(),
            user.name,
            user.email,
            user.gender,
            user.speciality,
            user.phone,
            user.address,
            user.license_number,
            user.logo_url,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("User", user.id));
    }
    Ok(())
}
