//! Doctor profile: registration and editing of the fields printed on
//! prescriptions.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::User;

/// Profile form payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub speciality: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Trims the form and checks the required fields.
pub fn validate_profile(request: &ProfileRequest) -> Result<ProfileRequest, String> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err("Name is required".into());
    }
    if name.len() > 200 {
        return Err("Name too long (max 200 chars)".into());
    }
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(format!("Invalid email: {}", request.email));
    }
    let logo_url = clean(request.logo_url.as_deref());
    if let Some(ref url) = logo_url {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err("Logo URL must be an http(s) address".into());
        }
    }

    Ok(ProfileRequest {
        name: name.to_string(),
        email: email.to_lowercase(),
        gender: clean(request.gender.as_deref()),
        speciality: clean(request.speciality.as_deref()),
        phone: clean(request.phone.as_deref()),
        address: clean(request.address.as_deref()),
        license_number: clean(request.license_number.as_deref()),
        logo_url,
    })
}

/// Registers a doctor. Emails are unique.
pub fn create_user(conn: &Connection, profile: ProfileRequest) -> Result<User, DatabaseError> {
    let user = User {
        id: Uuid::new_v4(),
        name: profile.name,
        email: profile.email,
        gender: profile.gender,
        speciality: profile.speciality,
        phone: profile.phone,
        address: profile.address,
        license_number: profile.license_number,
        logo_url: profile.logo_url,
        created_at: db::now_seconds(),
    };
    db::insert_user(conn, &user).map_err(|e| email_conflict(e, &user.email))?;
    tracing::info!(user_id = %user.id, "User created");
    Ok(user)
}

pub fn update_profile(
    conn: &Connection,
    user_id: &Uuid,
    profile: ProfileRequest,
) -> Result<User, DatabaseError> {
    let stored = db::get_user(conn, user_id)?
        .ok_or_else(|| DatabaseError::not_found("User", user_id))?;

    let user = User {
        name: profile.name,
        email: profile.email,
        gender: profile.gender,
        speciality: profile.speciality,
        phone: profile.phone,
        address: profile.address,
        license_number: profile.license_number,
        logo_url: profile.logo_url,
        ..stored
    };
    db::update_user(conn, &user).map_err(|e| email_conflict(e, &user.email))?;
    tracing::info!(%user_id, "Profile updated");
    Ok(user)
}

// The only UNIQUE column on users is the email.
fn email_conflict(e: DatabaseError, email: &str) -> DatabaseError {
    match e {
        DatabaseError::Sqlite(rusqlite::Error::SqliteFailure(f, _))
            if f.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(format!("Email already registered: {email}"))
        }
        other => other,
    }
}

/// Stores a freshly uploaded logo URL on the profile.
pub fn set_logo_url(conn: &Connection, user_id: &Uuid, url: &str) -> Result<User, DatabaseError> {
    let mut user = db::get_user(conn, user_id)?
        .ok_or_else(|| DatabaseError::not_found("User", user_id))?;
    user.logo_url = Some(url.to_string());
    db::update_user(conn, &user)?;
    tracing::info!(%user_id, "Logo updated");
    Ok(user)
}
