use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A practitioner using the application. Owns patients and appointments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Free text as entered; drives the printed title.
    pub gender: Option<String>,
    pub speciality: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub license_number: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: NaiveDateTime,
}
