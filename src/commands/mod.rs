pub mod appointment;
pub mod consultation;
pub mod files;
pub mod patient;
pub mod profile;

use uuid::Uuid;

/// Health check IPC command. Verifies the backend is running.
#[tauri::command]
pub fn health_check() -> String {
    tracing::debug!("Health check called");
    "ok".to_string()
}

/// Parses an id sent by the frontend.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw).map_err(|_| format!("Invalid {what} id: {raw}"))
}
