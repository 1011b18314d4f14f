//! Agenda: Tauri IPC commands.
//!
//! Four commands:
//! - `list_appointments`: the doctor's agenda, earliest first
//! - `create_appointment`: compose a 12-hour form into a stored appointment
//! - `update_appointment`: save an edit, skipping the write when nothing changed
//! - `delete_appointment`: remove one appointment

use std::sync::Arc;

use tauri::State;

use super::parse_id;
use crate::appointment::{
    self, AppointmentListItem, AppointmentRequest, UpdateOutcome,
};
use crate::core_state::CoreState;
use crate::models::Appointment;

#[tauri::command]
pub fn list_appointments(
    user_id: String,
    state: State<'_, Arc<CoreState>>,
) -> Result<Vec<AppointmentListItem>, String> {
    let user_id = parse_id(&user_id, "user")?;
    let conn = state.open_db().map_err(|e| e.to_string())?;

    appointment::list_appointments(&conn, &user_id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn create_appointment(
    user_id: String,
    request: AppointmentRequest,
    state: State<'_, Arc<CoreState>>,
) -> Result<Appointment, String> {
    let user_id = parse_id(&user_id, "user")?;
    let edit = appointment::edit_from_request(&request)?;

    let conn = state.open_db().map_err(|e| e.to_string())?;

    appointment::create_appointment(&conn, &user_id, &edit).map_err(|e| e.to_string())
}

/// Returns `unchanged` when the form matches the stored appointment.
#[tauri::command]
pub fn update_appointment(
    appointment_id: String,
    request: AppointmentRequest,
    state: State<'_, Arc<CoreState>>,
) -> Result<UpdateOutcome, String> {
    let appointment_id = parse_id(&appointment_id, "appointment")?;
    let edit = appointment::edit_from_request(&request)?;

    let conn = state.open_db().map_err(|e| e.to_string())?;

    appointment::update_appointment(&conn, &appointment_id, &edit).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_appointment(
    appointment_id: String,
    state: State<'_, Arc<CoreState>>,
) -> Result<(), String> {
    let appointment_id = parse_id(&appointment_id, "appointment")?;
    let conn = state.open_db().map_err(|e| e.to_string())?;

    appointment::delete_appointment(&conn, &appointment_id).map_err(|e| e.to_string())
}
