//! Patient registry: Tauri IPC commands.

use std::sync::Arc;

use chrono::Local;
use tauri::State;

use super::parse_id;
use crate::core_state::CoreState;
use crate::models::Patient;
use crate::patients::{self, PatientListItem, PatientRequest};

#[tauri::command]
pub fn list_patients(
    user_id: String,
    state: State<'_, Arc<CoreState>>,
) -> Result<Vec<PatientListItem>, String> {
    let user_id = parse_id(&user_id, "user")?;
    let conn = state.open_db().map_err(|e| e.to_string())?;

    patients::list_patients(&conn, &user_id, Local::now().date_naive()).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn create_patient(
    user_id: String,
    request: PatientRequest,
    state: State<'_, Arc<CoreState>>,
) -> Result<Patient, String> {
    let user_id = parse_id(&user_id, "user")?;
    let fields = patients::validate_request(&request, Local::now().date_naive())?;

    let conn = state.open_db().map_err(|e| e.to_string())?;

    patients::create_patient(&conn, &user_id, fields).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_patient(
    patient_id: String,
    request: PatientRequest,
    state: State<'_, Arc<CoreState>>,
) -> Result<Patient, String> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let fields = patients::validate_request(&request, Local::now().date_naive())?;

    let conn = state.open_db().map_err(|e| e.to_string())?;

    patients::update_patient(&conn, &patient_id, fields).map_err(|e| e.to_string())
}

/// Deletes a patient together with their appointments.
#[tauri::command]
pub fn delete_patient(
    patient_id: String,
    state: State<'_, Arc<CoreState>>,
) -> Result<(), String> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let conn = state.open_db().map_err(|e| e.to_string())?;

    patients::delete_patient(&conn, &patient_id).map_err(|e| e.to_string())
}
