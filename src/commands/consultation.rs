//! Consultations and prescriptions: Tauri IPC commands.
//!
//! - `list_consultations`: history of one patient, newest first
//! - `create_consultation`: record a consultation with its medication lines
//! - `delete_consultation`: remove one consultation
//! - `render_prescription_html`: printable HTML for the preview pane
//! - `export_prescription`: write the printable HTML to the exports folder

use std::sync::Arc;

use chrono::Local;
use tauri::State;

use super::parse_id;
use crate::consultations::{self, ConsultationRequest};
use crate::core_state::CoreState;
use crate::db;
use crate::models::Consultation;
use crate::prescription;

#[tauri::command]
pub fn list_consultations(
    patient_id: String,
    state: State<'_, Arc<CoreState>>,
) -> Result<Vec<Consultation>, String> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let conn = state.open_db().map_err(|e| e.to_string())?;

    consultations::list_consultations(&conn, &patient_id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn create_consultation(
    user_id: String,
    request: ConsultationRequest,
    state: State<'_, Arc<CoreState>>,
) -> Result<Consultation, String> {
    let user_id = parse_id(&user_id, "user")?;
    let consultation = consultations::consultation_from_request(&user_id, &request)?;

    let conn = state.open_db().map_err(|e| e.to_string())?;

    consultations::create_consultation(&conn, &consultation).map_err(|e| e.to_string())?;
    Ok(consultation)
}

#[tauri::command]
pub fn delete_consultation(
    consultation_id: String,
    state: State<'_, Arc<CoreState>>,
) -> Result<(), String> {
    let consultation_id = parse_id(&consultation_id, "consultation")?;
    let conn = state.open_db().map_err(|e| e.to_string())?;

    consultations::delete_consultation(&conn, &consultation_id).map_err(|e| e.to_string())
}

/// Renders the prescription of a consultation. `site_logo` is the practice
/// logo bundled with the frontend.
#[tauri::command]
pub fn render_prescription_html(
    consultation_id: String,
    site_logo: Option<String>,
    state: State<'_, Arc<CoreState>>,
) -> Result<String, String> {
    let consultation_id = parse_id(&consultation_id, "consultation")?;
    let conn = state.open_db().map_err(|e| e.to_string())?;

    prescription::render_for_consultation(
        &conn,
        &consultation_id,
        Local::now().date_naive(),
        site_logo.as_deref(),
    )
    .map_err(|e| e.to_string())
}

/// Writes the prescription as HTML into the exports folder and returns its path.
#[tauri::command]
pub fn export_prescription(
    consultation_id: String,
    site_logo: Option<String>,
    state: State<'_, Arc<CoreState>>,
) -> Result<String, String> {
    let consultation_id = parse_id(&consultation_id, "consultation")?;
    let conn = state.open_db().map_err(|e| e.to_string())?;

    let today = Local::now().date_naive();
    let html = prescription::render_for_consultation(
        &conn,
        &consultation_id,
        today,
        site_logo.as_deref(),
    )
    .map_err(|e| e.to_string())?;

    let consultation = db::get_consultation(&conn, &consultation_id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Consultation not found: {consultation_id}"))?;
    let patient_name = db::get_patient(&conn, &consultation.patient_id)
        .map_err(|e| e.to_string())?
        .map(|p| p.name)
        .unwrap_or_default();

    let filename = prescription::export_filename(&patient_name, consultation.date);
    let path = prescription::export_document(&html, &filename, &state.exports_dir)
        .map_err(|e| e.to_string())?;

    Ok(path.to_string_lossy().into_owned())
}
