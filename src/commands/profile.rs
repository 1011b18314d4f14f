//! Doctor profile: Tauri IPC commands.

use std::sync::Arc;

use tauri::State;

use super::parse_id;
use crate::core_state::CoreState;
use crate::db;
use crate::models::User;
use crate::profile::{self, ProfileRequest};

#[tauri::command]
pub fn get_user(
    user_id: String,
    state: State<'_, Arc<CoreState>>,
) -> Result<User, String> {
    let user_id = parse_id(&user_id, "user")?;
    let conn = state.open_db().map_err(|e| e.to_string())?;

    db::get_user(&conn, &user_id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("User not found: {user_id}"))
}

/// Registers a new doctor profile.
#[tauri::command]
pub fn create_user(
    request: ProfileRequest,
    state: State<'_, Arc<CoreState>>,
) -> Result<User, String> {
    let profile = profile::validate_profile(&request)?;
    let conn = state.open_db().map_err(|e| e.to_string())?;

    profile::create_user(&conn, profile).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_user(
    user_id: String,
    request: ProfileRequest,
    state: State<'_, Arc<CoreState>>,
) -> Result<User, String> {
    let user_id = parse_id(&user_id, "user")?;
    let profile = profile::validate_profile(&request)?;
    let conn = state.open_db().map_err(|e| e.to_string())?;

    profile::update_profile(&conn, &user_id, profile).map_err(|e| e.to_string())
}
