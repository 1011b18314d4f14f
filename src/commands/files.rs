//! Files on the user's machine: Tauri IPC commands.
//!
//! - `open_file`: open an exported document with the default application
//! - `reveal_file`: show an exported document in the file browser
//! - `upload_image`: convert a picked image to PNG and send it to the image host

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tauri::State;

use super::parse_id;
use crate::core_state::CoreState;
use crate::host;
use crate::images::{self, HttpImageHost, ImageError};
use crate::profile;

#[tauri::command]
pub fn open_file(path: String) -> Result<(), String> {
    host::open_path(Path::new(&path)).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn reveal_file(path: String) -> Result<(), String> {
    host::reveal_path(Path::new(&path)).map_err(|e| e.to_string())
}

/// Uploads the image at `path` and returns its public URL. When `user_id` is
/// given the URL is stored as that doctor's logo.
#[tauri::command]
pub async fn upload_image(
    path: String,
    user_id: Option<String>,
    state: State<'_, Arc<CoreState>>,
) -> Result<String, String> {
    let user_id = user_id.as_deref().map(|id| parse_id(id, "user")).transpose()?;
    let config = state
        .image_host
        .clone()
        .ok_or_else(|| ImageError::NotConfigured.to_string())?;

    let path = PathBuf::from(path);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "logo".to_string());

    let host = HttpImageHost::new(&config).map_err(|e| e.to_string())?;
    let url = images::upload_logo(&host, &bytes, &name)
        .await
        .map_err(|e| e.to_string())?;

    if let Some(user_id) = user_id {
        let conn = state.open_db().map_err(|e| e.to_string())?;
        profile::set_logo_url(&conn, &user_id, &url).map_err(|e| e.to_string())?;
    }

    Ok(url)
}
