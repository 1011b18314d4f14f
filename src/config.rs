use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Consultorio";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Request timeout for the image host.
pub const IMAGE_UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

const IMAGE_HOST_URL_VAR: &str = "CONSULTORIO_IMAGE_HOST_URL";
const IMAGE_HOST_KEY_VAR: &str = "CONSULTORIO_IMAGE_HOST_KEY";

/// Get the application data directory
/// ~/Consultorio/ on all platforms (user-visible, so exports are easy to find)
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// Path of the practice database file.
pub fn database_path() -> PathBuf {
    app_data_dir().join("database").join("consultorio.db")
}

/// Directory receiving exported prescriptions.
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

/// Tracing filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "consultorio_lib=debug,info"
    } else {
        "consultorio_lib=info,warn"
    }
}

/// Image hosting endpoint. Uploads are disabled when no URL is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHostConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl ImageHostConfig {
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var(IMAGE_HOST_URL_VAR).ok()?;
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return None;
        }
        Some(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: std::env::var(IMAGE_HOST_KEY_VAR)
                .ok()
                .filter(|k| !k.trim().is_empty()),
        })
    }
}
