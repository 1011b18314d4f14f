pub mod age;
pub mod appointment; // Agenda: form, edit short-circuit, list
pub mod appointment_time; // 12h/24h time composer
#[cfg(feature = "desktop")]
pub mod commands;
pub mod config;
pub mod consultations;
pub mod core_state;
pub mod db;
pub mod host; // OS open/reveal
pub mod images; // Logo conversion + upload
pub mod models;
pub mod patients;
pub mod prescription; // Printable HTML prescriptions
pub mod profile;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;
    use tracing_subscriber::EnvFilter;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(Arc::new(core_state::CoreState::new()))
        .invoke_handler(tauri::generate_handler![
            commands::health_check,
            commands::patient::list_patients,
            commands::patient::create_patient,
            commands::patient::update_patient,
            commands::patient::delete_patient,
            commands::appointment::list_appointments,
            commands::appointment::create_appointment,
            commands::appointment::update_appointment,
            commands::appointment::delete_appointment,
            commands::profile::get_user,
            commands::profile::create_user,
            commands::profile::update_user,
            commands::consultation::list_consultations,
            commands::consultation::create_consultation,
            commands::consultation::delete_consultation,
            commands::consultation::render_prescription_html,
            commands::consultation::export_prescription,
            commands::files::open_file,
            commands::files::reveal_file,
            commands::files::upload_image,
        ])
        .run(tauri::generate_context!())
        .expect("error while running Consultorio");
}
