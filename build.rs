fn main() {
    // The desktop shell needs tauri.conf.json processed at build time;
    // the library core builds without it.
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
