//! Shared application state handed to every IPC command.
//!
//! Holds where the practice database and exports live, plus the optional
//! image host configuration. Each command opens its own connection.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{self, ImageHostConfig};
use crate::db;

pub struct CoreState {
    /// SQLite file of the practice.
    pub db_path: PathBuf,
    /// Where printable documents are written.
    pub exports_dir: PathBuf,
    /// `None` disables logo uploads.
    pub image_host: Option<ImageHostConfig>,
}

impl CoreState {
    /// State rooted in the default `~/Consultorio` layout.
    pub fn new() -> Self {
        Self::with_paths(config::database_path(), config::exports_dir())
            .with_image_host(ImageHostConfig::from_env())
    }

    pub fn with_paths(db_path: PathBuf, exports_dir: PathBuf) -> Self {
        Self {
            db_path,
            exports_dir,
            image_host: None,
        }
    }

    pub fn with_image_host(mut self, image_host: Option<ImageHostConfig>) -> Self {
        self.image_host = image_host;
        self
    }

    /// Open a database connection, running pending migrations.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}
