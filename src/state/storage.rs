// File system locations for the database and its configuration
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::config::StoreConfig;

const APP_DIR_NAME: &str = "com.sycosoft.rowcounter";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to get app data directory")]
    NoAppDataDir,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Get the platform app data directory for row counter data
pub fn get_app_data_dir() -> StorageResult<PathBuf> {
    let data_dir = dirs::data_dir().ok_or(StorageError::NoAppDataDir)?;
    let app_dir = data_dir.join(APP_DIR_NAME);
    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}

/// Directory the database lives in: the configured override, or the app data dir
pub fn resolve_data_dir(config: &StoreConfig) -> StorageResult<PathBuf> {
    match &config.data_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            Ok(dir.clone())
        }
        None => get_app_data_dir(),
    }
}

/// Full path of the database file, creating its parent directory if needed
pub fn resolve_db_path(config: &StoreConfig) -> StorageResult<PathBuf> {
    Ok(resolve_data_dir(config)?.join(&config.db_file_name))
}

pub fn config_path_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}
