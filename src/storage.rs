use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::appointment::Appointment;
use crate::models::settings::UserSettings;

const APPOINTMENTS_FILE: &str = "appointments.json";
const SETTINGS_FILE: &str = "settings.json";

// Returns the directory where both records live.
// Defaults to a relative "./data" directory.
pub fn get_db_location() -> PathBuf {
    PathBuf::from(env::var("DB_LOCATION").unwrap_or("./data".to_string()))
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads the appointment record. An absent or unparsable file yields an
/// empty list; the whole record is discarded, there is no partial recovery.
pub fn load_appointments(dir: &Path) -> Vec<Appointment> {
    load_record(&dir.join(APPOINTMENTS_FILE)).unwrap_or_default()
}

/// Overwrites the appointment record with the full sequence.
pub fn save_appointments(dir: &Path, appointments: &[Appointment]) -> Result<(), StorageError> {
    save_record(dir, APPOINTMENTS_FILE, &serde_json::to_string(appointments)?)
}

/// Reads the settings record, defaulting to `{frequencyDays: 28}`.
pub fn load_settings(dir: &Path) -> UserSettings {
    load_record(&dir.join(SETTINGS_FILE)).unwrap_or_default()
}

pub fn save_settings(dir: &Path, settings: &UserSettings) -> Result<(), StorageError> {
    save_record(dir, SETTINGS_FILE, &serde_json::to_string(settings)?)
}

fn load_record<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!(
                "Discarding unreadable record {}: {}",
                path.display(),
                err
            );
            None
        }
    }
}

fn save_record(dir: &Path, file: &str, payload: &str) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|source| StorageError::Write {
        path: dir.display().to_string(),
        source,
    })?;
    let path = dir.join(file);
    fs::write(&path, payload).map_err(|source| StorageError::Write {
        path: path.display().to_string(),
        source,
    })
}
