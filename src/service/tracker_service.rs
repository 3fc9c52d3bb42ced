use std::path::PathBuf;

use thiserror::Error;

use crate::models::appointment::{
    parse_date, sort_by_date, Appointment, DEFAULT_FREQUENCY_DAYS,
};
use crate::models::settings::UserSettings;
use crate::service::confirm_prompt::ConfirmPrompt;
use crate::storage::{self, StorageError};

/// How long the presentation layer keeps the "Saving" indicator visible.
/// Purely cosmetic; the write itself has already completed.
pub const SAVE_INDICATOR_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker state has not been loaded yet")]
    NotLoaded,
    #[error("appointment date must not be empty")]
    EmptyDate,
    #[error("could not parse appointment date: {0}")]
    InvalidDate(String),
    #[error("no appointment with id {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Replaces the original's ambient isLoaded/isSaving flags: saves are only
/// reachable from states the load transition has passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    NotLoaded,
    Saving,
    Synced,
}

/// In-memory appointment list and settings, persisted through the storage
/// adapter on every mutation. Single execution context, no locking.
pub struct Tracker {
    data_dir: PathBuf,
    appointments: Vec<Appointment>,
    settings: UserSettings,
    state: SyncState,
}

impl Tracker {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            appointments: Vec::new(),
            settings: UserSettings::default(),
            state: SyncState::NotLoaded,
        }
    }

    /// Reads both records. Until this runs, every mutation is rejected so an
    /// empty default can never clobber stored data.
    pub fn load(&mut self) {
        self.appointments = storage::load_appointments(&self.data_dir);
        sort_by_date(&mut self.appointments);
        self.settings = storage::load_settings(&self.data_dir);
        self.state = SyncState::Synced;
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn data_dir(&self) -> &std::path::Path {
        &self.data_dir
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn mark_synced(&mut self) {
        if self.state == SyncState::Saving {
            self.state = SyncState::Synced;
        }
    }

    /// Inserts a new planned appointment and re-sorts the list. The default
    /// frequency comes from the last appointment in sorted order, falling
    /// back to the settings value when the list is empty.
    pub fn add_appointment(&mut self, date_input: &str) -> Result<String, TrackerError> {
        self.ensure_loaded()?;
        if date_input.trim().is_empty() {
            return Err(TrackerError::EmptyDate);
        }
        let date = parse_date(date_input)
            .ok_or_else(|| TrackerError::InvalidDate(date_input.to_string()))?;

        let default_frequency = self
            .appointments
            .last()
            .map(|appointment| appointment.effective_frequency())
            .unwrap_or(self.settings.frequency_days);

        let appointment = Appointment::new(date, default_frequency);
        let id = appointment.id.clone();
        self.appointments.push(appointment);
        sort_by_date(&mut self.appointments);
        self.persist_appointments()?;
        Ok(id)
    }

    /// Flips Planned ⇄ Completed on the matching record.
    pub fn toggle_status(&mut self, id: &str) -> Result<(), TrackerError> {
        self.ensure_loaded()?;
        let appointment = self
            .appointments
            .iter_mut()
            .find(|appointment| appointment.id == id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
        appointment.status = appointment.status.toggled();
        self.persist_appointments()
    }

    /// Sets the recurrence interval from raw user input. Non-numeric or
    /// non-positive input coerces to 28, mirroring the form's behavior.
    pub fn update_frequency(&mut self, id: &str, raw_input: &str) -> Result<i64, TrackerError> {
        self.ensure_loaded()?;
        let days = raw_input
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_FREQUENCY_DAYS);
        let appointment = self
            .appointments
            .iter_mut()
            .find(|appointment| appointment.id == id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
        appointment.frequency_days = Some(days);
        self.persist_appointments()?;
        Ok(days)
    }

    /// Removes the record only after the prompt confirms. Declining leaves
    /// the list untouched.
    pub async fn delete_appointment<P: ConfirmPrompt + ?Sized>(
        &mut self,
        id: &str,
        prompt: &P,
    ) -> Result<bool, TrackerError> {
        self.ensure_loaded()?;
        if !prompt
            .confirm("Are you sure you want to delete this appointment?")
            .await
        {
            return Ok(false);
        }
        let before = self.appointments.len();
        self.appointments.retain(|appointment| appointment.id != id);
        let removed = self.appointments.len() < before;
        if removed {
            self.persist_appointments()?;
        }
        Ok(removed)
    }

    /// Settings mutation path; persists without the saving indicator.
    pub fn set_default_frequency(&mut self, days: i64) -> Result<(), TrackerError> {
        self.ensure_loaded()?;
        self.settings.frequency_days = if days > 0 {
            days
        } else {
            DEFAULT_FREQUENCY_DAYS
        };
        storage::save_settings(&self.data_dir, &self.settings)?;
        Ok(())
    }

    fn ensure_loaded(&self) -> Result<(), TrackerError> {
        if self.state == SyncState::NotLoaded {
            return Err(TrackerError::NotLoaded);
        }
        Ok(())
    }

    fn persist_appointments(&mut self) -> Result<(), TrackerError> {
        storage::save_appointments(&self.data_dir, &self.appointments)?;
        self.state = SyncState::Saving;
        Ok(())
    }
}
