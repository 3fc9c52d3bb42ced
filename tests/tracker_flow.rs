use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use barberTrack::models::appointment::AppointmentStatus;
use barberTrack::service::confirm_prompt::ConfirmPrompt;
use barberTrack::service::tracker_service::{SyncState, Tracker, TrackerError};

fn temp_data_dir(test_name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("barbertrack_test_{}_{}", test_name, Uuid::new_v4()))
}

fn loaded_tracker(test_name: &str) -> Tracker {
    let mut tracker = Tracker::new(temp_data_dir(test_name));
    tracker.load();
    tracker
}

fn date(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

struct ScriptedConfirm {
    answer: bool,
}

#[async_trait]
impl ConfirmPrompt for ScriptedConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        self.answer
    }
}

#[test]
fn add_keeps_list_sorted_by_date() {
    let mut tracker = loaded_tracker("sorted");
    tracker.add_appointment("2024-03-05T10:00").unwrap();
    tracker.add_appointment("2024-01-10T09:30").unwrap();
    tracker.add_appointment("2024-02-01T15:00").unwrap();

    let dates: Vec<NaiveDateTime> = tracker
        .appointments()
        .iter()
        .map(|appointment| appointment.date)
        .collect();
    assert_eq!(
        dates,
        vec![
            date(2024, 1, 10, 9, 30),
            date(2024, 2, 1, 15, 0),
            date(2024, 3, 5, 10, 0),
        ]
    );
}

#[test]
fn add_rejects_empty_input() {
    let mut tracker = loaded_tracker("empty_input");
    tracker.add_appointment("2024-01-10T10:00").unwrap();

    let result = tracker.add_appointment("");
    assert!(matches!(result, Err(TrackerError::EmptyDate)));
    assert_eq!(tracker.appointments().len(), 1);

    let result = tracker.add_appointment("   ");
    assert!(matches!(result, Err(TrackerError::EmptyDate)));
    assert_eq!(tracker.appointments().len(), 1);
}

#[test]
fn add_rejects_unparsable_dates() {
    let mut tracker = loaded_tracker("bad_date");
    let result = tracker.add_appointment("next tuesday");
    assert!(matches!(result, Err(TrackerError::InvalidDate(_))));
    assert!(tracker.appointments().is_empty());
}

#[test]
fn new_appointment_inherits_frequency_from_last() {
    let mut tracker = loaded_tracker("inherit_frequency");
    let first_id = tracker.add_appointment("2024-01-10T10:00").unwrap();
    // No prior appointments: the settings fallback applies.
    assert_eq!(tracker.appointments()[0].effective_frequency(), 28);

    tracker.update_frequency(&first_id, "35").unwrap();
    tracker.add_appointment("2024-02-20T10:00").unwrap();
    assert_eq!(tracker.appointments()[1].effective_frequency(), 35);
}

#[test]
fn first_appointment_projects_four_weeks_out() {
    let mut tracker = loaded_tracker("projection");
    tracker.add_appointment("2024-01-10T10:00").unwrap();

    let appointment = &tracker.appointments()[0];
    assert_eq!(appointment.projected_next_date(), date(2024, 2, 7, 10, 0));
}

#[test]
fn toggle_is_its_own_inverse() {
    let mut tracker = loaded_tracker("toggle");
    let id = tracker.add_appointment("2024-01-10T10:00").unwrap();
    assert_eq!(tracker.appointments()[0].status, AppointmentStatus::Planned);

    tracker.toggle_status(&id).unwrap();
    assert_eq!(
        tracker.appointments()[0].status,
        AppointmentStatus::Completed
    );

    tracker.toggle_status(&id).unwrap();
    assert_eq!(tracker.appointments()[0].status, AppointmentStatus::Planned);
}

#[test]
fn toggle_unknown_id_leaves_list_untouched() {
    let mut tracker = loaded_tracker("toggle_unknown");
    tracker.add_appointment("2024-01-10T10:00").unwrap();

    let result = tracker.toggle_status("missing-id");
    assert!(matches!(result, Err(TrackerError::NotFound(_))));
    assert_eq!(tracker.appointments()[0].status, AppointmentStatus::Planned);
}

#[test]
fn frequency_coerces_invalid_input_to_default() {
    let mut tracker = loaded_tracker("frequency_coercion");
    let id = tracker.add_appointment("2024-01-10T10:00").unwrap();

    assert_eq!(tracker.update_frequency(&id, "0").unwrap(), 28);
    assert_eq!(tracker.appointments()[0].frequency_days, Some(28));

    assert_eq!(tracker.update_frequency(&id, "abc").unwrap(), 28);
    assert_eq!(tracker.appointments()[0].frequency_days, Some(28));

    assert_eq!(tracker.update_frequency(&id, "14").unwrap(), 14);
    assert_eq!(tracker.appointments()[0].frequency_days, Some(14));
}

#[test]
fn extreme_frequency_survives_persistence_and_projection() {
    let dir = temp_data_dir("extreme_frequency");
    let mut tracker = Tracker::new(dir.clone());
    tracker.load();
    let id = tracker.add_appointment("2024-01-10T10:00").unwrap();
    tracker.update_frequency(&id, "1000000000000000").unwrap();

    // The value is stored as given; rendering it must not abort.
    let appointment = &tracker.appointments()[0];
    assert_eq!(appointment.frequency_days, Some(1_000_000_000_000_000));
    assert_eq!(appointment.projected_next_date(), appointment.date);

    // And the record must still load cleanly on the next run.
    let mut reopened = Tracker::new(dir);
    reopened.load();
    assert_eq!(reopened.appointments()[0].projected_next_date(), appointment.date);
}

#[tokio::test]
async fn declined_delete_changes_nothing() {
    let mut tracker = loaded_tracker("delete_declined");
    let id = tracker.add_appointment("2024-01-10T10:00").unwrap();

    let removed = tracker
        .delete_appointment(&id, &ScriptedConfirm { answer: false })
        .await
        .unwrap();
    assert!(!removed);
    assert_eq!(tracker.appointments().len(), 1);
}

#[tokio::test]
async fn confirmed_delete_removes_exactly_the_matching_id() {
    let mut tracker = loaded_tracker("delete_confirmed");
    let keep_id = tracker.add_appointment("2024-01-10T10:00").unwrap();
    let drop_id = tracker.add_appointment("2024-02-10T10:00").unwrap();

    let removed = tracker
        .delete_appointment(&drop_id, &ScriptedConfirm { answer: true })
        .await
        .unwrap();
    assert!(removed);
    assert_eq!(tracker.appointments().len(), 1);
    assert_eq!(tracker.appointments()[0].id, keep_id);
}

#[test]
fn mutations_before_load_are_rejected() {
    let dir = temp_data_dir("load_guard");
    let mut tracker = Tracker::new(dir.clone());
    assert_eq!(tracker.state(), SyncState::NotLoaded);

    let result = tracker.add_appointment("2024-01-10T10:00");
    assert!(matches!(result, Err(TrackerError::NotLoaded)));
    // Nothing may touch the store before load.
    assert!(!dir.join("appointments.json").exists());
}

#[test]
fn save_indicator_state_round_trips() {
    let mut tracker = loaded_tracker("sync_state");
    assert_eq!(tracker.state(), SyncState::Synced);

    tracker.add_appointment("2024-01-10T10:00").unwrap();
    assert_eq!(tracker.state(), SyncState::Saving);

    tracker.mark_synced();
    assert_eq!(tracker.state(), SyncState::Synced);
}

#[test]
fn state_survives_reload_from_disk() {
    let dir = temp_data_dir("reload");
    let mut tracker = Tracker::new(dir.clone());
    tracker.load();
    let id = tracker.add_appointment("2024-01-10T10:00").unwrap();
    tracker.toggle_status(&id).unwrap();
    tracker.set_default_frequency(21).unwrap();

    let mut reopened = Tracker::new(dir);
    reopened.load();
    assert_eq!(reopened.appointments(), tracker.appointments());
    assert_eq!(reopened.settings().frequency_days, 21);
}
