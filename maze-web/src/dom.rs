//! Browser helpers: wall clock and participant storage.
use chrono::{DateTime, Utc};
use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use maze_game::Participant;

/// Local storage key holding the registered participant.
pub const PARTICIPANT_KEY: &str = "playerInfo";

/// Current wall-clock instant.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    #[cfg(target_arch = "wasm32")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let millis = js_sys::Date::now() as i64;
        DateTime::from_timestamp_millis(millis).unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Utc::now()
    }
}

/// Participant saved by the registration form, if any.
#[must_use]
pub fn load_participant() -> Option<Participant> {
    match LocalStorage::get::<Participant>(PARTICIPANT_KEY) {
        Ok(stored) => Some(Participant::new(stored.name, stored.contact)),
        Err(StorageError::KeyNotFound(_)) => None,
        Err(err) => {
            log::warn!("discarding unreadable participant record: {err}");
            None
        }
    }
}

/// Persist the participant for later page loads.
///
/// # Errors
///
/// Returns the storage error when local storage is unavailable or full.
pub fn save_participant(participant: &Participant) -> Result<(), StorageError> {
    LocalStorage::set(PARTICIPANT_KEY, participant)
}
