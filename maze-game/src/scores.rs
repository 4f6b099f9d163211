//! Server half of once-only scoring: storage contract, in-memory store,
//! the submission desk and the leaderboard read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

use crate::event_mode::{EventState, EventStateSource};
use crate::grid::Grid;
use crate::participant::ParticipantId;
use crate::submission::{ScoreService, ScoreSubmission, SubmitResponse};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record for this identity already exists.
    #[error("duplicate score for {0}")]
    UniqueViolation(String),
    #[error("score store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub player_name: ParticipantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    pub finish_time_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub finish_time_seconds: u64,
}

/// Persistent score storage with a unique constraint on identity.
pub trait ScoreStore {
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the backend cannot be read.
    fn contains(&self, identity: &ParticipantId) -> Result<bool, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] when a record already exists.
    fn insert(&self, record: ScoreRecord) -> Result<(), StoreError>;

    /// Fastest `limit` records, ties kept in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the backend cannot be read.
    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StoreError>;
}

impl<T: ScoreStore + ?Sized> ScoreStore for &T {
    fn contains(&self, identity: &ParticipantId) -> Result<bool, StoreError> {
        (**self).contains(identity)
    }

    fn insert(&self, record: ScoreRecord) -> Result<(), StoreError> {
        (**self).insert(record)
    }

    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        (**self).top(limit)
    }
}

#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    records: Mutex<Vec<ScoreRecord>>,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<ScoreRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("score table lock poisoned".into()))
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    /// Records stored for one identity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the lock is poisoned.
    pub fn count_for(&self, identity: &ParticipantId) -> Result<usize, StoreError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|r| &r.player_name == identity)
            .count())
    }
}

impl ScoreStore for MemoryScoreStore {
    fn contains(&self, identity: &ParticipantId) -> Result<bool, StoreError> {
        Ok(self.lock()?.iter().any(|r| &r.player_name == identity))
    }

    fn insert(&self, record: ScoreRecord) -> Result<(), StoreError> {
        let mut records = self.lock()?;
        if records.iter().any(|r| r.player_name == record.player_name) {
            return Err(StoreError::UniqueViolation(record.player_name.to_string()));
        }
        records.push(record);
        Ok(())
    }

    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        let mut ranked = self.lock()?.clone();
        ranked.sort_by_key(|r| r.finish_time_seconds);
        ranked.truncate(limit);
        Ok(ranked)
    }
}

/// Event administration row: whether the timed event is running, since
/// when, and on which maze.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventControl {
    pub is_live: bool,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub maze: Option<Grid>,
}

impl EventControl {
    #[must_use]
    pub const fn live(start_time: DateTime<Utc>, maze: Grid) -> Self {
        Self {
            is_live: true,
            start_time: Some(start_time),
            maze: Some(maze),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeskError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-request handlers over a shared [`ScoreStore`].
pub struct ScoreDesk<S: ScoreStore> {
    store: S,
    event: Mutex<EventControl>,
    leaderboard_limit: usize,
}

impl<S: ScoreStore> ScoreDesk<S> {
    pub fn new(store: S, event: EventControl, leaderboard_limit: usize) -> Self {
        Self {
            store,
            event: Mutex::new(event),
            leaderboard_limit,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Replace the event administration row.
    pub fn set_event_control(&self, event: EventControl) {
        match self.event.lock() {
            Ok(mut slot) => *slot = event,
            Err(poisoned) => *poisoned.into_inner() = event,
        }
    }

    fn event_control(&self) -> EventControl {
        match self.event.lock() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Record a finish time unless the identity already has one.
    pub fn submit(&self, request: &ScoreSubmission) -> SubmitResponse {
        let identity = match request.identity() {
            Ok(identity) => identity,
            Err(err) => {
                return SubmitResponse::Invalid {
                    reason: err.to_string(),
                };
            }
        };

        match self.store.contains(&identity) {
            Ok(true) => {
                log::info!("rejecting repeat submission for {identity}");
                return SubmitResponse::Duplicate;
            }
            Ok(false) => {}
            Err(err) => {
                return SubmitResponse::Failed {
                    reason: err.to_string(),
                };
            }
        }

        let record = ScoreRecord {
            player_name: identity.clone(),
            contact_number: request.contact_number.clone(),
            finish_time_seconds: request.time,
        };
        match self.store.insert(record) {
            Ok(()) => {
                log::info!("recorded {identity} at {}s", request.time);
                SubmitResponse::Recorded
            }
            Err(StoreError::UniqueViolation(_)) => {
                log::info!("unique constraint rejected concurrent submission for {identity}");
                SubmitResponse::Duplicate
            }
            Err(err) => SubmitResponse::Failed {
                reason: err.to_string(),
            },
        }
    }

    /// Event-state resolution response for an identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be queried.
    pub fn event_state(&self, identity: &ParticipantId) -> Result<EventState, DeskError> {
        let has_completed = self.store.contains(identity)?;
        let event = self.event_control();
        if !event.is_live {
            return Ok(EventState {
                has_completed,
                ..EventState::practice()
            });
        }
        Ok(EventState {
            is_event_live: true,
            start_time: event.start_time,
            maze: event.maze,
            has_completed,
        })
    }

    /// Fastest finishers, bounded by the configured limit.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be queried.
    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, DeskError> {
        Ok(self
            .store
            .top(self.leaderboard_limit)?
            .into_iter()
            .map(|r| LeaderboardEntry {
                player_name: r.player_name.to_string(),
                finish_time_seconds: r.finish_time_seconds,
            })
            .collect())
    }
}

impl<S: ScoreStore> ScoreService for ScoreDesk<S> {
    fn submit_score(&self, request: &ScoreSubmission) -> SubmitResponse {
        self.submit(request)
    }
}

impl<S: ScoreStore> EventStateSource for ScoreDesk<S> {
    type Error = DeskError;

    fn fetch_event_state(&self, participant: &ParticipantId) -> Result<EventState, Self::Error> {
        self.event_state(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desk() -> ScoreDesk<MemoryScoreStore> {
        ScoreDesk::new(MemoryScoreStore::new(), EventControl::default(), 3)
    }

    fn submission(name: &str, time: u64) -> ScoreSubmission {
        ScoreSubmission {
            player_name: name.into(),
            contact_number: None,
            time,
        }
    }

    fn id(name: &str) -> ParticipantId {
        ParticipantId::new(name).unwrap()
    }

    #[test]
    fn second_submission_is_duplicate() {
        let desk = desk();
        assert_eq!(desk.submit(&submission("A", 30)), SubmitResponse::Recorded);
        assert_eq!(desk.submit(&submission("A", 10)), SubmitResponse::Duplicate);
        assert_eq!(desk.store().count_for(&id("A")).unwrap(), 1);
    }

    #[test]
    fn blank_identity_is_invalid() {
        let desk = desk();
        assert!(matches!(
            desk.submit(&submission("  ", 5)),
            SubmitResponse::Invalid { .. }
        ));
        assert!(desk.store().is_empty().unwrap());
    }

    #[test]
    fn zero_seconds_is_accepted() {
        let desk = desk();
        assert_eq!(desk.submit(&submission("fast", 0)), SubmitResponse::Recorded);
    }

    #[test]
    fn store_enforces_uniqueness_directly() {
        let store = MemoryScoreStore::new();
        let record = ScoreRecord {
            player_name: id("A"),
            contact_number: None,
            finish_time_seconds: 1,
        };
        store.insert(record.clone()).unwrap();
        assert_eq!(
            store.insert(record),
            Err(StoreError::UniqueViolation("A".into()))
        );
    }

    #[test]
    fn leaderboard_is_ascending_and_bounded() {
        let desk = desk();
        for (name, time) in [("d", 90), ("a", 40), ("b", 40), ("c", 12)] {
            desk.submit(&submission(name, time));
        }
        let names: Vec<_> = desk
            .leaderboard()
            .unwrap()
            .into_iter()
            .map(|e| e.player_name)
            .collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn event_state_reflects_control_and_history() {
        let desk = desk();
        let state = desk.event_state(&id("A")).unwrap();
        assert_eq!(state, EventState::practice());

        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        desk.set_event_control(EventControl::live(start, Grid::practice()));
        desk.submit(&submission("A", 12));

        let a = desk.fetch_event_state(&id("A")).unwrap();
        assert!(a.is_event_live && a.has_completed);
        let b = desk.fetch_event_state(&id("B")).unwrap();
        assert!(!b.has_completed);
        assert_eq!(b.start_time, Some(start));
        assert_eq!(b.maze, Some(Grid::practice()));
    }
}
