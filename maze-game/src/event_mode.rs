//! Practice-versus-live resolution.
//!
//! One lookup per session start decides which maze is played and how time
//! is measured. Any failure degrades to practice mode; nothing here is fatal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::grid::Grid;
use crate::participant::ParticipantId;

/// Event-state resolution response as served over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventState {
    pub is_event_live: bool,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub maze: Option<Grid>,
    #[serde(default)]
    pub has_completed: bool,
}

impl EventState {
    #[must_use]
    pub const fn practice() -> Self {
        Self {
            is_event_live: false,
            start_time: None,
            maze: None,
            has_completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventMode {
    Practice,
    Live,
}

/// Why a session ended up in practice mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeReason {
    EventNotLive,
    LookupFailed,
    /// The source claimed a live event but omitted the start time or maze.
    IncompleteLiveState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeResolution {
    /// The participant already has a recorded finish; show the terminal view only.
    AlreadyCompleted,
    Live {
        start_time: DateTime<Utc>,
        grid: Grid,
    },
    Practice {
        grid: Grid,
        reason: PracticeReason,
    },
}

impl ModeResolution {
    #[must_use]
    pub const fn mode(&self) -> EventMode {
        match self {
            Self::AlreadyCompleted | Self::Live { .. } => EventMode::Live,
            Self::Practice { .. } => EventMode::Practice,
        }
    }

    fn practice(reason: PracticeReason) -> Self {
        Self::Practice {
            grid: Grid::practice(),
            reason,
        }
    }
}

/// Apply the decision table to a lookup result.
pub fn resolve_mode<E: Display>(lookup: Result<EventState, E>) -> ModeResolution {
    let state = match lookup {
        Ok(state) => state,
        Err(err) => {
            log::warn!("event-state lookup failed, falling back to practice: {err}");
            return ModeResolution::practice(PracticeReason::LookupFailed);
        }
    };

    if state.has_completed {
        log::info!("participant already completed the live event");
        return ModeResolution::AlreadyCompleted;
    }
    if !state.is_event_live {
        return ModeResolution::practice(PracticeReason::EventNotLive);
    }

    match (state.start_time, state.maze) {
        (Some(start_time), Some(grid)) => {
            log::info!("live event running since {start_time}");
            ModeResolution::Live { start_time, grid }
        }
        (start_time, maze) => {
            log::warn!(
                "live event state incomplete (start time present: {}, maze present: {}), using practice maze",
                start_time.is_some(),
                maze.is_some()
            );
            ModeResolution::practice(PracticeReason::IncompleteLiveState)
        }
    }
}

/// Source of event-state for a participant.
/// Platform-specific implementations should provide this.
pub trait EventStateSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Look up the event state as seen by `participant`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup cannot be completed.
    fn fetch_event_state(&self, participant: &ParticipantId) -> Result<EventState, Self::Error>;
}

impl<T: EventStateSource + ?Sized> EventStateSource for &T {
    type Error = T::Error;

    fn fetch_event_state(&self, participant: &ParticipantId) -> Result<EventState, Self::Error> {
        (**self).fetch_event_state(participant)
    }
}

/// Resolves the mode for each new session using a single lookup.
pub struct EventModeController<S: EventStateSource> {
    source: S,
}

impl<S: EventStateSource> EventModeController<S> {
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    pub fn resolve(&self, participant: &ParticipantId) -> ModeResolution {
        resolve_mode(self.source.fetch_event_state(participant))
    }

    pub const fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn live_maze() -> Grid {
        Grid::from_json(r#"[["S",0],[1,"E"]]"#).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn completed_short_circuits() {
        let state = EventState {
            is_event_live: true,
            start_time: Some(now()),
            maze: Some(live_maze()),
            has_completed: true,
        };
        assert_eq!(
            resolve_mode::<String>(Ok(state)),
            ModeResolution::AlreadyCompleted
        );
    }

    #[test]
    fn live_uses_supplied_maze_and_start() {
        let start = now() - TimeDelta::seconds(5);
        let state = EventState {
            is_event_live: true,
            start_time: Some(start),
            maze: Some(live_maze()),
            has_completed: false,
        };
        let resolution = resolve_mode::<String>(Ok(state));
        assert_eq!(resolution.mode(), EventMode::Live);
        assert_eq!(
            resolution,
            ModeResolution::Live {
                start_time: start,
                grid: live_maze()
            }
        );
    }

    #[test]
    fn not_live_uses_practice_maze() {
        let resolution = resolve_mode::<String>(Ok(EventState::practice()));
        assert_eq!(
            resolution,
            ModeResolution::Practice {
                grid: Grid::practice(),
                reason: PracticeReason::EventNotLive
            }
        );
    }

    #[test]
    fn failures_degrade_to_practice() {
        let resolution = resolve_mode(Err("connection refused"));
        assert!(matches!(
            resolution,
            ModeResolution::Practice {
                reason: PracticeReason::LookupFailed,
                ..
            }
        ));
    }

    #[test]
    fn live_without_maze_degrades() {
        let state = EventState {
            is_event_live: true,
            start_time: Some(now()),
            maze: None,
            has_completed: false,
        };
        assert!(matches!(
            resolve_mode::<String>(Ok(state)),
            ModeResolution::Practice {
                reason: PracticeReason::IncompleteLiveState,
                ..
            }
        ));
    }

    #[test]
    fn wire_format_uses_camel_case() {
        let json = r#"{
            "isEventLive": true,
            "startTime": "2024-03-01T10:00:00Z",
            "maze": [["S", 0, "E"]],
            "hasCompleted": false
        }"#;
        let state: EventState = serde_json::from_str(json).unwrap();
        assert!(state.is_event_live);
        assert_eq!(state.maze.unwrap().cols(), 3);
        assert!(state.start_time.is_some());

        let minimal: EventState =
            serde_json::from_str(r#"{"isEventLive": false, "startTime": null}"#).unwrap();
        assert_eq!(minimal, EventState::practice());
    }
}
