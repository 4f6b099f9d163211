//! Keyboard Warriors Maze Engine
//!
//! Platform-agnostic core for the command-driven maze challenge: grid model,
//! command parsing, movement, session lifecycle, practice/live resolution,
//! elapsed time and once-only score recording. No UI or platform dependencies.

pub mod command;
pub mod config;
pub mod event_mode;
pub mod generator;
pub mod grid;
pub mod movement;
pub mod participant;
pub mod route;
pub mod scores;
pub mod session;
pub mod submission;
pub mod timer;

// Re-export commonly used types
pub use command::{Command, EditorGesture, parse_batch, parse_commit, render_script};
pub use config::{ConfigError, EngineConfig};
pub use event_mode::{
    EventMode, EventModeController, EventState, EventStateSource, ModeResolution, PracticeReason,
    resolve_mode,
};
pub use generator::random_grid;
pub use grid::{CellKind, Grid, GridError, Position};
pub use movement::{MoveOutcome, MoveResult, Trace, apply, trace};
pub use participant::{Participant, ParticipantError, ParticipantId};
pub use route::shortest_route;
pub use scores::{
    DeskError, EventControl, LeaderboardEntry, MemoryScoreStore, ScoreDesk, ScoreRecord,
    ScoreStore, StoreError,
};
pub use session::{InputLock, MazeSession, ReplayTick, ReplayTicket, SessionEvent, SessionState};
pub use submission::{
    GuardError, MAX_ATTEMPTS, ScoreService, ScoreSubmission, SubmissionGuard, SubmissionStatus,
    SubmissionTicket, SubmitResponse,
};
pub use timer::{ElapsedTimer, derive_live_elapsed, format_clock};

/// Main engine wiring event-state resolution to score submission.
pub struct MazeEngine<E, S>
where
    E: EventStateSource,
    S: ScoreService,
{
    modes: EventModeController<E>,
    scores: S,
}

impl<E, S> MazeEngine<E, S>
where
    E: EventStateSource,
    S: ScoreService,
{
    /// Create an engine over the given event-state source and score service
    pub const fn new(events: E, scores: S) -> Self {
        Self {
            modes: EventModeController::new(events),
            scores,
        }
    }

    /// Resolve the mode for `participant` and start a session in it.
    pub fn open_session(&self, participant: &Participant) -> MazeSession {
        MazeSession::from_resolution(self.modes.resolve(&participant.name))
    }

    /// Submit the finish time of a completed live session through `guard`.
    ///
    /// # Errors
    ///
    /// Returns a [`GuardError`] when the session is not a completed live run
    /// or the guard refuses another attempt.
    pub fn submit_completion(
        &self,
        guard: &mut SubmissionGuard,
        participant: &Participant,
        session: &MazeSession,
    ) -> Result<SubmissionStatus, GuardError> {
        let request = SubmissionGuard::request_for(session, participant)?;
        guard.submit(&self.scores, &request)
    }

    pub const fn events(&self) -> &E {
        self.modes.source()
    }

    pub const fn scores(&self) -> &S {
        &self.scores
    }
}
