//! Session engine: position, replay scheduling and one-time completion.
//!
//! Replays are time-sliced. [`MazeSession::start_replay`] queues the parsed
//! commands under a fresh generation number and the caller's scheduler feeds
//! them back one at a time through [`MazeSession::replay_tick`]. Starting a
//! new replay (or committing a single step) clears the queue and bumps the
//! generation, so ticks scheduled for an older replay become no-ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::command::{Command, parse_batch, parse_commit};
use crate::event_mode::{EventMode, ModeResolution};
use crate::grid::{Grid, Position};
use crate::movement::{MoveOutcome, MoveResult, apply};
use crate::timer::ElapsedTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Initializing,
    PracticeActive,
    LiveActive,
    Completed,
}

impl SessionState {
    #[must_use]
    pub const fn accepts_commands(self) -> bool {
        matches!(self, Self::PracticeActive | Self::LiveActive)
    }
}

/// Notifications for the UI, drained with [`MazeSession::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Position jumped back to the start ahead of a replay.
    Reset { position: Position },
    Moved {
        command: Command,
        position: Position,
    },
    /// Transient collision signal; nothing else changes.
    Blocked {
        command: Command,
        position: Position,
    },
    /// Fired exactly once, on the first arrival at the goal.
    Completed { mode: EventMode, elapsed_secs: u64 },
}

/// Editor capability derived from session state, applied by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLock {
    pub editor_enabled: bool,
    /// Copy, paste and text selection are suppressed during a live event.
    pub clipboard_blocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayTicket {
    pub generation: u64,
    pub steps: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayTick {
    Step(MoveResult),
    /// Nothing left to apply for this generation.
    Finished,
    /// A newer replay or step replaced this one; drop the schedule.
    Superseded,
}

#[derive(Debug, Clone, Default)]
struct ReplayQueue {
    generation: u64,
    pending: VecDeque<Command>,
}

impl ReplayQueue {
    fn install(&mut self, commands: Vec<Command>) -> ReplayTicket {
        self.generation = self.generation.wrapping_add(1);
        self.pending = commands.into();
        ReplayTicket {
            generation: self.generation,
            steps: self.pending.len(),
        }
    }

    fn cancel(&mut self) {
        if !self.pending.is_empty() {
            log::debug!(
                "replay generation {} superseded with {} steps pending",
                self.generation,
                self.pending.len()
            );
        }
        self.generation = self.generation.wrapping_add(1);
        self.pending.clear();
    }
}

#[derive(Debug, Clone)]
struct Board {
    grid: Grid,
    position: Position,
}

#[derive(Debug, Clone)]
pub struct MazeSession {
    state: SessionState,
    mode: Option<EventMode>,
    board: Option<Board>,
    timer: ElapsedTimer,
    replay: ReplayQueue,
    events: Vec<SessionEvent>,
    finish_secs: Option<u64>,
}

impl Default for MazeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MazeSession {
    /// A session waiting for mode resolution.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SessionState::Initializing,
            mode: None,
            board: None,
            timer: ElapsedTimer::practice(),
            replay: ReplayQueue::default(),
            events: Vec::new(),
            finish_secs: None,
        }
    }

    /// Build a session and immediately apply a resolution.
    #[must_use]
    pub fn from_resolution(resolution: ModeResolution) -> Self {
        let mut session = Self::new();
        session.apply_resolution(resolution);
        session
    }

    /// Leave `Initializing`. Later resolutions are ignored.
    pub fn apply_resolution(&mut self, resolution: ModeResolution) -> SessionState {
        if self.state != SessionState::Initializing {
            log::warn!("ignoring mode resolution for a session already in {:?}", self.state);
            return self.state;
        }
        self.mode = Some(resolution.mode());
        match resolution {
            ModeResolution::AlreadyCompleted => {
                self.state = SessionState::Completed;
            }
            ModeResolution::Live { start_time, grid } => {
                self.timer = ElapsedTimer::live(start_time);
                self.install_board(grid);
                self.state = SessionState::LiveActive;
            }
            ModeResolution::Practice { grid, .. } => {
                self.timer = ElapsedTimer::practice();
                self.install_board(grid);
                self.state = SessionState::PracticeActive;
            }
        }
        self.state
    }

    fn install_board(&mut self, grid: Grid) {
        let position = grid.start();
        self.board = Some(Board { grid, position });
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn mode(&self) -> Option<EventMode> {
        self.mode
    }

    #[must_use]
    pub fn grid(&self) -> Option<&Grid> {
        self.board.as_ref().map(|board| &board.grid)
    }

    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.board.as_ref().map(|board| board.position)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Elapsed seconds frozen at the goal arrival, if this session reached it.
    #[must_use]
    pub const fn finish_secs(&self) -> Option<u64> {
        self.finish_secs
    }

    #[must_use]
    pub fn input_lock(&self) -> InputLock {
        InputLock {
            editor_enabled: self.state.accepts_commands(),
            clipboard_blocked: self.state == SessionState::LiveActive,
        }
    }

    /// Whether a replay still has queued steps.
    #[must_use]
    pub fn replay_pending(&self) -> bool {
        !self.replay.pending.is_empty()
    }

    /// Step mode: apply the last buffer line to the live position.
    ///
    /// Returns `None` when the session is not accepting input or the line is
    /// not a command. Any replay still in flight is cancelled first.
    pub fn commit_line(&mut self, buffer: &str, now: DateTime<Utc>) -> Option<MoveResult> {
        if !self.state.accepts_commands() {
            return None;
        }
        let command = parse_commit(buffer)?;
        self.replay.cancel();
        self.advance(command, now)
    }

    /// Batch mode: reset to start and queue every command in the buffer.
    ///
    /// Returns `None` when the session is not accepting input.
    pub fn start_replay(&mut self, buffer: &str) -> Option<ReplayTicket> {
        if !self.state.accepts_commands() {
            return None;
        }
        let board = self.board.as_mut()?;
        let ticket = self.replay.install(parse_batch(buffer));
        board.position = board.grid.start();
        self.events.push(SessionEvent::Reset {
            position: board.position,
        });
        Some(ticket)
    }

    /// Apply the next queued command for `generation`.
    pub fn replay_tick(&mut self, generation: u64, now: DateTime<Utc>) -> ReplayTick {
        if generation != self.replay.generation {
            return ReplayTick::Superseded;
        }
        if !self.state.accepts_commands() {
            self.replay.pending.clear();
            return ReplayTick::Finished;
        }
        let Some(command) = self.replay.pending.pop_front() else {
            return ReplayTick::Finished;
        };
        self.advance(command, now)
            .map_or(ReplayTick::Finished, ReplayTick::Step)
    }

    /// Drive a replay to completion without delays.
    pub fn run_replay(&mut self, ticket: ReplayTicket, now: DateTime<Utc>) -> Vec<MoveResult> {
        let mut steps = Vec::with_capacity(ticket.steps);
        while let ReplayTick::Step(result) = self.replay_tick(ticket.generation, now) {
            steps.push(result);
        }
        steps
    }

    /// Scheduler tick for the clock; returns the value to display.
    pub fn tick(&mut self, now: DateTime<Utc>) -> u64 {
        match self.state {
            SessionState::Initializing => 0,
            SessionState::Completed => self.finish_secs.unwrap_or(0),
            SessionState::PracticeActive | SessionState::LiveActive => self.timer.tick(now),
        }
    }

    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.state {
            SessionState::Initializing => 0,
            SessionState::Completed => self.finish_secs.unwrap_or(0),
            SessionState::PracticeActive | SessionState::LiveActive => {
                self.timer.elapsed_secs(now)
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn advance(&mut self, command: Command, now: DateTime<Utc>) -> Option<MoveResult> {
        let board = self.board.as_mut()?;
        let result = apply(board.position, command, &board.grid);
        board.position = result.position;
        match result.outcome {
            MoveOutcome::Blocked => self.events.push(SessionEvent::Blocked {
                command,
                position: result.position,
            }),
            MoveOutcome::Moved => self.events.push(SessionEvent::Moved {
                command,
                position: result.position,
            }),
            MoveOutcome::ReachedGoal => {
                self.events.push(SessionEvent::Moved {
                    command,
                    position: result.position,
                });
                self.complete(now);
            }
        }
        Some(result)
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        if self.state == SessionState::Completed {
            return;
        }
        let elapsed_secs = self.timer.freeze(now);
        let mode = self.mode.unwrap_or(EventMode::Practice);
        self.state = SessionState::Completed;
        self.finish_secs = Some(elapsed_secs);
        self.replay.pending.clear();
        log::info!("maze completed in {mode:?} mode after {elapsed_secs}s");
        self.events
            .push(SessionEvent::Completed { mode, elapsed_secs });
    }
}
