use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::sync::{Arc, Barrier};
use std::thread;

use maze_game::{
    CellKind, Command, EventControl, EventMode, Grid, MazeEngine, MazeSession, MemoryScoreStore,
    ModeResolution, MoveOutcome, Participant, ParticipantId, Position, PracticeReason,
    ReplayTick, ScoreDesk, ScoreRecord, ScoreStore, ScoreSubmission, SessionEvent, StoreError,
    SubmissionGuard, SubmitResponse, apply, random_grid, render_script, shortest_route,
};

/// What a plan exercises against the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDriver {
    /// Solve the configured maze in both step and batch mode.
    Walkthrough,
    /// Random scripts over seeded random mazes.
    RandomReplay {
        rows: usize,
        cols: usize,
        wall_pct: u8,
        script_len: usize,
    },
    /// Live session whose event started `offset_secs` ago.
    LiveTimer { offset_secs: i64 },
    /// Two client sessions for one identity submitting in turn.
    DuplicateSubmission,
    /// Several threads racing one identity past the existence check.
    SubmissionRace { racers: usize },
    /// Restart a batch replay while the previous one is still stepping.
    ReplaySupersede,
}

impl PlanDriver {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Walkthrough => "walkthrough",
            Self::RandomReplay { .. } => "random-replay",
            Self::LiveTimer { .. } => "live-timer",
            Self::DuplicateSubmission => "duplicate-submission",
            Self::SubmissionRace { .. } => "submission-race",
            Self::ReplaySupersede => "replay-supersede",
        }
    }
}

/// Assertion hook run after a plan completes.
type RunExpectationFn = Arc<dyn Fn(&RunSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct RunExpectation(RunExpectationFn);

impl std::fmt::Debug for RunExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunExpectation").finish()
    }
}

impl RunExpectation {
    pub fn evaluate(&self, summary: &RunSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for RunExpectation
where
    F: Fn(&RunSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

#[derive(Debug, Clone)]
pub struct RunPlan {
    pub driver: PlanDriver,
    pub expectations: Vec<RunExpectation>,
}

impl RunPlan {
    #[must_use]
    pub const fn new(driver: PlanDriver) -> Self {
        Self {
            driver,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<RunExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Everything a plan observed, for expectations and failure messages.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub seed: u64,
    pub driver: &'static str,
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub mode: Option<EventMode>,
    pub final_position: Option<Position>,
    pub goal: Option<Position>,
    pub completed: bool,
    pub completion_events: usize,
    pub steps_applied: usize,
    pub blocked_moves: usize,
    /// Whether step mode and batch replay ended on the same cell.
    pub modes_agree: Option<bool>,
    /// Blocked-move invariant breaches found by the exhaustive scan.
    pub invariant_violations: usize,
    pub moves_after_completion: usize,
    pub elapsed_secs: Option<u64>,
    pub elapsed_repeat_secs: Option<u64>,
    pub expected_elapsed_secs: Option<u64>,
    pub finish_secs: Option<u64>,
    pub responses: Vec<SubmitResponse>,
    pub stored_records: usize,
    pub superseded_ticks: usize,
}

#[derive(Debug, Clone)]
pub struct MazeRunner {
    maze: Grid,
    verbose: bool,
}

impl MazeRunner {
    #[must_use]
    pub const fn new(maze: Grid, verbose: bool) -> Self {
        Self { maze, verbose }
    }

    #[must_use]
    pub const fn maze(&self) -> &Grid {
        &self.maze
    }

    /// Execute `plan` for one seed.
    ///
    /// # Errors
    ///
    /// Returns an error when the plan cannot be set up, such as an
    /// unsolvable maze or a failed random grid.
    pub fn run_plan(&self, plan: &RunPlan, seed: u64) -> Result<RunSummary> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let now = Utc::now();
        let mut summary = match plan.driver {
            PlanDriver::Walkthrough => self.walkthrough(&mut rng, now)?,
            PlanDriver::RandomReplay {
                rows,
                cols,
                wall_pct,
                script_len,
            } => random_replay(&mut rng, rows, cols, wall_pct, script_len, now)?,
            PlanDriver::LiveTimer { offset_secs } => self.live_timer(offset_secs, now)?,
            PlanDriver::DuplicateSubmission => self.duplicate_submission(now)?,
            PlanDriver::SubmissionRace { racers } => submission_race(racers)?,
            PlanDriver::ReplaySupersede => self.replay_supersede(&mut rng, now)?,
        };
        summary.seed = seed;
        summary.driver = plan.driver.label();
        if self.verbose {
            log::debug!("{} seed {seed}: {summary:?}", summary.driver);
        }
        Ok(summary)
    }

    fn route(&self) -> Result<Vec<Command>> {
        shortest_route(&self.maze).context("configured maze has no route from S to E")
    }

    fn walkthrough(&self, rng: &mut ChaCha20Rng, now: DateTime<Utc>) -> Result<RunSummary> {
        let route = self.route()?;
        let mut lines: Vec<String> = Vec::with_capacity(route.len() * 2);
        for command in &route {
            if rng.gen_bool(0.25) {
                lines.push(noise_line(rng));
            }
            lines.push(command.to_string());
        }
        let buffer = lines.join("\n");

        let mut stepped = practice_session(&self.maze);
        let mut typed = String::new();
        for line in &lines {
            typed.push_str(line);
            stepped.commit_line(&typed, now);
            typed.push('\n');
        }

        let mut batched = practice_session(&self.maze);
        let ticket = batched
            .start_replay(&buffer)
            .context("practice session refused a replay")?;
        let steps = batched.run_replay(ticket, now);

        let mut summary = board_summary(&self.maze);
        summary.modes_agree = Some(stepped.position() == batched.position());
        summary.steps_applied = steps.len();
        summary.blocked_moves = count_blocked(&steps);
        summary.moves_after_completion = probe_terminality(&mut batched, now);
        finish_summary(&mut summary, &mut batched);
        Ok(summary)
    }

    fn live_timer(&self, offset_secs: i64, now: DateTime<Utc>) -> Result<RunSummary> {
        let start = now - TimeDelta::seconds(offset_secs);
        let desk = ScoreDesk::new(
            MemoryScoreStore::new(),
            EventControl::live(start, self.maze.clone()),
            20,
        );
        let engine = MazeEngine::new(&desk, &desk);
        let participant = participant("live-runner")?;
        let mut session = engine.open_session(&participant);

        let mut summary = board_summary(&self.maze);
        summary.expected_elapsed_secs = Some(u64::try_from(offset_secs).unwrap_or(0));
        summary.elapsed_secs = Some(session.tick(now));
        summary.elapsed_repeat_secs = Some(session.tick(now));

        let ticket = session
            .start_replay(&render_script(&self.route()?))
            .context("live session refused a replay")?;
        let steps = session.run_replay(ticket, now);
        summary.steps_applied = steps.len();
        finish_summary(&mut summary, &mut session);

        let mut guard = SubmissionGuard::new();
        if let Ok(status) = engine.submit_completion(&mut guard, &participant, &session) {
            log::info!("live submission status: {status:?}");
        }
        summary.stored_records = desk.store().len()?;
        Ok(summary)
    }

    fn duplicate_submission(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        let desk = ScoreDesk::new(
            MemoryScoreStore::new(),
            EventControl::live(now, self.maze.clone()),
            20,
        );
        let participant = participant("A")?;
        let route = render_script(&self.route()?);
        let mut summary = board_summary(&self.maze);

        // Two tabs: each completes its own session and submits once.
        for tab in 0..2_i64 {
            let mut session = MazeSession::from_resolution(ModeResolution::Live {
                start_time: now,
                grid: self.maze.clone(),
            });
            let ticket = session
                .start_replay(&route)
                .context("live session refused a replay")?;
            session.run_replay(ticket, now + TimeDelta::seconds(30 + tab));
            let request = SubmissionGuard::request_for(&session, &participant)?;
            summary.responses.push(desk.submit(&request));
            summary.mode = session.mode();
        }
        summary.stored_records = desk.store().count_for(&participant.name)?;
        Ok(summary)
    }

    fn replay_supersede(&self, rng: &mut ChaCha20Rng, now: DateTime<Utc>) -> Result<RunSummary> {
        let route = self.route()?;
        let script = render_script(&route);
        let mut session = practice_session(&self.maze);

        let first = session
            .start_replay(&script)
            .context("practice session refused a replay")?;
        let head_start = rng.gen_range(0..route.len().max(1));
        for _ in 0..head_start {
            session.replay_tick(first.generation, now);
        }
        let second = session
            .start_replay(&script)
            .context("practice session refused a replay")?;

        let mut summary = board_summary(&self.maze);
        let mut steps = Vec::new();
        loop {
            if session.replay_tick(first.generation, now) == ReplayTick::Superseded {
                summary.superseded_ticks += 1;
            }
            match session.replay_tick(second.generation, now) {
                ReplayTick::Step(result) => steps.push(result),
                ReplayTick::Finished | ReplayTick::Superseded => break,
            }
        }
        summary.steps_applied = steps.len();
        summary.blocked_moves = count_blocked(&steps);
        finish_summary(&mut summary, &mut session);
        Ok(summary)
    }
}

fn random_replay(
    rng: &mut ChaCha20Rng,
    rows: usize,
    cols: usize,
    wall_pct: u8,
    script_len: usize,
    now: DateTime<Utc>,
) -> Result<RunSummary> {
    let grid = random_grid(rng, rows, cols, wall_pct)?;
    let script: Vec<Command> = (0..script_len)
        .map(|_| Command::ALL[rng.gen_range(0..Command::ALL.len())])
        .collect();

    let mut stepped = practice_session(&grid);
    for command in &script {
        stepped.commit_line(&command.to_string(), now);
    }

    let mut batched = practice_session(&grid);
    let ticket = batched
        .start_replay(&render_script(&script))
        .context("practice session refused a replay")?;
    let steps = batched.run_replay(ticket, now);

    let mut summary = board_summary(&grid);
    summary.modes_agree = Some(stepped.position() == batched.position());
    summary.invariant_violations = scan_blocked_invariant(&grid);
    summary.steps_applied = steps.len();
    summary.blocked_moves = count_blocked(&steps);
    finish_summary(&mut summary, &mut batched);
    summary.moves_after_completion = probe_terminality(&mut batched, now);
    Ok(summary)
}

/// Holds every racer at the existence check until all have arrived.
struct LockstepStore {
    inner: MemoryScoreStore,
    gate: Barrier,
}

impl ScoreStore for LockstepStore {
    fn contains(&self, identity: &ParticipantId) -> Result<bool, StoreError> {
        let seen = self.inner.contains(identity);
        self.gate.wait();
        seen
    }

    fn insert(&self, record: ScoreRecord) -> Result<(), StoreError> {
        self.inner.insert(record)
    }

    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        self.inner.top(limit)
    }
}

fn submission_race(racers: usize) -> Result<RunSummary> {
    let racers = racers.max(2);
    let desk = ScoreDesk::new(
        LockstepStore {
            inner: MemoryScoreStore::new(),
            gate: Barrier::new(racers),
        },
        EventControl::default(),
        20,
    );
    let responses = thread::scope(|scope| {
        let handles: Vec<_> = (0..racers)
            .map(|n| {
                let desk = &desk;
                scope.spawn(move || {
                    desk.submit(&ScoreSubmission {
                        player_name: "racer".into(),
                        contact_number: None,
                        time: 60 + u64::try_from(n).unwrap_or(0),
                    })
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| {
                h.join().unwrap_or_else(|_| SubmitResponse::Failed {
                    reason: "racer thread panicked".into(),
                })
            })
            .collect::<Vec<_>>()
    });
    let identity = participant("racer")?.name;
    Ok(RunSummary {
        responses,
        stored_records: desk.store().inner.count_for(&identity)?,
        ..RunSummary::default()
    })
}

fn participant(name: &str) -> Result<Participant> {
    Ok(Participant::new(ParticipantId::new(name)?, None))
}

fn practice_session(grid: &Grid) -> MazeSession {
    MazeSession::from_resolution(ModeResolution::Practice {
        grid: grid.clone(),
        reason: PracticeReason::EventNotLive,
    })
}

fn noise_line(rng: &mut ChaCha20Rng) -> String {
    const NOISE: [&str; 4] = ["jump()", "UP()", "// thinking", "right(1)"];
    NOISE[rng.gen_range(0..NOISE.len())].to_string()
}

fn board_summary(grid: &Grid) -> RunSummary {
    RunSummary {
        grid_rows: grid.rows(),
        grid_cols: grid.cols(),
        goal: Some(grid.goal()),
        ..RunSummary::default()
    }
}

fn count_blocked(steps: &[maze_game::MoveResult]) -> usize {
    steps
        .iter()
        .filter(|s| s.outcome == MoveOutcome::Blocked)
        .count()
}

fn finish_summary(summary: &mut RunSummary, session: &mut MazeSession) {
    summary.mode = session.mode();
    summary.final_position = session.position();
    summary.completed = session.is_completed();
    summary.finish_secs = session.finish_secs();
    summary.completion_events = session
        .drain_events()
        .iter()
        .filter(|e| matches!(e, SessionEvent::Completed { .. }))
        .count();
}

/// Try every command on a completed session; count any that still move it.
fn probe_terminality(session: &mut MazeSession, now: DateTime<Utc>) -> usize {
    if !session.is_completed() {
        return 0;
    }
    let before = session.position();
    Command::ALL
        .into_iter()
        .filter(|command| {
            session.commit_line(&command.to_string(), now).is_some()
                || session.position() != before
        })
        .count()
}

fn scan_blocked_invariant(grid: &Grid) -> usize {
    let mut violations = 0;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let here = Position::new(row, col);
            for command in Command::ALL {
                let (d_row, d_col) = command.delta();
                let target = here
                    .offset(d_row, d_col)
                    .map_or(CellKind::OutOfBounds, |p| grid.cell(p));
                let result = apply(here, command, grid);
                let blocked = result.outcome == MoveOutcome::Blocked;
                let should_block = matches!(target, CellKind::Wall | CellKind::OutOfBounds);
                if blocked != should_block || (blocked && result.position != here) {
                    violations += 1;
                }
            }
        }
    }
    violations
}
