use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use maze_game::{
    CellKind, Command, Grid, MazeSession, ModeResolution, MoveOutcome, Position, PracticeReason,
    apply, random_grid, render_script, shortest_route,
};

const SEEDS: std::ops::Range<u64> = 0..40;

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn session_for(grid: &Grid) -> MazeSession {
    MazeSession::from_resolution(ModeResolution::Practice {
        grid: grid.clone(),
        reason: PracticeReason::EventNotLive,
    })
}

fn random_script(rng: &mut ChaCha20Rng, len: usize) -> Vec<Command> {
    (0..len)
        .map(|_| Command::ALL[rng.gen_range(0..Command::ALL.len())])
        .collect()
}

fn seeded_grid(rng: &mut ChaCha20Rng) -> Grid {
    let rows = rng.gen_range(2..9);
    let cols = rng.gen_range(2..9);
    let wall_pct = rng.gen_range(10..60);
    random_grid(rng, rows, cols, wall_pct).unwrap()
}

#[test]
fn blocked_moves_never_change_position() {
    for seed in SEEDS {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let grid = seeded_grid(&mut rng);
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let here = Position::new(row, col);
                for command in Command::ALL {
                    let (d_row, d_col) = command.delta();
                    let target = grid.classify(row as isize + d_row, col as isize + d_col);
                    let result = apply(here, command, &grid);
                    if matches!(target, CellKind::Wall | CellKind::OutOfBounds) {
                        assert_eq!(result.outcome, MoveOutcome::Blocked, "seed {seed}");
                        assert_eq!(result.position, here, "seed {seed}");
                    } else {
                        assert_ne!(result.outcome, MoveOutcome::Blocked, "seed {seed}");
                    }
                }
            }
        }
    }
}

#[test]
fn step_and_batch_modes_agree() {
    for seed in SEEDS {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let grid = seeded_grid(&mut rng);
        let script = random_script(&mut rng, 24);

        let mut stepped = session_for(&grid);
        for command in &script {
            stepped.commit_line(&command.to_string(), now());
        }

        let mut batched = session_for(&grid);
        let ticket = batched.start_replay(&render_script(&script)).unwrap();
        batched.run_replay(ticket, now());

        assert_eq!(stepped.position(), batched.position(), "seed {seed}");
        assert_eq!(stepped.is_completed(), batched.is_completed(), "seed {seed}");
    }
}

#[test]
fn completed_sessions_stop_moving() {
    for seed in SEEDS {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let grid = seeded_grid(&mut rng);
        let mut session = session_for(&grid);
        let route = shortest_route(&grid).unwrap();
        let ticket = session.start_replay(&render_script(&route)).unwrap();
        session.run_replay(ticket, now());
        assert!(session.is_completed(), "seed {seed}");
        session.drain_events();

        for command in random_script(&mut rng, 8) {
            assert_eq!(session.commit_line(&command.to_string(), now()), None);
            assert_eq!(session.position(), Some(grid.goal()));
        }
        assert!(session.start_replay("up()").is_none());
        assert!(session.drain_events().is_empty());
    }
}
