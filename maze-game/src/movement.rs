//! Pure single-step move executor.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::grid::{CellKind, Grid, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Moved,
    /// Target was a wall or outside the grid; position unchanged.
    Blocked,
    ReachedGoal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub position: Position,
    pub outcome: MoveOutcome,
}

/// Apply one command to a position.
///
/// Deterministic and side-effect free: identical inputs always produce
/// identical results.
#[must_use]
pub fn apply(position: Position, command: Command, grid: &Grid) -> MoveResult {
    let (d_row, d_col) = command.delta();
    let target = position
        .offset(d_row, d_col)
        .map_or(CellKind::OutOfBounds, |candidate| grid.cell(candidate));

    match (position.offset(d_row, d_col), target) {
        (Some(candidate), CellKind::Goal) => MoveResult {
            position: candidate,
            outcome: MoveOutcome::ReachedGoal,
        },
        (Some(candidate), kind) if kind.is_traversable() => MoveResult {
            position: candidate,
            outcome: MoveOutcome::Moved,
        },
        _ => MoveResult {
            position,
            outcome: MoveOutcome::Blocked,
        },
    }
}

/// Summary of running a whole command sequence from the start cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub final_position: Position,
    /// Index of the command that reached the goal, if any.
    pub reached_goal_at: Option<usize>,
    pub blocked: usize,
    pub applied: usize,
}

/// Run commands from the grid's start, stopping at the goal.
#[must_use]
pub fn trace(grid: &Grid, commands: &[Command]) -> Trace {
    let mut position = grid.start();
    let mut blocked = 0;
    let mut applied = 0;
    for (idx, command) in commands.iter().enumerate() {
        let result = apply(position, *command, grid);
        applied += 1;
        position = result.position;
        match result.outcome {
            MoveOutcome::Blocked => blocked += 1,
            MoveOutcome::ReachedGoal => {
                return Trace {
                    final_position: position,
                    reached_goal_at: Some(idx),
                    blocked,
                    applied,
                };
            }
            MoveOutcome::Moved => {}
        }
    }
    Trace {
        final_position: position,
        reached_goal_at: None,
        blocked,
        applied,
    }
}
