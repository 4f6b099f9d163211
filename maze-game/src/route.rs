//! Breadth-first route finding, used to build winning scripts for QA runs.
use std::collections::VecDeque;

use crate::command::Command;
use crate::grid::{Grid, Position};
use crate::movement::{MoveOutcome, apply};

/// Shortest command script from Start to Goal, or `None` if the goal is walled off.
#[must_use]
pub fn shortest_route(grid: &Grid) -> Option<Vec<Command>> {
    let cols = grid.cols();
    let index = |pos: Position| pos.row * cols + pos.col;
    let mut came_from: Vec<Option<(Position, Command)>> = vec![None; grid.rows() * cols];
    let mut seen = vec![false; grid.rows() * cols];
    let mut frontier = VecDeque::from([grid.start()]);
    seen[index(grid.start())] = true;

    while let Some(current) = frontier.pop_front() {
        for command in Command::ALL {
            let step = apply(current, command, grid);
            if step.outcome == MoveOutcome::Blocked || seen[index(step.position)] {
                continue;
            }
            seen[index(step.position)] = true;
            came_from[index(step.position)] = Some((current, command));
            if step.outcome == MoveOutcome::ReachedGoal {
                return Some(unwind(&came_from, step.position, index));
            }
            frontier.push_back(step.position);
        }
    }
    None
}

fn unwind(
    came_from: &[Option<(Position, Command)>],
    goal: Position,
    index: impl Fn(Position) -> usize,
) -> Vec<Command> {
    let mut script = Vec::new();
    let mut cursor = goal;
    while let Some((previous, command)) = came_from[index(cursor)] {
        script.push(command);
        cursor = previous;
    }
    script.reverse();
    script
}
