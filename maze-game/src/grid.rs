//! Immutable maze layout with cell classification and bounds queries.
//!
//! Grids travel over the wire as a JSON array of rows where each cell is
//! `0` (open), `1` (wall), `"S"` (start) or `"E"` (goal).

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const PRACTICE_MAZE: &str = include_str!("../assets/practice_maze.json");

/// Classification of a single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Open,
    Wall,
    Start,
    Goal,
    /// Returned by [`Grid::classify`] for coordinates outside the grid. Never stored.
    OutOfBounds,
}

impl CellKind {
    /// Whether a walker may occupy this cell.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        matches!(self, Self::Open | Self::Start | Self::Goal)
    }

    /// Single-character glyph used by text renderers and reports.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Open => '.',
            Self::Wall => '#',
            Self::Start => 'S',
            Self::Goal => 'E',
            Self::OutOfBounds => ' ',
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Code(u8),
    Marker(String),
}

impl Serialize for CellKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Open => serializer.serialize_u8(0),
            Self::Wall => serializer.serialize_u8(1),
            Self::Start => serializer.serialize_str("S"),
            Self::Goal => serializer.serialize_str("E"),
            Self::OutOfBounds => Err(serde::ser::Error::custom(
                "out-of-bounds is not a storable cell",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for CellKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawCell::deserialize(deserializer)? {
            RawCell::Code(0) => Ok(Self::Open),
            RawCell::Code(1) => Ok(Self::Wall),
            RawCell::Code(other) => Err(de::Error::custom(format!("unknown cell code {other}"))),
            RawCell::Marker(marker) => match marker.as_str() {
                "S" => Ok(Self::Start),
                "E" => Ok(Self::Goal),
                _ => Err(de::Error::custom(format!("unknown cell marker {marker:?}"))),
            },
        }
    }
}

/// Row/column coordinate inside a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset by a signed delta, returning `None` when either axis goes negative.
    #[must_use]
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("maze has no rows")]
    Empty,
    #[error("maze row {row} is empty")]
    EmptyRow { row: usize },
    #[error("maze row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("maze cell at ({row}, {col}) is not a storable cell")]
    InvalidCell { row: usize, col: usize },
    #[error("maze must contain exactly one start cell (found {found})")]
    StartCount { found: usize },
    #[error("maze must contain exactly one goal cell (found {found})")]
    GoalCount { found: usize },
    #[error("maze JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rectangular maze with exactly one start and one goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<CellKind>>,
    start: Position,
    goal: Position,
}

impl Grid {
    /// Validate and build a grid from rows of cells.
    ///
    /// # Errors
    ///
    /// Returns an error when the grid is empty or ragged, holds an
    /// out-of-bounds marker, or does not have exactly one start and one goal.
    pub fn from_rows(cells: Vec<Vec<CellKind>>) -> Result<Self, GridError> {
        let expected = cells.first().ok_or(GridError::Empty)?.len();
        let mut starts = Vec::new();
        let mut goals = Vec::new();

        for (row, line) in cells.iter().enumerate() {
            if line.is_empty() {
                return Err(GridError::EmptyRow { row });
            }
            if line.len() != expected {
                return Err(GridError::Ragged {
                    row,
                    expected,
                    found: line.len(),
                });
            }
            for (col, cell) in line.iter().enumerate() {
                match cell {
                    CellKind::Start => starts.push(Position::new(row, col)),
                    CellKind::Goal => goals.push(Position::new(row, col)),
                    CellKind::OutOfBounds => return Err(GridError::InvalidCell { row, col }),
                    CellKind::Open | CellKind::Wall => {}
                }
            }
        }

        let &[start] = starts.as_slice() else {
            return Err(GridError::StartCount {
                found: starts.len(),
            });
        };
        let &[goal] = goals.as_slice() else {
            return Err(GridError::GoalCount { found: goals.len() });
        };

        Ok(Self { cells, start, goal })
    }

    /// Parse a grid from its JSON wire encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the layout is invalid.
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let rows: Vec<Vec<CellKind>> = serde_json::from_str(json)?;
        Self::from_rows(rows)
    }

    /// The fixed practice maze used whenever no live event is running.
    #[must_use]
    pub fn practice() -> Self {
        Self::from_json(PRACTICE_MAZE).unwrap_or_else(|_| Self {
            cells: vec![vec![CellKind::Start, CellKind::Goal]],
            start: Position::new(0, 0),
            goal: Position::new(0, 1),
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    #[must_use]
    pub const fn goal(&self) -> Position {
        self.goal
    }

    /// Classify a signed coordinate; anything outside the grid is [`CellKind::OutOfBounds`].
    #[must_use]
    pub fn classify(&self, row: isize, col: isize) -> CellKind {
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(row), Ok(col)) => self.cell(Position::new(row, col)),
            _ => CellKind::OutOfBounds,
        }
    }

    /// Classify a position; positions past the last row or column are out of bounds.
    #[must_use]
    pub fn cell(&self, pos: Position) -> CellKind {
        self.cells
            .get(pos.row)
            .and_then(|line| line.get(pos.col))
            .copied()
            .unwrap_or(CellKind::OutOfBounds)
    }

    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows() && pos.col < self.cols()
    }

    /// First cell of the given kind in row-major order.
    #[must_use]
    pub fn locate(&self, kind: CellKind) -> Option<Position> {
        match kind {
            CellKind::Start => Some(self.start),
            CellKind::Goal => Some(self.goal),
            _ => self.cells.iter().enumerate().find_map(|(row, line)| {
                line.iter()
                    .position(|cell| *cell == kind)
                    .map(|col| Position::new(row, col))
            }),
        }
    }

    /// Iterate rows for rendering.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[CellKind]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Compact text rendering, one line per row, with an optional walker marker.
    #[must_use]
    pub fn render_text(&self, walker: Option<Position>) -> String {
        let mut out = String::with_capacity(self.rows() * (self.cols() + 1));
        for (row, line) in self.cells.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                if walker == Some(Position::new(row, col)) {
                    out.push('@');
                } else {
                    out.push(cell.glyph());
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.cells.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<CellKind>>::deserialize(deserializer)?;
        Self::from_rows(rows).map_err(de::Error::custom)
    }
}
