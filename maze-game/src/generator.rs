//! Seeded random mazes for replay and movement checks.
use rand::Rng;

use crate::grid::{CellKind, Grid, GridError};

/// Build a `rows` x `cols` maze with Start top-left and Goal bottom-right.
///
/// Roughly `wall_pct` percent of the remaining cells become walls, then a
/// random monotone corridor is carved from Start to Goal so at least one
/// route always exists.
///
/// # Errors
///
/// Returns [`GridError`] when the dimensions cannot hold distinct Start and
/// Goal cells.
pub fn random_grid<R: Rng + ?Sized>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    wall_pct: u8,
) -> Result<Grid, GridError> {
    let chance = f64::from(wall_pct.min(100)) / 100.0;
    let mut cells: Vec<Vec<CellKind>> = (0..rows)
        .map(|_| {
            (0..cols)
                .map(|_| {
                    if rng.gen_bool(chance) {
                        CellKind::Wall
                    } else {
                        CellKind::Open
                    }
                })
                .collect()
        })
        .collect();

    let (mut row, mut col) = (0, 0);
    let last_row = rows.saturating_sub(1);
    let last_col = cols.saturating_sub(1);
    while row < last_row || col < last_col {
        if let Some(cell) = cells.get_mut(row).and_then(|line| line.get_mut(col)) {
            *cell = CellKind::Open;
        }
        let go_down = col == last_col || (row < last_row && rng.gen_bool(0.5));
        if go_down {
            row += 1;
        } else {
            col += 1;
        }
    }

    if let Some(first) = cells.first_mut().and_then(|line| line.first_mut()) {
        *first = CellKind::Start;
    }
    if let Some(last) = cells.last_mut().and_then(|line| line.last_mut()) {
        *last = CellKind::Goal;
    }
    Grid::from_rows(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;
    use crate::route::shortest_route;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = random_grid(&mut ChaCha20Rng::seed_from_u64(7), 6, 9, 35).unwrap();
        let b = random_grid(&mut ChaCha20Rng::seed_from_u64(7), 6, 9, 35).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.start(), Position::new(0, 0));
        assert_eq!(a.goal(), Position::new(5, 8));
    }

    #[test]
    fn every_generated_grid_is_solvable() {
        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        for _ in 0..50 {
            let rows = rng.gen_range(1..8);
            let cols = rng.gen_range(2..8);
            let grid = random_grid(&mut rng, rows, cols, 60).unwrap();
            assert!(shortest_route(&grid).is_some());
        }
    }

    #[test]
    fn degenerate_sizes_are_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(matches!(random_grid(&mut rng, 0, 4, 10), Err(GridError::Empty)));
        assert!(random_grid(&mut rng, 1, 1, 10).is_err());
    }
}
