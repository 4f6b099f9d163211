use anyhow::{Context, Result};
use std::{fs, path::Path};

use maze_game::Grid;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse numeric seed tokens.
pub fn parse_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<u64>()
                .with_context(|| format!("invalid seed '{token}'"))
        })
        .collect()
}

/// Load a maze in the JSON wire encoding, or the practice maze when no path is given.
pub fn load_maze(path: Option<&Path>) -> Result<Grid> {
    let Some(path) = path else {
        return Ok(Grid::practice());
    };
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Grid::from_json(&raw).with_context(|| format!("invalid maze in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn parse_seeds_reports_bad_token() {
        assert_eq!(
            parse_seeds(&["1".into(), "42".into()]).unwrap(),
            vec![1, 42]
        );
        let err = parse_seeds(&["nope".into()]).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn load_maze_defaults_to_practice() {
        assert_eq!(load_maze(None).unwrap(), Grid::practice());
    }

    #[test]
    fn load_maze_reads_fixture_and_rejects_garbage() {
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/corridor.json");
        let grid = load_maze(Some(&fixture)).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (3, 3));

        let bad = std::env::temp_dir().join(format!(
            "maze-tester-bad-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        std::fs::write(&bad, r#"[["S",0,0]]"#).unwrap();
        let err = load_maze(Some(&bad)).unwrap_err();
        assert!(format!("{err:#}").contains("goal"));
    }
}
