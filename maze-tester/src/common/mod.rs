pub mod scenario;
pub mod util;

pub use util::{load_maze, parse_seeds, split_csv};
