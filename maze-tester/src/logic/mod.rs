pub mod reports;
pub mod runner;
pub mod tester;

pub use runner::{MazeRunner, PlanDriver, RunPlan, RunSummary};
pub use tester::*;
