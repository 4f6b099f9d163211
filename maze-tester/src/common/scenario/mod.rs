pub mod catalog;

use crate::logic::RunPlan;
use catalog::find_catalog_scenario;

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: RunPlan,
}

impl TestScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, plan: RunPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Keys accepted by `--scenarios`, with the display name each maps to.
const SCENARIO_KEYS: [(&str, &str); 7] = [
    ("smoke", "Smoke Test"),
    ("practice-walkthrough", "Practice Walkthrough"),
    ("replay-consistency", "Replay Consistency"),
    ("live-timer", "Live Timer Derivation"),
    ("duplicate-submission", "Duplicate Submission"),
    ("submission-race", "Submission Race"),
    ("replay-supersede", "Replay Supersession"),
];

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = match name.to_lowercase().as_str() {
        "smoke" => "smoke",
        "practice-walkthrough" | "walkthrough" => "practice-walkthrough",
        "replay-consistency" | "replay" => "replay-consistency",
        "live-timer" | "timer" => "live-timer",
        "duplicate-submission" | "duplicate" => "duplicate-submission",
        "submission-race" | "race" => "submission-race",
        "replay-supersede" | "supersede" => "replay-supersede",
        _ => return None,
    };
    SCENARIO_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .and_then(|(_, display)| find_catalog_scenario(display))
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIO_KEYS.to_vec()
}

/// Every registered key, in listing order.
pub fn all_scenario_keys() -> impl Iterator<Item = &'static str> {
    SCENARIO_KEYS.iter().map(|(key, _)| *key)
}
