use anyhow::{Result, anyhow};

use crate::common::scenario::TestScenario;
use crate::logic::{PlanDriver, RunPlan, RunSummary};
use maze_game::{EventMode, SubmitResponse};

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "Smoke Test",
            RunPlan::new(PlanDriver::Walkthrough).with_expectation(smoke_expectation),
        ),
        TestScenario::new(
            "Practice Walkthrough",
            RunPlan::new(PlanDriver::Walkthrough)
                .with_expectation(smoke_expectation)
                .with_expectation(walkthrough_expectation),
        ),
        TestScenario::new(
            "Replay Consistency",
            RunPlan::new(PlanDriver::RandomReplay {
                rows: 8,
                cols: 8,
                wall_pct: 35,
                script_len: 40,
            })
            .with_expectation(replay_consistency_expectation),
        ),
        TestScenario::new(
            "Live Timer Derivation",
            RunPlan::new(PlanDriver::LiveTimer { offset_secs: 65 })
                .with_expectation(live_timer_expectation),
        ),
        TestScenario::new(
            "Duplicate Submission",
            RunPlan::new(PlanDriver::DuplicateSubmission)
                .with_expectation(duplicate_submission_expectation),
        ),
        TestScenario::new(
            "Submission Race",
            RunPlan::new(PlanDriver::SubmissionRace { racers: 4 })
                .with_expectation(submission_race_expectation),
        ),
        TestScenario::new(
            "Replay Supersession",
            RunPlan::new(PlanDriver::ReplaySupersede).with_expectation(supersede_expectation),
        ),
    ]
}

pub fn find_catalog_scenario(name: &str) -> Option<TestScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.name == name)
}

fn smoke_expectation(summary: &RunSummary) -> Result<()> {
    anyhow::ensure!(summary.completed, "Maze should be completed by its shortest route");
    anyhow::ensure!(
        summary.final_position == summary.goal,
        "Walker should stop on the goal, ended at {:?}",
        summary.final_position
    );
    anyhow::ensure!(
        summary.completion_events == 1,
        "Completion should fire exactly once, fired {}",
        summary.completion_events
    );
    Ok(())
}

fn walkthrough_expectation(summary: &RunSummary) -> Result<()> {
    anyhow::ensure!(
        summary.modes_agree == Some(true),
        "Step mode and batch replay disagree on the final cell"
    );
    anyhow::ensure!(
        summary.blocked_moves == 0,
        "Shortest route should never hit a wall, blocked {} times",
        summary.blocked_moves
    );
    anyhow::ensure!(
        summary.mode == Some(EventMode::Practice),
        "Walkthrough should run in practice mode"
    );
    anyhow::ensure!(
        summary.moves_after_completion == 0,
        "{} commands moved the walker after completion",
        summary.moves_after_completion
    );
    Ok(())
}

fn replay_consistency_expectation(summary: &RunSummary) -> Result<()> {
    anyhow::ensure!(
        summary.invariant_violations == 0,
        "{} blocked-move invariant breaches on a {}x{} grid",
        summary.invariant_violations,
        summary.grid_rows,
        summary.grid_cols
    );
    match summary.modes_agree {
        Some(true) => {}
        Some(false) => return Err(anyhow!("Step mode and batch replay diverged")),
        None => return Err(anyhow!("Replay comparison was not recorded")),
    }
    anyhow::ensure!(
        summary.moves_after_completion == 0,
        "Completed session still moved"
    );
    Ok(())
}

fn live_timer_expectation(summary: &RunSummary) -> Result<()> {
    let expected = summary
        .expected_elapsed_secs
        .ok_or_else(|| anyhow!("Expected elapsed time missing"))?;
    let first = summary
        .elapsed_secs
        .ok_or_else(|| anyhow!("Live timer produced no value"))?;
    anyhow::ensure!(
        first.abs_diff(expected) <= 1,
        "Derived elapsed {first}s is not within 1s of {expected}s"
    );
    anyhow::ensure!(
        summary.elapsed_repeat_secs == Some(first),
        "Derivation is not stable for the same instant"
    );
    anyhow::ensure!(
        summary.mode == Some(EventMode::Live),
        "Session should resolve to live mode"
    );
    anyhow::ensure!(
        summary.finish_secs.is_some_and(|f| f >= first),
        "Finish time {:?} should not precede the first tick",
        summary.finish_secs
    );
    anyhow::ensure!(
        summary.stored_records == 1,
        "Live completion should be recorded once, found {}",
        summary.stored_records
    );
    Ok(())
}

fn duplicate_submission_expectation(summary: &RunSummary) -> Result<()> {
    anyhow::ensure!(
        summary.responses == [SubmitResponse::Recorded, SubmitResponse::Duplicate],
        "Expected recorded then duplicate, got {:?}",
        summary.responses
    );
    anyhow::ensure!(
        summary.stored_records == 1,
        "Storage holds {} records for one identity",
        summary.stored_records
    );
    Ok(())
}

fn submission_race_expectation(summary: &RunSummary) -> Result<()> {
    let recorded = summary
        .responses
        .iter()
        .filter(|r| **r == SubmitResponse::Recorded)
        .count();
    anyhow::ensure!(
        recorded == 1,
        "Exactly one racer should be recorded, {recorded} were"
    );
    anyhow::ensure!(
        summary
            .responses
            .iter()
            .all(|r| matches!(r, SubmitResponse::Recorded | SubmitResponse::Duplicate)),
        "Losing racers should see duplicate responses: {:?}",
        summary.responses
    );
    anyhow::ensure!(
        summary.stored_records == 1,
        "Storage holds {} records after the race",
        summary.stored_records
    );
    Ok(())
}

fn supersede_expectation(summary: &RunSummary) -> Result<()> {
    smoke_expectation(summary)?;
    anyhow::ensure!(
        summary.superseded_ticks > 0,
        "Ticks from the replaced replay were not rejected"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_game::Position;

    fn completed_summary() -> RunSummary {
        RunSummary {
            completed: true,
            final_position: Some(Position::new(2, 2)),
            goal: Some(Position::new(2, 2)),
            completion_events: 1,
            modes_agree: Some(true),
            mode: Some(EventMode::Practice),
            ..RunSummary::default()
        }
    }

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<_> = catalog_scenarios().into_iter().map(|s| s.name).collect();
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn smoke_rejects_double_completion() {
        smoke_expectation(&completed_summary()).expect("baseline passes");
        let mut summary = completed_summary();
        summary.completion_events = 2;
        let err = smoke_expectation(&summary).expect_err("double completion");
        assert!(err.to_string().contains("exactly once"));
    }

    #[test]
    fn walkthrough_rejects_divergent_modes() {
        let mut summary = completed_summary();
        summary.modes_agree = Some(false);
        assert!(walkthrough_expectation(&summary).is_err());
    }

    #[test]
    fn live_timer_tolerates_one_second() {
        let mut summary = completed_summary();
        summary.mode = Some(EventMode::Live);
        summary.expected_elapsed_secs = Some(65);
        summary.elapsed_secs = Some(66);
        summary.elapsed_repeat_secs = Some(66);
        summary.finish_secs = Some(66);
        summary.stored_records = 1;
        live_timer_expectation(&summary).expect("within tolerance");

        summary.elapsed_secs = Some(70);
        summary.elapsed_repeat_secs = Some(70);
        assert!(live_timer_expectation(&summary).is_err());
    }

    #[test]
    fn race_rejects_two_winners() {
        let summary = RunSummary {
            responses: vec![SubmitResponse::Recorded, SubmitResponse::Recorded],
            stored_records: 2,
            ..RunSummary::default()
        };
        let err = submission_race_expectation(&summary).expect_err("two winners");
        assert!(err.to_string().contains("2 were"));
    }
}
