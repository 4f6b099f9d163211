use futures::executor::block_on;
use maze_game::{
    EventMode, Grid, LeaderboardEntry, Participant, ParticipantId, Position, SubmissionStatus,
};
use maze_web::components::completion_overlay::{self, CompletionOverlay};
use maze_web::components::leaderboard_table::{self, LeaderboardTable};
use maze_web::components::maze_board::{self, MazeBoard};
use maze_web::components::status_bar::{self, StatusBar};
use maze_web::components::terminal::{self, Terminal};
use maze_web::pages::game::{ConsoleProps, MazeConsole};
use yew::{AttrValue, Callback, LocalServerRenderer};

fn overlay(mode: EventMode, submission: SubmissionStatus) -> String {
    let props = completion_overlay::Props {
        mode,
        finish_secs: Some(83),
        submission,
        on_retry: Callback::noop(),
    };
    block_on(LocalServerRenderer::<CompletionOverlay>::with_props(props).render())
}

#[test]
fn maze_board_marks_walls_and_walker() {
    let grid = Grid::from_json(r#"[["S",0,1],[1,0,1],[1,0,"E"]]"#).unwrap();
    let props = maze_board::Props {
        grid,
        walker: Some(Position::new(1, 1)),
        shaking: true,
    };
    let html = block_on(LocalServerRenderer::<MazeBoard>::with_props(props).render());
    assert_eq!(html.matches("maze-cell--wall").count(), 4);
    assert_eq!(html.matches("maze-cell--walker").count(), 1);
    assert!(html.contains("maze-cell--goal"));
    assert!(html.contains("maze-board--shake"));
    assert!(html.contains("repeat(3,"));
}

#[test]
fn status_bar_formats_clock_and_mode() {
    let props = status_bar::Props {
        elapsed_secs: 3600,
        mode: Some(EventMode::Live),
        player: Some(AttrValue::from("neo")),
    };
    let html = block_on(LocalServerRenderer::<StatusBar>::with_props(props).render());
    assert!(html.contains("60:00"));
    assert!(html.contains("LIVE"));
    assert!(html.contains("neo"));
}

#[test]
fn overlay_headline_follows_mode() {
    let live = overlay(EventMode::Live, SubmissionStatus::Recorded);
    assert!(live.contains("ACCESS GRANTED"));
    assert!(live.contains("Final Time: 01:23"));
    assert!(live.contains("Score recorded."));

    let practice = overlay(EventMode::Practice, SubmissionStatus::NotSubmitted);
    assert!(practice.contains("PRACTICE COMPLETE"));
    assert!(!practice.contains("overlay__submission"));
}

#[test]
fn overlay_offers_retry_only_while_available() {
    let open = overlay(
        EventMode::Live,
        SubmissionStatus::Failed {
            reason: "HTTP 503".to_string(),
            retry_available: true,
        },
    );
    assert!(open.contains("HTTP 503"));
    assert!(open.contains("retry-submit"));

    let spent = overlay(
        EventMode::Live,
        SubmissionStatus::Failed {
            reason: "HTTP 503".to_string(),
            retry_available: false,
        },
    );
    assert!(!spent.contains("retry-submit"));
}

#[test]
fn leaderboard_table_handles_empty_and_ranked_rows() {
    let empty = block_on(
        LocalServerRenderer::<LeaderboardTable>::with_props(leaderboard_table::Props {
            entries: Vec::new(),
        })
        .render(),
    );
    assert!(empty.contains("No scores submitted yet..."));

    let entries = vec![
        LeaderboardEntry {
            player_name: "trinity".to_string(),
            finish_time_seconds: 42,
        },
        LeaderboardEntry {
            player_name: "neo".to_string(),
            finish_time_seconds: 125,
        },
    ];
    let html = block_on(
        LocalServerRenderer::<LeaderboardTable>::with_props(leaderboard_table::Props { entries })
            .render(),
    );
    assert!(html.contains("00:42"));
    assert!(html.contains("02:05"));
    assert!(html.find("trinity") < html.find("neo"));
    assert!(!html.contains("No scores submitted yet"));
}

#[test]
fn terminal_marks_locked_clipboard() {
    let props = terminal::Props {
        value: AttrValue::from("up()"),
        enabled: true,
        clipboard_blocked: true,
        on_input: Callback::noop(),
        on_gesture: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<Terminal>::with_props(props).render());
    assert!(html.contains("terminal--locked"));
    assert!(html.contains("terminal__input"));
}

#[test]
fn console_waits_for_mode_resolution() {
    let participant = Participant::new(ParticipantId::new("neo").unwrap(), None);
    let html = block_on(
        LocalServerRenderer::<MazeConsole>::with_props(ConsoleProps { participant }).render(),
    );
    assert!(html.contains("Connecting to the event server..."));
    assert!(html.contains("CONNECTING"));
    assert!(html.contains("00:00"));
    assert!(!html.contains("completion-overlay"));
}
