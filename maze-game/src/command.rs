//! Movement command grammar.
//!
//! The editor recognises exactly four literals: `up()`, `down()`, `left()`
//! and `right()`. A line matches when, after trimming surrounding whitespace,
//! it is one of those words immediately followed by `()`. Matching is
//! case-sensitive and independent per line; anything else is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One parsed movement token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
}

impl Command {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Row/column delta for a single step.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Match a single editor line against the command grammar.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let word = line.trim().strip_suffix("()")?;
        Self::ALL.into_iter().find(|cmd| cmd.keyword() == word)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}()", self.keyword())
    }
}

/// Parse the line being committed: the last line of the buffer.
///
/// Produces zero or one token.
#[must_use]
pub fn parse_commit(buffer: &str) -> Option<Command> {
    buffer.split('\n').next_back().and_then(Command::parse_line)
}

/// Parse every line of the buffer in order, dropping lines that do not match.
#[must_use]
pub fn parse_batch(buffer: &str) -> Vec<Command> {
    buffer
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(Command::parse_line)
        .collect()
}

/// Render a command sequence back into editor text, one call per line.
#[must_use]
pub fn render_script(commands: &[Command]) -> String {
    commands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Editor key gestures that drive the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorGesture {
    /// `Enter`: apply the line just typed to the live position.
    StepCommit,
    /// `Shift+Enter`: reset to start and replay the whole buffer.
    BatchReplay,
}

impl EditorGesture {
    /// Classify a key press; only `Enter` (with or without shift) is a gesture.
    #[must_use]
    pub fn from_key(key: &str, shift: bool) -> Option<Self> {
        match (key, shift) {
            ("Enter", false) => Some(Self::StepCommit),
            ("Enter", true) => Some(Self::BatchReplay),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_accepts_exact_literals() {
        assert_eq!(Command::parse_line("up()"), Some(Command::Up));
        assert_eq!(Command::parse_line("  down()\t"), Some(Command::Down));
        assert_eq!(Command::parse_line("left()"), Some(Command::Left));
        assert_eq!(Command::parse_line("right()\r"), Some(Command::Right));
    }

    #[test]
    fn parse_line_rejects_near_misses() {
        for line in [
            "Up()",
            "up",
            "up ()",
            "up( )",
            "up();",
            "jump()",
            "()",
            "",
            "// up()",
            "up()up()",
        ] {
            assert_eq!(Command::parse_line(line), None, "{line:?} should not parse");
        }
    }

    #[test]
    fn parse_commit_reads_only_last_line() {
        assert_eq!(parse_commit("up()\nleft()"), Some(Command::Left));
        assert_eq!(parse_commit("up()\n"), None);
        assert_eq!(parse_commit("up()\nnope"), None);
        assert_eq!(parse_commit(""), None);
    }

    #[test]
    fn parse_batch_keeps_order_and_drops_noise() {
        let buffer = "down()\n\n# comment\ndown()\n  right()  \nRIGHT()\npartial(";
        assert_eq!(
            parse_batch(buffer),
            vec![Command::Down, Command::Down, Command::Right]
        );
        assert!(parse_batch("hello\nworld").is_empty());
    }

    #[test]
    fn render_script_round_trips_through_batch_parser() {
        let commands = vec![Command::Down, Command::Right, Command::Up];
        let script = render_script(&commands);
        assert_eq!(script, "down()\nright()\nup()");
        assert_eq!(parse_batch(&script), commands);
    }

    #[test]
    fn gestures_follow_enter_and_shift() {
        assert_eq!(
            EditorGesture::from_key("Enter", false),
            Some(EditorGesture::StepCommit)
        );
        assert_eq!(
            EditorGesture::from_key("Enter", true),
            Some(EditorGesture::BatchReplay)
        );
        assert_eq!(EditorGesture::from_key("a", false), None);
    }
}
