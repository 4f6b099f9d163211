//! Timing and presentation settings shared by the front end and tooling.
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_ENGINE_DATA: &str = include_str!("../assets/engine.json");

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Delay between batch-replay steps.
    pub replay_step_delay_ms: u32,
    /// How long the board shakes after a blocked move.
    pub collision_flash_ms: u32,
    pub timer_tick_ms: u32,
    pub leaderboard_limit: usize,
    pub leaderboard_poll_ms: u32,
}

impl EngineConfig {
    const fn compiled() -> Self {
        Self {
            replay_step_delay_ms: 150,
            collision_flash_ms: 300,
            timer_tick_ms: 1_000,
            leaderboard_limit: 20,
            leaderboard_poll_ms: 5_000,
        }
    }

    /// Parse settings, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns the serde error when `json` is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_ENGINE_DATA).unwrap_or_else(|err| {
            log::warn!("bundled engine settings unreadable, using compiled defaults: {err}");
            Self::compiled()
        })
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Zero`] naming the first zero delay or limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zeroed = [
            ("replay_step_delay_ms", self.replay_step_delay_ms == 0),
            ("collision_flash_ms", self.collision_flash_ms == 0),
            ("timer_tick_ms", self.timer_tick_ms == 0),
            ("leaderboard_limit", self.leaderboard_limit == 0),
            ("leaderboard_poll_ms", self.leaderboard_poll_ms == 0),
        ];
        zeroed
            .into_iter()
            .find(|(_, zero)| *zero)
            .map_or(Ok(()), |(field, _)| Err(ConfigError::Zero { field }))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::compiled()
    }
}
