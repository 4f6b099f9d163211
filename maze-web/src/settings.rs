//! Engine settings for the browser build.
use maze_game::EngineConfig;

/// Bundled engine settings, replaced by defaults when a value is unusable.
#[must_use]
pub fn engine_config() -> EngineConfig {
    checked(EngineConfig::load_from_static())
}

fn checked(config: EngineConfig) -> EngineConfig {
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            log::warn!("engine settings rejected ({err}), using defaults");
            EngineConfig::default()
        }
    }
}
