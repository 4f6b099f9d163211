//! Compile-time endpoint and base-path settings.
//!
//! `MAZE_API_URL` selects the score desk at build time; local builds talk to
//! `http://localhost:3001`. `PUBLIC_URL` prefixes router paths when the app is
//! hosted under a subdirectory.

const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Absolute URL for an API path such as `/api/leaderboard`.
#[must_use]
pub fn api_url(path: &str) -> String {
    api_url_with_base(path, option_env!("MAZE_API_URL").unwrap_or(DEFAULT_API_URL))
}

/// Base path for the router (e.g., `/maze` when hosted under a subdirectory).
///
/// Returns `None` when no base path is configured so the router falls back to root.
#[must_use]
pub fn router_base() -> Option<String> {
    router_base_with_base(option_env!("PUBLIC_URL").unwrap_or(""))
}

fn api_url_with_base(path: &str, base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let base = if base.is_empty() { DEFAULT_API_URL } else { base };
    format!("{base}/{}", path.trim_start_matches('/'))
}

fn router_base_with_base(base: &str) -> Option<String> {
    let base = base.trim_end_matches('/').trim();
    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}
