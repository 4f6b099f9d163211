pub mod game;
pub mod leaderboard;
pub mod not_found;
pub mod register;
