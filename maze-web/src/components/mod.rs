pub mod completion_overlay;
pub mod leaderboard_table;
pub mod maze_board;
pub mod status_bar;
pub mod terminal;
