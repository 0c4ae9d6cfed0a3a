pub mod leaderboard;
pub mod user;
pub mod warnings;
