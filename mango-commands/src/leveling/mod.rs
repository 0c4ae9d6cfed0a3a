pub mod leaderboard;
pub mod lvl;
pub mod messages;
pub mod xp;
