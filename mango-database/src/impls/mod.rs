pub mod cooldowns;
pub mod economy;
pub mod leaderboard;
pub mod progression;
pub mod warnings;
