use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaderboardKind {
    /// Level first, then leftover xp.
    Xp,
    Messages,
    Money,
}

impl LeaderboardKind {
    pub const ALL: [LeaderboardKind; 3] = [Self::Xp, Self::Messages, Self::Money];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xp => "xp",
            Self::Messages => "messages",
            Self::Money => "money",
        }
    }
}

impl fmt::Display for LeaderboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderboardKind {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "xp" | "level" | "lvl" => Ok(Self::Xp),
            "messages" | "msgs" => Ok(Self::Messages),
            "money" | "balance" => Ok(Self::Money),
            other => Err(CoreError::validation(format!(
                "unknown leaderboard `{other}` (expected xp, messages or money)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub uid: String,
    pub level: u32,
    pub xp: f64,
    pub messages: u64,
    pub money: u64,
}
