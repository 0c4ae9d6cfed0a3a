use mango_database::model::leaderboard::{LeaderboardEntry, LeaderboardKind};

/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h, 1d, 1h 30m).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        return if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        };
    }

    let parts: Vec<String> = [(hours, "h"), (minutes, "m"), (seconds, "s")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect();

    if parts.is_empty() {
        "0s".to_owned()
    } else {
        parts.join(" ")
    }
}

/// Currency amounts are shown with a leading `$`.
pub fn format_money(amount: u64) -> String {
    format!("${amount}")
}

/// Show xp with at most two decimals and no trailing zeros (`10`, `12.5`).
pub fn format_xp(xp: f64) -> String {
    let rounded = format!("{xp:.2}");
    rounded
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_owned()
}

/// Value column for one leaderboard row.
pub fn leaderboard_value(kind: LeaderboardKind, entry: &LeaderboardEntry) -> String {
    match kind {
        LeaderboardKind::Xp => format!("Lvl {} ({} XP)", entry.level, format_xp(entry.xp)),
        LeaderboardKind::Messages => format!("{} msgs", entry.messages),
        LeaderboardKind::Money => format_money(entry.money),
    }
}

pub fn leaderboard_title(kind: LeaderboardKind) -> &'static str {
    match kind {
        LeaderboardKind::Xp => "XP & Level Leaderboard",
        LeaderboardKind::Messages => "Message Leaderboard",
        LeaderboardKind::Money => "Money Leaderboard",
    }
}
