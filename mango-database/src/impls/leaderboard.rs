use std::cmp::Ordering;

use crate::database::Database;
use crate::model::leaderboard::{LeaderboardEntry, LeaderboardKind};
use crate::model::user::UserRecord;
use crate::snapshot::UserMap;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Rank every user by `kind`, highest first, keeping the top `limit`.
///
/// Ties fall back to uid order so the same document always ranks the same way.
pub fn rank_users(users: &UserMap, kind: LeaderboardKind, limit: usize) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<&UserRecord> = users.values().collect();
    ranked.sort_by(|left, right| compare(kind, right, left).then_with(|| left.uid.cmp(&right.uid)));

    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, record)| LeaderboardEntry {
            rank: index + 1,
            uid: record.uid.clone(),
            level: record.level,
            xp: record.xp,
            messages: record.messages,
            money: record.money,
        })
        .collect()
}

fn compare(kind: LeaderboardKind, left: &UserRecord, right: &UserRecord) -> Ordering {
    match kind {
        LeaderboardKind::Xp => left
            .level
            .cmp(&right.level)
            .then_with(|| left.xp.total_cmp(&right.xp)),
        LeaderboardKind::Messages => left.messages.cmp(&right.messages),
        LeaderboardKind::Money => left.money.cmp(&right.money),
    }
}

pub async fn leaderboard(
    db: &Database,
    kind: LeaderboardKind,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    db.store()
        .read(|users| rank_users(users, kind, limit))
        .await
}

#[cfg(test)]
mod tests {
    use super::rank_users;
    use crate::model::leaderboard::LeaderboardKind;
    use crate::model::user::UserRecord;
    use crate::snapshot::UserMap;

    fn user(uid: &str, level: u32, xp: f64, messages: u64, money: u64) -> (String, UserRecord) {
        let mut record = UserRecord::new(uid);
        record.level = level;
        record.xp = xp;
        record.messages = messages;
        record.money = money;
        (uid.to_owned(), record)
    }

    fn sample() -> UserMap {
        [
            user("a", 2, 10.0, 50, 5),
            user("b", 3, 0.0, 10, 900),
            user("c", 2, 80.5, 70, 5),
            user("d", 0, 0.0, 0, 0),
        ]
        .into_iter()
        .collect()
    }

    fn uids(entries: &[crate::model::leaderboard::LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.uid.as_str()).collect()
    }

    #[test]
    fn xp_ranks_by_level_then_xp() {
        let ranked = rank_users(&sample(), LeaderboardKind::Xp, 10);
        assert_eq!(uids(&ranked), ["b", "c", "a", "d"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[3].rank, 4);
    }

    #[test]
    fn money_ties_break_on_uid() {
        let ranked = rank_users(&sample(), LeaderboardKind::Money, 3);
        assert_eq!(uids(&ranked), ["b", "a", "c"]);
    }

    #[test]
    fn messages_ranking_respects_limit() {
        let ranked = rank_users(&sample(), LeaderboardKind::Messages, 2);
        assert_eq!(uids(&ranked), ["c", "a"]);
    }

    #[test]
    fn kind_parses_aliases() {
        assert_eq!("LVL".parse::<LeaderboardKind>().ok(), Some(LeaderboardKind::Xp));
        assert_eq!(
            "balance".parse::<LeaderboardKind>().ok(),
            Some(LeaderboardKind::Money)
        );
        assert!("karma".parse::<LeaderboardKind>().is_err());
    }
}
