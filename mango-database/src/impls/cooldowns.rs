use std::time::{SystemTime, UNIX_EPOCH};

use crate::database::Database;
use crate::error::CoreError;
use crate::model::user::UserRecord;
use crate::store::Transaction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownDecision {
    Allowed,
    Active { remaining_secs: u64 },
}

impl CooldownDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn remaining_secs(self) -> u64 {
        match self {
            Self::Allowed => 0,
            Self::Active { remaining_secs } => remaining_secs,
        }
    }

    pub fn into_result(self) -> Result<(), CoreError> {
        match self {
            Self::Allowed => Ok(()),
            Self::Active { remaining_secs } => Err(CoreError::CooldownActive { remaining_secs }),
        }
    }
}

/// Decide whether `action` is usable at `now` without changing anything.
pub fn check(record: &UserRecord, action: &str, cooldown_secs: u64, now: u64) -> CooldownDecision {
    let Some(&last_used) = record.cooldowns.get(action) else {
        return CooldownDecision::Allowed;
    };

    let elapsed = now.saturating_sub(last_used);
    if elapsed < cooldown_secs {
        CooldownDecision::Active {
            remaining_secs: cooldown_secs - elapsed,
        }
    } else {
        CooldownDecision::Allowed
    }
}

/// Check the cooldown and, when allowed, stamp `now` right away.
///
/// The stamp is taken before the gated action runs. A failed action still
/// spends the cooldown; two near-simultaneous requests can never both pass.
pub fn consume(
    tx: &mut Transaction<'_>,
    uid: &str,
    action: &str,
    cooldown_secs: u64,
    now: u64,
) -> CooldownDecision {
    let decision = tx
        .peek(uid)
        .map_or(CooldownDecision::Allowed, |record| {
            check(record, action, cooldown_secs, now)
        });

    if decision.is_allowed() {
        tx.user(uid).cooldowns.insert(action.to_owned(), now);
    }

    decision
}

pub async fn try_consume(
    db: &Database,
    uid: &str,
    action: &str,
    cooldown_secs: u64,
) -> Result<CooldownDecision, CoreError> {
    try_consume_at(db, uid, action, cooldown_secs, now_unix_secs()).await
}

pub async fn try_consume_at(
    db: &Database,
    uid: &str,
    action: &str,
    cooldown_secs: u64,
    now: u64,
) -> Result<CooldownDecision, CoreError> {
    db.store()
        .mutate(|tx| Ok(consume(tx, uid, action, cooldown_secs, now)))
        .await
}

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}
