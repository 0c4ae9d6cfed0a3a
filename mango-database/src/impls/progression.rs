use crate::auth::AdminGrant;
use crate::database::Database;
use crate::error::CoreError;
use crate::model::user::UserRecord;

/// Hard ceiling on levels, whatever the curve.
pub const LEVEL_CAP: u32 = 1000;

/// Largest threshold that still counts exactly in xp (`2^53`).
const MAX_THRESHOLD: f64 = 9_007_199_254_740_992.0;

/// Leveling constants, fixed at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressionRules {
    xp_per_message: f64,
    min_message_length: usize,
    base_xp: f64,
    growth_rate: f64,
    max_level: u32,
}

impl ProgressionRules {
    pub fn new(
        xp_per_message: f64,
        min_message_length: usize,
        base_xp_per_level: f64,
        xp_growth_percent: f64,
    ) -> Result<Self, CoreError> {
        if !xp_per_message.is_finite() || xp_per_message < 0.0 {
            return Err(CoreError::validation(
                "xp_per_message must be a non-negative number",
            ));
        }
        // Below 1 the first threshold floors to 0 and leveling never terminates.
        if !base_xp_per_level.is_finite() || base_xp_per_level < 1.0 {
            return Err(CoreError::validation("base_xp_per_level must be at least 1"));
        }
        if !xp_growth_percent.is_finite() || xp_growth_percent < 0.0 {
            return Err(CoreError::validation(
                "xp_growth_percent must be a non-negative number",
            ));
        }
        if base_xp_per_level > MAX_THRESHOLD {
            return Err(CoreError::validation("base_xp_per_level is too large"));
        }

        let mut rules = Self {
            xp_per_message,
            min_message_length,
            base_xp: base_xp_per_level,
            growth_rate: xp_growth_percent / 100.0,
            max_level: LEVEL_CAP,
        };
        rules.max_level = (0..LEVEL_CAP)
            .find(|level| rules.threshold(*level) > MAX_THRESHOLD)
            .unwrap_or(LEVEL_CAP);

        Ok(rules)
    }

    pub fn xp_per_message(&self) -> f64 {
        self.xp_per_message
    }

    pub fn min_message_length(&self) -> usize {
        self.min_message_length
    }

    /// Highest reachable level. Its threshold is the last one that can be met.
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// `floor(base * (1 + growth)^level)`, with levels past the maximum
    /// treated as the maximum.
    pub fn xp_needed(&self, level: u32) -> u64 {
        // Bounded by MAX_THRESHOLD times the growth factor; fits in u64 for sane curves.
        self.threshold(level.min(self.max_level)) as u64
    }

    fn threshold(&self, level: u32) -> f64 {
        (self.base_xp * (1.0 + self.growth_rate).powf(f64::from(level))).floor()
    }

    /// Whether `xp` sits below the threshold of the record's level.
    pub fn is_settled(&self, record: &UserRecord) -> bool {
        record.xp < self.threshold(record.level.min(self.max_level))
    }

    /// Convert surplus xp into levels until it drops below the next threshold.
    ///
    /// Stops at the maximum level, and when a threshold no longer reduces xp.
    /// Returns the number of levels gained.
    pub fn normalize(&self, record: &mut UserRecord) -> u32 {
        let mut gained = 0;
        while record.level < self.max_level {
            let needed = self.threshold(record.level);
            if !needed.is_finite() || record.xp < needed {
                break;
            }
            let remaining = record.xp - needed;
            if remaining >= record.xp {
                break;
            }
            record.xp = remaining;
            record.level += 1;
            gained += 1;
        }
        gained
    }

    /// Count one message and award xp when it is long enough.
    ///
    /// At the maximum level xp is only added while it stays below the threshold.
    pub fn apply_message(&self, record: &mut UserRecord, message_length: usize) -> u32 {
        record.messages = record.messages.saturating_add(1);
        if message_length < self.min_message_length {
            return 0;
        }

        let (xp, level) = (record.xp, record.level);
        record.xp += self.xp_per_message;
        let gained = self.normalize(record);
        if !self.is_settled(record) {
            record.xp = xp;
            record.level = level;
            return 0;
        }
        gained
    }

    /// Normalize and refuse results that would leave xp above the top threshold.
    fn settle(&self, record: &mut UserRecord) -> Result<(), CoreError> {
        self.normalize(record);
        if self.is_settled(record) {
            Ok(())
        } else {
            Err(CoreError::validation(format!(
                "xp amount is too large: level {} is the maximum",
                self.max_level
            )))
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    pub uid: String,
    pub xp: f64,
    pub level: u32,
    /// Threshold for the current level.
    pub xp_needed: u64,
    pub messages: u64,
}

impl Progress {
    fn of(rules: &ProgressionRules, record: &UserRecord) -> Self {
        Self {
            uid: record.uid.clone(),
            xp: record.xp,
            level: record.level,
            xp_needed: rules.xp_needed(record.level),
            messages: record.messages,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MessageAward {
    pub progress: Progress,
    pub levels_gained: u32,
}

pub async fn progress(db: &Database, uid: &str) -> Progress {
    let record = db.user(uid).await;
    Progress::of(db.rules(), &record)
}

/// Ingest one observed chat message.
pub async fn award_message(
    db: &Database,
    uid: &str,
    message_length: usize,
) -> Result<MessageAward, CoreError> {
    let rules = *db.rules();
    db.store()
        .mutate(|tx| {
            let record = tx.user(uid);
            let levels_gained = rules.apply_message(record, message_length);
            Ok(MessageAward {
                progress: Progress::of(&rules, record),
                levels_gained,
            })
        })
        .await
}

pub async fn grant_xp(
    db: &Database,
    _grant: &AdminGrant,
    uid: &str,
    amount: f64,
) -> Result<Progress, CoreError> {
    let amount = positive_xp(amount)?;
    update(db, uid, |rules, record| {
        record.xp += amount;
        rules.settle(record)
    })
    .await
}

/// Remove xp, clamping at zero. Levels are never taken back.
pub async fn revoke_xp(
    db: &Database,
    _grant: &AdminGrant,
    uid: &str,
    amount: f64,
) -> Result<Progress, CoreError> {
    let amount = positive_xp(amount)?;
    update(db, uid, |_, record| {
        record.xp = (record.xp - amount).max(0.0);
        Ok(())
    })
    .await
}

pub async fn set_xp(
    db: &Database,
    _grant: &AdminGrant,
    uid: &str,
    amount: f64,
) -> Result<Progress, CoreError> {
    if amount.is_nan() {
        return Err(CoreError::validation("xp must be a number"));
    }
    if amount.is_infinite() {
        return Err(CoreError::validation("xp must be a finite number"));
    }
    update(db, uid, |rules, record| {
        record.xp = amount.max(0.0);
        rules.settle(record)
    })
    .await
}

/// Set the level outright and reset xp to zero. Clamped to `[0, max_level]`.
pub async fn set_level(
    db: &Database,
    _grant: &AdminGrant,
    uid: &str,
    level: i64,
) -> Result<Progress, CoreError> {
    let level = u32::try_from(level.max(0)).unwrap_or(u32::MAX);
    update(db, uid, |rules, record| {
        record.level = level.min(rules.max_level());
        record.xp = 0.0;
        Ok(())
    })
    .await
}

/// Raise the level without touching xp, stopping at the maximum level.
pub async fn grant_levels(
    db: &Database,
    _grant: &AdminGrant,
    uid: &str,
    levels: u32,
) -> Result<Progress, CoreError> {
    update(db, uid, |rules, record| {
        record.level = record
            .level
            .saturating_add(levels)
            .min(rules.max_level().max(record.level));
        Ok(())
    })
    .await
}

/// Lower the level without touching xp, stopping at zero.
pub async fn revoke_levels(
    db: &Database,
    _grant: &AdminGrant,
    uid: &str,
    levels: u32,
) -> Result<Progress, CoreError> {
    update(db, uid, |_, record| {
        record.level = record.level.saturating_sub(levels);
        Ok(())
    })
    .await
}

async fn update(
    db: &Database,
    uid: &str,
    change: impl FnOnce(&ProgressionRules, &mut UserRecord) -> Result<(), CoreError>,
) -> Result<Progress, CoreError> {
    let rules = *db.rules();
    db.store()
        .mutate(|tx| {
            let record = tx.user(uid);
            change(&rules, record)?;
            Ok(Progress::of(&rules, record))
        })
        .await
}

fn positive_xp(amount: f64) -> Result<f64, CoreError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(CoreError::validation("xp amount must be positive"))
    }
}
