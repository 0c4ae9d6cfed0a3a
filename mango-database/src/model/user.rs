use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Per-user progression, moderation and economy state.
///
/// Records are created zero-valued on first reference and never removed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    /// Map key in the snapshot, restored on load.
    #[serde(skip)]
    pub uid: String,
    #[serde(deserialize_with = "lenient_xp")]
    pub xp: f64,
    #[serde(deserialize_with = "lenient_u32")]
    pub level: u32,
    #[serde(deserialize_with = "lenient_u64")]
    pub messages: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub warns: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub money: u64,
    /// Action key to last-used unix timestamp (seconds).
    #[serde(deserialize_with = "lenient_timestamps")]
    pub cooldowns: BTreeMap<String, u64>,
}

impl UserRecord {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }
}

// Older snapshots were written by hand-edited tooling that allowed negative
// counters and fractional timestamps. Clamp them into range instead of
// refusing the whole document.

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn lenient_xp<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(clamp_non_negative(f64::deserialize(deserializer)?))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(clamp_non_negative(f64::deserialize(deserializer)?).floor() as u64)
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(clamp_non_negative(f64::deserialize(deserializer)?).floor() as u32)
}

fn lenient_timestamps<'de, D>(deserializer: D) -> Result<BTreeMap<String, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(action, last_used)| (action, clamp_non_negative(last_used).floor() as u64))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::UserRecord;

    #[test]
    fn missing_fields_default_to_zero() {
        let record: UserRecord = serde_json::from_str(r#"{"xp": 12}"#).expect("parse");
        assert_eq!(record.xp, 12.0);
        assert_eq!(record.level, 0);
        assert_eq!(record.money, 0);
        assert!(record.cooldowns.is_empty());
    }

    #[test]
    fn legacy_values_are_clamped() {
        let record: UserRecord = serde_json::from_str(
            r#"{"xp": -4.5, "level": -1, "money": -30, "cooldowns": {"work": 1700000000.75}}"#,
        )
        .expect("parse");
        assert_eq!(record.xp, 0.0);
        assert_eq!(record.level, 0);
        assert_eq!(record.money, 0);
        assert_eq!(record.cooldowns.get("work"), Some(&1_700_000_000));
    }

    #[test]
    fn uid_is_not_serialized() {
        let json = serde_json::to_string(&UserRecord::new("42")).expect("encode");
        assert!(!json.contains("uid"));
    }
}
