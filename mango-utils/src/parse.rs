/// Accept a raw user id or a mention (`<@123>`, `<@!123>`) and return the id digits.
pub fn parse_uid(raw: &str) -> Option<String> {
    let value = raw.trim();
    let inner = value
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|rest| rest.trim_start_matches('!'))
        .unwrap_or(value);

    if inner.is_empty() || !inner.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }

    Some(inner.to_owned())
}

/// Whole currency amount. Sign is kept so callers can refuse or clamp.
pub fn parse_money(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Fractional xp amount; NaN and infinities are rejected.
pub fn parse_xp(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub fn parse_level(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Level delta for grant/revoke; must be a non-negative integer.
pub fn parse_level_delta(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}
