use serde::{Deserialize, de::Error};
use serde_json::Number;

/// Convert a JSON number into a `u64`.
///
/// Integral floats such as `3.0` are accepted since the service may render
/// counters either way. Negative and fractional values yield `None`.
pub fn number_to_u64(number: &Number) -> Option<u64> {
    if let Some(value) = number.as_u64() {
        return Some(value);
    }
    let value = number.as_f64()?;
    (value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64).then_some(value as u64)
}

/// Custom deserializer for optional counters and durations.
///
/// Accepts integers and integral floats, treats `null` and a missing field as
/// `None`. Use together with `#[serde(default)]`.
pub fn de_u64_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Number>::deserialize(deserializer)?
        .map(|raw| {
            number_to_u64(&raw)
                .ok_or_else(|| Error::custom(format!("expected a non-negative integer, got {raw}")))
        })
        .transpose()
}
