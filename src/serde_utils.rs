use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts either JSON numbers or stringified numbers and converts to u64.
pub(crate) fn ordinal_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as DeError;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| DeError::custom(format!("Expected a non-negative ordinal, received {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| DeError::custom(format!("Invalid ordinal string '{s}'"))),
        other => Err(DeError::custom(format!(
            "Expected number or string for ordinal field, received {other:?}"
        ))),
    }
}

/// A field whose key must be present but whose value may be `null`.
pub(crate) fn required_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Optional string where `null` and `""` both mean absent.
pub(crate) fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}
