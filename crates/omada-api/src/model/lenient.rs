// Field deserializers for values the controller encodes inconsistently
// (booleans as 0/1, numbers as strings).

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

/// Accept `true`/`false`, any number (non-zero is true), `"0"`/`"1"` or null.
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > f64::EPSILON),
        Value::String(s) => !matches!(s.trim(), "" | "0" | "false"),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    })
}

/// Treat an explicit null like an absent field.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a JSON number or a numeric string.
pub(crate) fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| D::Error::custom(format!("invalid port number {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid port number {s:?}"))),
        other => Err(D::Error::custom(format!("invalid port number {other}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "super::flag")]
        flag: bool,
        #[serde(default, deserialize_with = "super::number")]
        number: u32,
        #[serde(default, deserialize_with = "super::or_default")]
        count: u64,
    }

    fn fields(value: serde_json::Value) -> Fields {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn flags() {
        assert!(fields(json!({"flag": 1})).flag);
        assert!(fields(json!({"flag": true})).flag);
        assert!(!fields(json!({"flag": 0})).flag);
        assert!(!fields(json!({"flag": null})).flag);
        assert!(!fields(json!({})).flag);
    }

    #[test]
    fn null_reads_as_default() {
        assert_eq!(fields(json!({"count": null})).count, 0);
        assert_eq!(fields(json!({"count": 5})).count, 5);
    }

    #[test]
    fn numbers() {
        assert_eq!(fields(json!({"number": "7"})).number, 7);
        assert_eq!(fields(json!({"number": 12})).number, 12);
        assert!(serde_json::from_value::<Fields>(json!({"number": "x"})).is_err());
    }
}
