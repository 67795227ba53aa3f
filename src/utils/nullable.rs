//! Deserializers for upstream fields that may be null, missing or malformed.
//!
//! Use them together with `#[serde(default)]` so an absent key takes the
//! same path as an explicit `null`.

use serde::{Deserialize, Deserializer};

/// Parses a decimal string, returning 0 for anything unparseable or non-finite.
pub fn parse_decimal(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Accepts a number, a decimal string or null. Everything else becomes 0.
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => parse_decimal(&s),
        Some(serde_json::Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Like [`decimal_or_zero`], but keeps null and non-numeric values absent.
pub fn decimal_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

/// Null becomes an empty list.
pub fn vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "decimal_or_zero")]
        amount: f64,
        #[serde(default, deserialize_with = "decimal_or_none")]
        ratio: Option<f64>,
        #[serde(default, deserialize_with = "vec_or_empty")]
        codes: Vec<String>,
    }

    fn row(json: &str) -> Row {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1500000.50"), 1_500_000.5);
        assert_eq!(parse_decimal(" 42 "), 42.0);
        assert_eq!(parse_decimal("no definido"), 0.0);
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("NaN"), 0.0);
    }

    #[test]
    fn test_null_and_missing_fields() {
        let r = row(r#"{"amount": null, "ratio": null, "codes": null}"#);
        assert_eq!(r.amount, 0.0);
        assert_eq!(r.ratio, None);
        assert!(r.codes.is_empty());

        let r = row("{}");
        assert_eq!(r.amount, 0.0);
        assert_eq!(r.ratio, None);
        assert!(r.codes.is_empty());
    }

    #[test]
    fn test_numbers_and_strings() {
        let r = row(r#"{"amount": "2500.5", "ratio": 1.5, "codes": ["72121500"]}"#);
        assert_eq!(r.amount, 2500.5);
        assert_eq!(r.ratio, Some(1.5));
        assert_eq!(r.codes, vec!["72121500"]);

        let r = row(r#"{"amount": true, "ratio": "n/a"}"#);
        assert_eq!(r.amount, 0.0);
        assert_eq!(r.ratio, None);
    }
}
