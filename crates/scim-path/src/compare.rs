//! Ordering of attribute values for filter comparisons.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde_json::{Number, Value};

/// SCIM attribute data types (RFC 7643 §2.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    String,
    Boolean,
    Decimal,
    Integer,
    DateTime,
    Binary,
    Reference,
    Complex,
}

/// What a comparison needs to know about the compared attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition {
    pub kind: AttributeType,
    pub case_exact: bool,
}

impl Definition {
    pub fn new(kind: AttributeType) -> Self {
        Self { kind, case_exact: false }
    }

    pub fn case_exact(mut self, case_exact: bool) -> Self {
        self.case_exact = case_exact;
        self
    }
}

/// Parse an RFC 3339 (`xsd:dateTime`) timestamp.
pub fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text.trim()).ok()
}

/// Order two values.
///
/// Two strings compare chronologically when both are timestamps, otherwise
/// case-insensitively unless `definition` marks a case-exact string. Two
/// numbers compare numerically in the widest representation either side
/// needs. Anything else compares by its textual form.
pub fn compare_to(lhs: &Value, rhs: &Value, definition: Option<&Definition>) -> Ordering {
    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => compare_strings(a, b, definition),
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        _ => as_text(lhs).cmp(&as_text(rhs)),
    }
}

fn compare_strings(a: &str, b: &str, definition: Option<&Definition>) -> Ordering {
    if let (Some(a), Some(b)) = (parse_date(a), parse_date(b)) {
        return a.cmp(&b);
    }
    let case_exact =
        definition.is_some_and(|d| d.kind == AttributeType::String && d.case_exact);
    if case_exact {
        a.cmp(b)
    } else {
        a.to_lowercase().cmp(&b.to_lowercase())
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if a.is_f64() || b.is_f64() {
        if let (Some(a), Some(b)) = (to_decimal(a), to_decimal(b)) {
            return a.cmp(&b);
        }
        return to_f64(a).total_cmp(&to_f64(b));
    }
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a.cmp(&b);
    }
    to_i128(a).cmp(&to_i128(b))
}

fn to_decimal(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn to_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

fn to_i128(n: &Number) -> i128 {
    match (n.as_i64(), n.as_u64()) {
        (Some(i), _) => i128::from(i),
        (None, Some(u)) => i128::from(u),
        (None, None) => 0,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dates_compare_chronologically() {
        let earlier = json!("2011-05-13T04:42:34Z");
        let later = json!("2011-05-13T06:42:34+01:00");
        assert_eq!(compare_to(&earlier, &later, None), Ordering::Less);
        // Same instant in another offset.
        let same = json!("2011-05-13T05:42:34+01:00");
        assert_eq!(compare_to(&earlier, &same, None), Ordering::Equal);
    }

    #[test]
    fn test_strings_ignore_case_by_default() {
        assert_eq!(compare_to(&json!("Alice"), &json!("alice"), None), Ordering::Equal);
        let exact = Definition::new(AttributeType::String).case_exact(true);
        assert_ne!(compare_to(&json!("Alice"), &json!("alice"), Some(&exact)), Ordering::Equal);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(compare_to(&json!(2.5), &json!(3), None), Ordering::Less);
        assert_eq!(compare_to(&json!(10), &json!(9), None), Ordering::Greater);
        assert_eq!(compare_to(&json!(3.0), &json!(3), None), Ordering::Equal);
        assert_eq!(compare_to(&json!(u64::MAX), &json!(-1), None), Ordering::Greater);
        assert_eq!(compare_to(&json!(0.1), &json!(0.10), None), Ordering::Equal);
        assert_eq!(compare_to(&json!(1e300), &json!(1), None), Ordering::Greater);
    }

    #[test]
    fn test_mixed_kinds_compare_as_text() {
        assert_eq!(compare_to(&json!(true), &json!("true"), None), Ordering::Equal);
        assert_eq!(compare_to(&json!(null), &json!("null"), None), Ordering::Equal);
        assert_eq!(compare_to(&json!(10), &json!("9"), None), Ordering::Less);
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date(" 2011-05-13T04:42:34Z ").is_some());
        assert!(parse_date("2011-05-13").is_none());
        assert!(parse_date("bjensen").is_none());
    }
}
