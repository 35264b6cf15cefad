//! Parsing raw text into typed values and checking stored values.
//!
//! Every path that turns user input into a [`Value`] (CLI `key=value`
//! arguments, CSV cells, seed rows, defaults) goes through
//! [`FieldSpec::parse`], so all of them agree on what is valid.

use super::spec::{FieldKind, FieldSpec};
use crate::model::Value;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

impl FieldSpec {
    /// Parse user-supplied text for this field.
    ///
    /// The input is trimmed. Choice values match case-insensitively and are
    /// stored in their declared spelling. Empty input is the caller's concern
    /// (it means "absent"), so here it is only valid for text fields.
    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        let raw = raw.trim();
        match self.kind {
            FieldKind::Text => Ok(Value::text(raw)),
            FieldKind::Integer => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| format!("expected a whole number, got '{}'", raw)),
            FieldKind::Number => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Value::Number(n)),
                _ => Err(format!("expected a number, got '{}'", raw)),
            },
            FieldKind::Bool => parse_bool(raw)
                .map(Value::Bool)
                .ok_or_else(|| format!("expected true or false, got '{}'", raw)),
            FieldKind::Date => parse_date(raw)
                .map(|d| Value::Text(d.format(DATE_FORMAT).to_string()))
                .ok_or_else(|| format!("expected a date (YYYY-MM-DD), got '{}'", raw)),
            FieldKind::Choice(choices) => choices
                .iter()
                .find(|c| c.eq_ignore_ascii_case(raw))
                .map(|c| Value::text(*c))
                .ok_or_else(|| format!("expected one of: {}", choices.join(", "))),
        }
    }

    /// Check that an already-typed value fits this field.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        let ok = match (self.kind, value) {
            (FieldKind::Text, Value::Text(_)) => true,
            (FieldKind::Integer, Value::Integer(_)) => true,
            (FieldKind::Number, Value::Integer(_) | Value::Number(_)) => {
                value.as_f64().is_some_and(f64::is_finite)
            }
            (FieldKind::Bool, Value::Bool(_)) => true,
            (FieldKind::Date, Value::Text(s)) => parse_date(s).is_some(),
            (FieldKind::Choice(choices), Value::Text(s)) => choices.contains(&s.as_str()),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(format!("expected {}, got '{}'", self.kind.describe(), value))
        }
    }

    /// True when the value counts as "missing" for a required field.
    pub fn is_blank(value: &Value) -> bool {
        matches!(value, Value::Text(s) if s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIORITY: FieldSpec = FieldSpec::new("priority", FieldKind::Choice(&["Low", "High"]));

    #[test]
    fn parses_numbers() {
        let amount = FieldSpec::new("amount", FieldKind::Number);
        assert_eq!(amount.parse(" 12.5 "), Ok(Value::Number(12.5)));
        assert!(amount.parse("twelve").is_err());
        assert!(amount.parse("NaN").is_err());
        assert!(amount.parse("inf").is_err());

        let stock = FieldSpec::new("stock", FieldKind::Integer);
        assert_eq!(stock.parse("7"), Ok(Value::Integer(7)));
        assert!(stock.parse("7.5").is_err());
    }

    #[test]
    fn choices_are_case_insensitive_and_canonicalized() {
        assert_eq!(PRIORITY.parse("high"), Ok(Value::text("High")));
        assert!(PRIORITY.parse("urgent").is_err());
    }

    #[test]
    fn dates_are_normalized() {
        let due = FieldSpec::new("due", FieldKind::Date);
        assert_eq!(due.parse("2026-3-7"), Ok(Value::text("2026-03-07")));
        assert!(due.parse("07/03/2026").is_err());
    }

    #[test]
    fn bools_accept_common_spellings() {
        let paid = FieldSpec::new("paid", FieldKind::Bool);
        assert_eq!(paid.parse("Yes"), Ok(Value::Bool(true)));
        assert_eq!(paid.parse("0"), Ok(Value::Bool(false)));
        assert!(paid.parse("maybe").is_err());
    }

    #[test]
    fn check_accepts_integers_for_number_fields() {
        let price = FieldSpec::new("price", FieldKind::Number);
        assert!(price.check(&Value::Integer(3)).is_ok());
        assert!(price.check(&Value::text("3")).is_err());
        assert!(PRIORITY.check(&Value::text("Low")).is_ok());
        assert!(PRIORITY.check(&Value::text("low")).is_err());
    }
}
