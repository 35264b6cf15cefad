use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a record: `<epoch-millis>-<sequence>`.
///
/// Ids produced by [`IdGenerator`] follow that shape, but any string read back
/// from storage is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `(millis, sequence)` pair, when the id has the generated shape.
    pub fn parts(&self) -> Option<(i64, u32)> {
        let (millis, seq) = self.0.split_once('-')?;
        Some((millis.parse().ok()?, seq.parse().ok()?))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A single field value.
///
/// Stored untagged, so the JSON on disk is plain `"text"`, `3`, `2.5` or `true`.
/// Dates are `Text` in `YYYY-MM-DD` form; the schema decides how they compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Exact match against user-typed text. Numbers compare numerically.
    pub fn matches_raw(&self, raw: &str) -> bool {
        match self {
            Value::Text(s) => s == raw,
            Value::Integer(_) | Value::Number(_) => match raw.trim().parse::<f64>() {
                Ok(n) => self.as_f64() == Some(n),
                Err(_) => false,
            },
            Value::Bool(b) => raw.trim().eq_ignore_ascii_case(if *b { "true" } else { "false" }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

pub type Fields = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub fields: Fields,
}

impl Record {
    pub fn new(id: RecordId, fields: Fields) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Text of a field, or the empty string when absent.
    pub fn display(&self, field: &str) -> String {
        self.get(field).map(Value::to_string).unwrap_or_default()
    }
}

/// Issues `<millis>-<seq>` ids that never repeat within a collection.
///
/// The sequence restarts whenever the clock moves past the last issued
/// millisecond and increments otherwise, so a stalled or rewound clock still
/// yields fresh ids.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last_millis: i64,
    seq: u32,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance past an id that already exists (e.g. one loaded from storage).
    pub fn observe(&mut self, id: &RecordId) {
        if let Some((millis, seq)) = id.parts() {
            if (millis, seq) > (self.last_millis, self.seq) {
                self.last_millis = millis;
                self.seq = seq;
            }
        }
    }

    pub fn next_at(&mut self, now_millis: i64) -> RecordId {
        if now_millis > self.last_millis {
            self.last_millis = now_millis;
            self.seq = 0;
        } else {
            self.seq += 1;
        }
        RecordId(format!("{}-{}", self.last_millis, self.seq))
    }

    pub fn next(&mut self) -> RecordId {
        self.next_at(Utc::now().timestamp_millis())
    }
}
