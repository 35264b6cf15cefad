//! # Query Engine
//!
//! [`query`] turns a collection plus a [`QuerySpec`] into the ordered view a
//! client displays. It is a pure function: the input slice is never mutated,
//! and the same spec over the same records always yields the same view.
//!
//! The pipeline is search → filters → sort:
//!
//! - **Search** is a case-insensitive substring match over the schema's
//!   searchable fields (or an explicit field list).
//! - **Filters** are exact-match predicates combined with AND. A filter whose
//!   value is empty or `all` is ignored, mirroring an "All" dropdown entry.
//! - **Sort** is stable in both directions: records with equal keys keep their
//!   relative input order, so rows never swap places between renders.

use crate::error::{RecordzError, Result};
use crate::model::{Record, Value};
use crate::schema::{parse_date, FieldKind, Schema};
use chrono::Datelike;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("asc"),
            Direction::Desc => f.write_str("desc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: Direction,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl Default for SortSpec {
    /// Newest first.
    fn default() -> Self {
        Self::new(CREATED_AT, Direction::Desc)
    }
}

impl FromStr for SortSpec {
    type Err = RecordzError;

    /// `field`, `field:asc` or `field:desc`. A bare field sorts ascending.
    fn from_str(s: &str) -> Result<Self> {
        let (field, dir) = match s.split_once(':') {
            Some((field, dir)) => (field.trim(), dir.trim()),
            None => (s.trim(), "asc"),
        };
        if field.is_empty() {
            return Err(RecordzError::Api("Sort field cannot be empty".to_string()));
        }
        let direction = match dir.to_ascii_lowercase().as_str() {
            "asc" => Direction::Asc,
            "desc" => Direction::Desc,
            other => {
                return Err(RecordzError::Api(format!(
                    "Unknown sort direction '{}' (use asc or desc)",
                    other
                )))
            }
        };
        Ok(Self::new(field, direction))
    }
}

/// Exact-match predicate on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Unset filters (empty or the `all` sentinel) are skipped.
    pub fn is_active(&self) -> bool {
        let value = self.value.trim();
        !value.is_empty() && !value.eq_ignore_ascii_case("all")
    }

    /// The filter value is parsed with the field's schema when possible, so
    /// `status=done` matches `Done` and `price=4.5` matches `4.50`.
    pub fn matches(&self, record: &Record, schema: &Schema) -> bool {
        let Some(value) = record.get(&self.field) else {
            return false;
        };
        let raw = self.value.trim();
        match schema.field(&self.field).map(|spec| spec.parse(raw)) {
            Some(Ok(expected)) => values_equal(value, &expected),
            _ => value.matches_raw(raw),
        }
    }
}

impl FromStr for FieldFilter {
    type Err = RecordzError;

    fn from_str(s: &str) -> Result<Self> {
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| RecordzError::Api(format!("Filter must look like field=value: {}", s)))?;
        Ok(Self::new(field.trim(), value))
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Search text, filters and sort order describing one view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    pub search: String,
    /// Fields searched; the schema's searchable fields when `None`.
    pub search_fields: Option<Vec<String>>,
    pub filters: Vec<FieldFilter>,
    pub sort: SortSpec,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn search_in<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(FieldFilter::new(field, value));
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sort = SortSpec::new(field, direction);
        self
    }

    /// Reject filters and sort fields the schema does not know.
    pub fn check(&self, schema: &Schema) -> Result<()> {
        let known = |field: &str| {
            schema.field(field).is_some() || field == CREATED_AT || field == UPDATED_AT
        };
        if !known(&self.sort.field) {
            return Err(RecordzError::validation(
                self.sort.field.as_str(),
                format!("cannot sort {} by it", schema.name),
            ));
        }
        if let Some(filter) = self.filters.iter().find(|f| schema.field(&f.field).is_none()) {
            return Err(RecordzError::validation(
                filter.field.as_str(),
                format!("not a field of {}", schema.name),
            ));
        }
        Ok(())
    }

    fn matches_search(&self, record: &Record, schema: &Schema) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let hit = |field: &str| record.display(field).to_lowercase().contains(&needle);
        match &self.search_fields {
            Some(fields) => fields.iter().any(|f| hit(f.as_str())),
            None => schema.searchable_fields().any(hit),
        }
    }
}

/// Filter, search and sort `records` into a new view.
pub fn query<'a>(records: &'a [Record], schema: &Schema, spec: &QuerySpec) -> Vec<&'a Record> {
    let active: Vec<&FieldFilter> = spec.filters.iter().filter(|f| f.is_active()).collect();

    let mut view: Vec<(Option<SortKey>, &Record)> = records
        .iter()
        .filter(|r| active.iter().all(|f| f.matches(r, schema)))
        .filter(|r| spec.matches_search(r, schema))
        .map(|r| (sort_key(r, schema, &spec.sort.field), r))
        .collect();

    // Vec::sort_by is stable, which keeps ties in input order
    let direction = spec.sort.direction;
    view.sort_by(|(a, _), (b, _)| compare_keys(a.as_ref(), b.as_ref(), direction));

    view.into_iter().map(|(_, r)| r).collect()
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Int(i64),
    Num(f64),
    Text { folded: String, raw: String },
}

impl SortKey {
    fn text(raw: &str) -> Self {
        SortKey::Text {
            folded: raw.to_lowercase(),
            raw: raw.to_string(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Int(_) | SortKey::Num(_) => 0,
            SortKey::Text { .. } => 1,
        }
    }

    fn cmp_key(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Int(a), SortKey::Int(b)) => a.cmp(b),
            (SortKey::Num(a), SortKey::Num(b)) => a.total_cmp(b),
            (SortKey::Int(a), SortKey::Num(b)) => (*a as f64).total_cmp(b),
            (SortKey::Num(a), SortKey::Int(b)) => a.total_cmp(&(*b as f64)),
            (
                SortKey::Text { folded: a, raw: ra },
                SortKey::Text { folded: b, raw: rb },
            ) => a.cmp(b).then_with(|| ra.cmp(rb)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn sort_key(record: &Record, schema: &Schema, field: &str) -> Option<SortKey> {
    match field {
        CREATED_AT => return Some(SortKey::Int(record.created_at.timestamp_micros())),
        UPDATED_AT => return Some(SortKey::Int(record.updated_at.timestamp_micros())),
        _ => {}
    }

    let value = record.get(field)?;
    let kind = schema.field(field).map(|spec| spec.kind);
    match (kind, value) {
        (Some(FieldKind::Date), Value::Text(s)) => {
            parse_date(s).map(|d| SortKey::Int(i64::from(d.num_days_from_ce())))
        }
        (Some(FieldKind::Choice(choices)), Value::Text(s)) => choices
            .iter()
            .position(|c| c == s)
            .map(|i| SortKey::Int(i as i64))
            .or_else(|| Some(SortKey::text(s))),
        (_, Value::Integer(i)) => Some(SortKey::Int(*i)),
        (_, Value::Number(n)) => Some(SortKey::Num(*n)),
        (_, Value::Bool(b)) => Some(SortKey::Int(i64::from(*b))),
        (_, Value::Text(s)) => Some(SortKey::text(s)),
    }
}

/// Missing keys sort last in either direction.
fn compare_keys(a: Option<&SortKey>, b: Option<&SortKey>, direction: Direction) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ord = a.cmp_key(b);
            match direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        }
    }
}
