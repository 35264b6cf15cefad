//! # Aggregates
//!
//! Pure reducers behind dashboard cards and charts. Every function takes the
//! records it should look at (the whole collection or a query view) and
//! builds its result from scratch, so two calls over the same records always
//! produce identical output.

use crate::model::Record;
use crate::schema::{parse_date, FieldKind, Schema};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-category record counts for one field, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub field: String,
    pub entries: Vec<(String, usize)>,
}

impl CategoryCounts {
    pub fn get(&self, category: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, n)| *n)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }
}

/// Group by `field` and count.
///
/// Choice fields come out in their declared order (Low, Medium, High); any
/// other field in first-seen order. Records without the field are not counted.
pub fn count_by<'a, I>(records: I, schema: &Schema, field: &str) -> CategoryCounts
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut entries: Vec<(String, usize)> = Vec::new();
    for record in records {
        let Some(value) = record.get(field) else {
            continue;
        };
        let key = value.to_string();
        match entries.iter_mut().find(|(c, _)| *c == key) {
            Some((_, n)) => *n += 1,
            None => entries.push((key, 1)),
        }
    }

    if let Some(FieldKind::Choice(choices)) = schema.field(field).map(|spec| spec.kind) {
        // Stable: values outside the declared set keep first-seen order at the end
        entries.sort_by_key(|(c, _)| {
            choices
                .iter()
                .position(|choice| choice == c)
                .unwrap_or(usize::MAX)
        });
    }

    CategoryCounts {
        field: field.to_string(),
        entries,
    }
}

/// Restricts sums to records whose date field equals `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateScope {
    pub field: String,
    pub date: NaiveDate,
}

impl DateScope {
    pub fn new(field: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            field: field.into(),
            date,
        }
    }

    pub fn contains(&self, record: &Record) -> bool {
        record
            .get(&self.field)
            .and_then(|v| v.as_text())
            .and_then(parse_date)
            == Some(self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSum {
    pub field: String,
    pub total: f64,
}

/// Sum numeric fields, optionally only over records inside `scope`.
/// Non-numeric and missing values contribute nothing.
pub fn sum_fields<'a, I>(records: I, fields: &[&str], scope: Option<&DateScope>) -> Vec<FieldSum>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut totals = vec![0.0_f64; fields.len()];
    for record in records {
        if scope.is_some_and(|s| !s.contains(record)) {
            continue;
        }
        for (total, field) in totals.iter_mut().zip(fields) {
            if let Some(n) = record.get(field).and_then(|v| v.as_f64()) {
                *total += n;
            }
        }
    }
    fields
        .iter()
        .zip(totals)
        .map(|(field, total)| FieldSum {
            field: field.to_string(),
            total,
        })
        .collect()
}

/// `min(100, round(consumed / goal * 100))`, and 0 for a zero, negative or
/// non-finite goal.
pub fn percent_of_goal(consumed: f64, goal: f64) -> u32 {
    if !goal.is_finite() || goal <= 0.0 || !consumed.is_finite() {
        return 0;
    }
    let pct = (consumed / goal * 100.0).round();
    pct.clamp(0.0, 100.0) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub field: String,
    pub consumed: f64,
    pub goal: f64,
    pub percent: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    /// Scope sums (and goals) to this date, using the schema's date field.
    pub date: Option<NaiveDate>,
    /// Goal per summable field, e.g. `calories -> 2000`.
    pub goals: BTreeMap<String, f64>,
}

/// Everything a dashboard shows for one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub collection: String,
    pub total: usize,
    pub counts: Vec<CategoryCounts>,
    pub scope: Option<DateScope>,
    pub sums: Vec<FieldSum>,
    pub goals: Vec<GoalProgress>,
}

pub fn summarize<'a, I>(records: I, schema: &Schema, options: &SummaryOptions) -> Summary
where
    I: IntoIterator<Item = &'a Record>,
{
    let records: Vec<&Record> = records.into_iter().collect();

    let counts = schema
        .filterable_fields()
        .map(|spec| count_by(records.iter().copied(), schema, spec.name))
        .collect();

    let scope = options
        .date
        .zip(schema.date_field())
        .map(|(date, spec)| DateScope::new(spec.name, date));

    let summable: Vec<&str> = schema.summable_fields().map(|spec| spec.name).collect();
    let sums = sum_fields(records.iter().copied(), &summable, scope.as_ref());

    let goals = sums
        .iter()
        .filter_map(|sum| {
            let goal = *options.goals.get(&sum.field)?;
            Some(GoalProgress {
                field: sum.field.clone(),
                consumed: sum.total,
                goal,
                percent: percent_of_goal(sum.total, goal),
            })
        })
        .collect();

    Summary {
        collection: schema.name.to_string(),
        total: records.len(),
        counts,
        scope,
        sums,
        goals,
    }
}
