//! # Record Schemas
//!
//! Records are open maps from field name to [`Value`](crate::model::Value),
//! but every collection is bound to a statically-typed [`Schema`]. The schema
//! is the single source of truth for:
//!
//! - **Validation**: which fields are required and what kind of value each holds
//! - **Input parsing**: CLI arguments and CSV cells are parsed per field
//! - **Querying**: which fields free-text search looks at, how sort keys compare
//! - **Aggregates**: which fields are counted by category or summed
//!
//! ## Field Kinds
//!
//! | Kind | Examples | Sorts as |
//! |------|----------|----------|
//! | `Text` | `title`, `client` | case-folded text |
//! | `Integer` | `stock`, `duration` | number |
//! | `Number` | `price`, `calories` | number |
//! | `Bool` | `paid` | false < true |
//! | `Date` | `due_date` | epoch value |
//! | `Choice` | `status`, `priority` | declared order |
//!
//! Built-in schemas live in [`crate::domains`].

mod spec;
mod value;

pub use spec::{FieldKind, FieldSpec, Schema, SeedRow};
pub use value::{parse_date, DATE_FORMAT};

use crate::error::{RecordzError, Result};
use crate::model::{Fields, IdGenerator, Record};

impl Schema {
    /// Parse `(field, raw)` pairs into typed fields.
    ///
    /// Empty raw values on optional fields are dropped (they mean "unset");
    /// on required fields they are a validation error.
    pub fn parse_fields<I, K, V>(&self, pairs: I) -> Result<Fields>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut fields = Fields::new();
        for (name, raw) in pairs {
            let name = name.as_ref().trim();
            let spec = self.field(name).ok_or_else(|| {
                RecordzError::validation(name, format!("not a field of {}", self.name))
            })?;
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                if spec.required {
                    return Err(RecordzError::validation(name, "is required"));
                }
                continue;
            }
            let value = spec
                .parse(raw)
                .map_err(|reason| RecordzError::validation(name, reason))?;
            fields.insert(spec.name.to_string(), value);
        }
        Ok(fields)
    }

    /// Check a complete field map: required fields present, every value fits.
    pub fn validate(&self, fields: &Fields) -> Result<()> {
        for spec in self.required_fields() {
            match fields.get(spec.name) {
                Some(value) if !FieldSpec::is_blank(value) => {}
                _ => return Err(RecordzError::validation(spec.name, "is required")),
            }
        }
        for (name, value) in fields {
            let spec = self.field(name).ok_or_else(|| {
                RecordzError::validation(name.as_str(), format!("not a field of {}", self.name))
            })?;
            spec.check(value)
                .map_err(|reason| RecordzError::validation(name.as_str(), reason))?;
        }
        Ok(())
    }

    /// Fill absent optional fields from their declared defaults.
    pub fn with_defaults(&self, mut fields: Fields) -> Fields {
        for spec in self.fields {
            if fields.contains_key(spec.name) {
                continue;
            }
            if let Some(value) = spec.default.and_then(|raw| spec.parse(raw).ok()) {
                fields.insert(spec.name.to_string(), value);
            }
        }
        fields
    }

    /// Sample records for a fresh collection.
    pub fn seed_records(&self, ids: &mut IdGenerator) -> Vec<Record> {
        self.seed
            .iter()
            .filter_map(|row| {
                let fields = self.parse_fields(row.iter().copied()).ok()?;
                let fields = self.with_defaults(fields);
                self.validate(&fields).ok()?;
                Some(Record::new(ids.next(), fields))
            })
            .collect()
    }
}
