//! # CSV Import / Export
//!
//! Bulk exchange of a collection as CSV.
//!
//! ## Export
//!
//! Columns are `id`, the schema's fields in declared order, then `created_at`.
//! One row per record, quoted per RFC 4180 by the `csv` writer.
//!
//! ## Import
//!
//! The header row is matched by name (trimmed, case-insensitive), so column
//! order does not matter. Unknown columns and the `id` / `created_at` columns
//! are ignored: imported rows always get fresh ids.
//!
//! Each data row is parsed cell by cell into a [`Cell`]. A row is **skipped**
//! (not fatal) when it is not valid UTF-8, a required value is blank, or any
//! cell fails to parse (including choice values outside the declared set).
//! The whole import **fails** when the input cannot be read, has no header
//! row, or lacks a column for a required field. A failed import does not
//! touch the store.
//!
//! ## State
//!
//! [`Importer`] tracks `Idle → Parsing → Success | Failure` and holds the
//! store's busy flag for the duration, so nothing else can mutate the
//! collection while it is being rebuilt.

use crate::error::{RecordzError, Result};
use crate::model::{Fields, Record, Value};
use crate::schema::{FieldSpec, Schema, DATE_FORMAT};
use crate::store::{RecordStore, StorageBackend};
use chrono::NaiveDate;
use std::io::{Read, Write};

const ID_COLUMN: &str = "id";
const CREATED_AT_COLUMN: &str = "created_at";

pub fn export_filename(collection: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", collection, date.format(DATE_FORMAT))
}

pub fn template_filename(collection: &str) -> String {
    format!("{}-template.csv", collection)
}

/// Write `records` as CSV. Pass the whole collection or a query view.
pub fn export_csv<'a, W, I>(writer: W, schema: &Schema, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![ID_COLUMN];
    header.extend(schema.field_names());
    header.push(CREATED_AT_COLUMN);
    wtr.write_record(&header)?;

    let mut written = 0;
    for record in records {
        let mut row = Vec::with_capacity(header.len());
        row.push(record.id.to_string());
        row.extend(schema.field_names().map(|name| record.display(name)));
        row.push(record.created_at.to_rfc3339());
        wtr.write_record(&row)?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}

/// Header plus one sample row built from each field's example value.
pub fn write_template<W: Write>(writer: W, schema: &Schema) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(schema.field_names())?;
    wtr.write_record(schema.fields.iter().map(|f| f.example))?;
    wtr.flush()?;
    Ok(())
}

/// A data row that was left out of an import, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line in the input (the header is line 1)
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ParsedImport {
    pub rows: Vec<Fields>,
    pub skipped: Vec<SkippedRow>,
}

/// Outcome of parsing one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Parsed(Value),
    Blank,
    Invalid(String),
}

impl Cell {
    fn parse(spec: &FieldSpec, raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Cell::Blank,
            Some(raw) => match spec.parse(raw) {
                Ok(value) => Cell::Parsed(value),
                Err(reason) => Cell::Invalid(reason),
            },
        }
    }
}

/// Parse CSV text against `schema` without touching any store.
pub fn parse_csv<R: Read>(reader: R, schema: &Schema) -> Result<ParsedImport> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| RecordzError::ImportParse(e.to_string()))?
        .clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(RecordzError::ImportParse("missing header row".to_string()));
    }

    let columns = map_columns(schema, &headers)?;

    let mut parsed = ParsedImport::default();
    for (n, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            // The reader has already moved past an undecodable row
            Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                let line = e.position().map(|p| p.line()).unwrap_or(n as u64 + 2);
                tracing::debug!(line, error = %e, "skipping undecodable import row");
                parsed.skipped.push(SkippedRow {
                    line,
                    reason: "row is not valid UTF-8".to_string(),
                });
                continue;
            }
            Err(e) => return Err(RecordzError::ImportParse(e.to_string())),
        };
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(n as u64 + 2);
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        match parse_row(schema, &columns, &record) {
            Ok(fields) => parsed.rows.push(fields),
            Err(reason) => {
                tracing::debug!(line, %reason, "skipping import row");
                parsed.skipped.push(SkippedRow { line, reason });
            }
        }
    }
    Ok(parsed)
}

/// For every schema field, the index of its column (if any).
fn map_columns(
    schema: &Schema,
    headers: &csv::StringRecord,
) -> Result<Vec<(&'static FieldSpec, Option<usize>)>> {
    let columns: Vec<_> = schema
        .fields
        .iter()
        .map(|spec| {
            let index = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(spec.name));
            (spec, index)
        })
        .collect();

    if let Some((spec, _)) = columns
        .iter()
        .find(|(spec, index)| spec.required && index.is_none())
    {
        return Err(RecordzError::ImportParse(format!(
            "missing required column '{}'",
            spec.name
        )));
    }
    Ok(columns)
}

fn parse_row(
    schema: &Schema,
    columns: &[(&'static FieldSpec, Option<usize>)],
    record: &csv::StringRecord,
) -> std::result::Result<Fields, String> {
    let mut fields = Fields::new();
    for (spec, index) in columns {
        let raw = index.and_then(|i| record.get(i));
        match Cell::parse(spec, raw) {
            Cell::Parsed(value) => {
                fields.insert(spec.name.to_string(), value);
            }
            Cell::Blank if spec.required => {
                return Err(format!("missing required value '{}'", spec.name));
            }
            Cell::Blank => {}
            Cell::Invalid(reason) => return Err(format!("{}: {}", spec.name, reason)),
        }
    }
    let fields = schema.with_defaults(fields);
    schema.validate(&fields).map_err(|e| e.to_string())?;
    Ok(fields)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImportState {
    #[default]
    Idle,
    Parsing,
    Success {
        imported: usize,
        skipped: usize,
    },
    Failure(String),
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<Record>,
    pub skipped: Vec<SkippedRow>,
}

/// Drives one import at a time into a [`RecordStore`].
#[derive(Debug, Default)]
pub struct Importer {
    state: ImportState,
}

impl Importer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    /// Parse `reader` and append the valid rows to `store`.
    ///
    /// The store is busy for the duration. On failure nothing is appended and
    /// the state carries the reason.
    pub fn run<B, R>(&mut self, store: &mut RecordStore<B>, reader: R) -> Result<ImportReport>
    where
        B: StorageBackend,
        R: Read,
    {
        if self.state == ImportState::Parsing {
            return Err(RecordzError::Busy);
        }
        store.begin_import()?;
        self.state = ImportState::Parsing;

        let parsed = match parse_csv(reader, store.schema()) {
            Ok(parsed) => parsed,
            Err(e) => {
                store.abort_import();
                return Err(self.fail(e));
            }
        };

        let imported = store
            .finish_import(parsed.rows)
            .map_err(|e| self.fail(e))?;

        tracing::info!(
            collection = store.key(),
            imported = imported.len(),
            skipped = parsed.skipped.len(),
            "import finished"
        );
        self.state = ImportState::Success {
            imported: imported.len(),
            skipped: parsed.skipped.len(),
        };
        Ok(ImportReport {
            imported,
            skipped: parsed.skipped,
        })
    }

    /// Dismiss a finished import's result.
    pub fn acknowledge(&mut self) {
        if self.state != ImportState::Parsing {
            self.state = ImportState::Idle;
        }
    }

    fn fail(&mut self, e: RecordzError) -> RecordzError {
        let reason = match &e {
            RecordzError::ImportParse(reason) => reason.clone(),
            other => other.to_string(),
        };
        tracing::warn!(%reason, "import failed");
        self.state = ImportState::Failure(reason);
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{FOOD, INVOICES, PRODUCTS, TASKS};
    use crate::query::{query, QuerySpec};
    use crate::store::memory::MemBackend;

    fn empty_store() -> RecordStore<MemBackend> {
        RecordStore::open(&TASKS, MemBackend::new().with_slot("tasks", "[]"))
    }

    fn exported(store: &RecordStore<MemBackend>) -> String {
        let mut out = Vec::new();
        export_csv(&mut out, store.schema(), store.records()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn filenames() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(export_filename("tasks", date), "tasks-2026-10-16.csv");
        assert_eq!(template_filename("food"), "food-template.csv");
    }

    #[test]
    fn export_quotes_commas_and_quotes() {
        let mut store = empty_store();
        store
            .create(
                TASKS
                    .parse_fields([("title", "Buy milk, eggs"), ("description", "say \"hi\"")])
                    .unwrap(),
            )
            .unwrap();
        let csv = exported(&store);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,title,description,status,priority,category,due_date,created_at"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("\"Buy milk, eggs\""));
        assert!(row.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn export_then_import_reproduces_fields() {
        let mut store = RecordStore::open(&TASKS, MemBackend::new());
        store
            .create(TASKS.parse_fields([("title", "Line\nbreak, and comma")]).unwrap())
            .unwrap();
        let csv = exported(&store);

        let parsed = parse_csv(csv.as_bytes(), &TASKS).unwrap();
        assert!(parsed.skipped.is_empty());
        let original: Vec<_> = store.records().iter().map(|r| r.fields.clone()).collect();
        assert_eq!(parsed.rows, original);
    }

    #[test]
    fn typed_columns_survive_export_and_import() {
        for schema in [&INVOICES, &PRODUCTS, &FOOD] {
            let mut store = RecordStore::open(schema, MemBackend::new());
            if schema.name == "products" {
                store
                    .create(
                        schema
                            .parse_fields([
                                ("name", "Old stock"),
                                ("price", "0.99"),
                                ("active", "false"),
                            ])
                            .unwrap(),
                    )
                    .unwrap();
            }
            let mut out = Vec::new();
            export_csv(&mut out, schema, store.records()).unwrap();

            let parsed = parse_csv(out.as_slice(), schema).unwrap();
            assert!(parsed.skipped.is_empty(), "{}", schema.name);
            let original: Vec<_> = store.records().iter().map(|r| r.fields.clone()).collect();
            assert_eq!(parsed.rows, original, "{}", schema.name);
        }
    }

    #[test]
    fn undecodable_rows_are_skipped_not_fatal() {
        let input: &[u8] = b"title,status\nGood,Done\nBad\xff\xfe,Done\nAlso good,Done\n";
        let parsed = parse_csv(input, &TASKS).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line, 3);
        assert!(parsed.skipped[0].reason.contains("UTF-8"));
    }

    #[test]
    fn export_accepts_a_query_view() {
        let store = RecordStore::open(&TASKS, MemBackend::new());
        let view = query(
            store.records(),
            store.schema(),
            &QuerySpec::new().filter("status", "Done"),
        );
        let mut out = Vec::new();
        let written = export_csv(&mut out, store.schema(), view).unwrap();
        assert_eq!(written, 1);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[test]
    fn import_matches_headers_by_name() {
        let input = "Priority , TITLE,notes\nhigh,Reordered,ignored\n";
        let parsed = parse_csv(input.as_bytes(), &TASKS).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        let row = &parsed.rows[0];
        assert_eq!(row.get("title"), Some(&Value::text("Reordered")));
        assert_eq!(row.get("priority"), Some(&Value::text("High")));
        assert_eq!(row.get("status"), Some(&Value::text("To Do")));
        assert!(!row.contains_key("notes"));
    }

    #[test]
    fn import_skips_bad_rows_with_line_numbers() {
        let input = "title,status,due_date\n\
                     Good,Done,2026-01-01\n\
                     ,Done,\n\
                     Bad status,Archived,\n\
                     Bad date,To Do,tomorrow\n\
                     Also good,,\n";
        let parsed = parse_csv(input.as_bytes(), &TASKS).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        let lines: Vec<u64> = parsed.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(parsed.skipped[0].reason.contains("title"));
        assert!(parsed.skipped[1].reason.contains("status"));
    }

    #[test]
    fn import_fails_without_required_column() {
        let err = parse_csv("description,status\nx,Done\n".as_bytes(), &TASKS).unwrap_err();
        assert!(matches!(err, RecordzError::ImportParse(reason) if reason.contains("title")));
    }

    #[test]
    fn import_fails_on_empty_input() {
        let err = parse_csv("".as_bytes(), &TASKS).unwrap_err();
        assert!(matches!(err, RecordzError::ImportParse(_)));
    }

    #[test]
    fn template_has_header_and_sample_row() {
        let mut out = Vec::new();
        write_template(&mut out, &PRODUCTS).unwrap();
        let template = String::from_utf8(out).unwrap();
        assert_eq!(template.lines().count(), 2);

        let parsed = parse_csv(template.as_bytes(), &PRODUCTS).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn importer_appends_with_fresh_ids() {
        let mut store = empty_store();
        let existing = store.create(TASKS.parse_fields([("title", "Keep")]).unwrap()).unwrap();
        let input = format!("id,title\n{},Imported\n", existing.id);

        let mut importer = Importer::new();
        let report = importer.run(&mut store, input.as_bytes()).unwrap();
        assert_eq!(report.imported.len(), 1);
        assert_ne!(report.imported[0].id, existing.id);
        assert_eq!(store.len(), 2);
        assert_eq!(
            importer.state(),
            &ImportState::Success {
                imported: 1,
                skipped: 0
            }
        );

        importer.acknowledge();
        assert_eq!(importer.state(), &ImportState::Idle);
        assert!(!store.is_busy());
    }

    #[test]
    fn failed_import_leaves_store_untouched() {
        let mut store = empty_store();
        let mut importer = Importer::new();
        let err = importer
            .run(&mut store, "status\nDone\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, RecordzError::ImportParse(_)));
        assert!(matches!(importer.state(), ImportState::Failure(_)));
        assert!(store.is_empty());
        assert!(!store.is_busy());
        assert_eq!(store.backend().write_count(), 0);
    }
}
