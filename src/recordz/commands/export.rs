use crate::commands::{CmdMessage, CmdResult};
use crate::csv_io::{export_csv, export_filename};
use crate::error::{RecordzError, Result};
use crate::query::{query, QuerySpec};
use crate::store::{RecordStore, StorageBackend};
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Write the records matching `spec` to `<dir>/<collection>-<date>.csv`.
pub fn run<B: StorageBackend>(
    store: &RecordStore<B>,
    spec: &QuerySpec,
    dir: &Path,
    today: NaiveDate,
) -> Result<CmdResult> {
    let schema = store.schema();
    spec.check(schema)?;
    let view = query(store.records(), schema, spec);

    if view.is_empty() {
        let mut res = CmdResult::default();
        res.add_message(CmdMessage::info("No records to export."));
        return Ok(res);
    }

    fs::create_dir_all(dir).map_err(RecordzError::Io)?;
    let path = dir.join(export_filename(store.key(), today));
    let file = File::create(&path).map_err(RecordzError::Io)?;
    let written = export_csv(BufWriter::new(file), schema, view)?;
    tracing::info!(path = %path.display(), written, "exported");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} records to {}",
        written,
        path.display()
    )));
    Ok(result.with_written_paths(vec![path]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::TASKS;
    use crate::store::memory::MemBackend;
    use tempfile::TempDir;

    #[test]
    fn writes_dated_file() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(&TASKS, MemBackend::new());
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        let result = run(&store, &QuerySpec::new(), dir.path(), today).unwrap();
        let path = &result.written_paths[0];
        assert_eq!(path, &dir.path().join("tasks-2026-10-16.csv"));

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), TASKS.seed.len() + 1);
    }

    #[test]
    fn empty_view_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(&TASKS, MemBackend::new().with_slot("tasks", "[]"));
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        let result = run(&store, &QuerySpec::new(), dir.path(), today).unwrap();
        assert!(result.written_paths.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
