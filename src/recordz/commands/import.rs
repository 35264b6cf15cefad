use crate::commands::{CmdMessage, CmdResult};
use crate::csv_io::Importer;
use crate::error::{RecordzError, Result};
use crate::store::{RecordStore, StorageBackend};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Append the rows of a CSV file to the collection.
pub fn run<B: StorageBackend>(store: &mut RecordStore<B>, path: &Path) -> Result<CmdResult> {
    let file = File::open(path).map_err(|e| {
        RecordzError::ImportParse(format!("cannot read {}: {}", path.display(), e))
    })?;

    let mut importer = Importer::new();
    let report = importer.run(store, BufReader::new(file))?;
    importer.acknowledge();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} imported, {} skipped",
        report.imported.len(),
        report.skipped.len()
    )));
    for row in &report.skipped {
        result.add_message(CmdMessage::warning(format!(
            "Line {}: {}",
            row.line, row.reason
        )));
    }
    result.drain_notice(store);
    Ok(result.with_affected_records(report.imported))
}
