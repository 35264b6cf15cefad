use crate::aggregate::{summarize, SummaryOptions};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::query::{query, QuerySpec};
use crate::store::{RecordStore, StorageBackend};

/// Dashboard numbers over the records matching `spec`.
pub fn run<B: StorageBackend>(
    store: &RecordStore<B>,
    spec: &QuerySpec,
    options: &SummaryOptions,
) -> Result<CmdResult> {
    let schema = store.schema();
    spec.check(schema)?;
    let view = query(store.records(), schema, spec);
    let summary = summarize(view, schema, options);

    let mut result = CmdResult::default();
    if options.date.is_some() && summary.scope.is_none() {
        result.add_message(CmdMessage::warning(format!(
            "{} has no date field; sums cover every record",
            schema.name
        )));
    }
    Ok(result.with_summary(summary))
}
