use crate::commands::CmdResult;
use crate::error::{RecordzError, Result};
use crate::model::RecordId;
use crate::store::{RecordStore, StorageBackend};

pub fn run<B: StorageBackend>(store: &RecordStore<B>, ids: &[RecordId]) -> Result<CmdResult> {
    let records = ids
        .iter()
        .map(|id| {
            store
                .get(id)
                .cloned()
                .ok_or_else(|| RecordzError::RecordNotFound(id.clone()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CmdResult::default().with_listed_records(records))
}
