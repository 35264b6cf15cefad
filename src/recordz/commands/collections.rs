use crate::commands::{CollectionInfo, CmdResult};
use crate::domains;
use crate::error::Result;
use crate::store::{RecordStore, SlotState, StorageBackend};

/// Every built-in collection with its record count.
pub fn run<B: StorageBackend>(backend: &B, active: &str) -> Result<CmdResult> {
    let collections = domains::all()
        .map(|schema| {
            let store = RecordStore::open(schema, backend);
            CollectionInfo {
                name: schema.name,
                about: schema.about,
                records: store.len(),
                stored: *store.origin() == SlotState::Stored,
                active: schema.name == active,
            }
        })
        .collect();
    Ok(CmdResult {
        collections,
        ..Default::default()
    })
}
