use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{RecordStore, StorageBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// Remove every record
    Clear,
    /// Replace the collection with its sample records
    Reseed,
}

pub fn run<B: StorageBackend>(store: &mut RecordStore<B>, mode: ResetMode) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match mode {
        ResetMode::Clear => {
            let removed = store.clear()?;
            result.add_message(CmdMessage::success(format!(
                "Removed {} records from {}",
                removed,
                store.key()
            )));
        }
        ResetMode::Reseed => {
            let seeded = store.reseed()?;
            result.add_message(CmdMessage::success(format!(
                "Restored {} sample records in {}",
                seeded,
                store.key()
            )));
        }
    }
    result.drain_notice(store);
    Ok(result)
}
