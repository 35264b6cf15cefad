use crate::commands::{headline, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::RecordId;
use crate::store::{RecordStore, StorageBackend};

/// Delete each id. Unknown ids are reported, not treated as errors.
pub fn run<B: StorageBackend>(store: &mut RecordStore<B>, ids: &[RecordId]) -> Result<CmdResult> {
    let schema = store.schema();
    let mut result = CmdResult::default();

    for id in ids {
        let Some(record) = store.get(id).cloned() else {
            result.add_message(CmdMessage::warning(format!("No record with id {}", id)));
            continue;
        };
        if store.delete(id)? {
            result.add_message(CmdMessage::success(format!(
                "Deleted {} ({})",
                headline(schema, &record),
                id
            )));
            result.affected_records.push(record);
        }
    }

    result.drain_notice(store);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{assignments, empty_tasks};
    use crate::commands::{create, MessageLevel};

    #[test]
    fn deletes_known_and_reports_unknown() {
        let mut store = empty_tasks();
        let created = create::run(&mut store, &assignments(&[("title", "A")])).unwrap();
        let id = created.affected_records[0].id.clone();

        let result = run(&mut store, &[id.clone(), RecordId::new("nope")]).unwrap();
        assert!(store.is_empty());
        assert_eq!(result.affected_records.len(), 1);
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert_eq!(result.messages[1].level, MessageLevel::Warning);

        let again = run(&mut store, &[id]).unwrap();
        assert!(again.affected_records.is_empty());
    }
}
