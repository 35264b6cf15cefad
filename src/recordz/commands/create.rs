use crate::commands::{headline, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{RecordStore, StorageBackend};

pub fn run<B: StorageBackend>(
    store: &mut RecordStore<B>,
    assignments: &[(String, String)],
) -> Result<CmdResult> {
    let schema = store.schema();
    let fields = schema.parse_fields(assignments.iter().map(|(k, v)| (k, v)))?;
    let record = store.create(fields)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Created {} ({})",
        headline(schema, &record),
        record.id
    )));
    result.drain_notice(store);
    Ok(result.with_affected_records(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{assignments, empty_tasks};
    use crate::commands::MessageLevel;
    use crate::error::RecordzError;
    use crate::model::Value;

    #[test]
    fn creates_record_with_defaults() {
        let mut store = empty_tasks();
        let result = run(&mut store, &assignments(&[("title", "Ship it")])).unwrap();

        assert_eq!(store.len(), 1);
        let record = &result.affected_records[0];
        assert_eq!(record.get("status"), Some(&Value::text("To Do")));
        assert!(result.messages[0].content.contains("Ship it"));
        assert_eq!(result.messages[0].level, MessageLevel::Success);
    }

    #[test]
    fn rejects_unknown_fields() {
        let mut store = empty_tasks();
        let err = run(&mut store, &assignments(&[("title", "A"), ("colour", "red")])).unwrap_err();
        assert!(matches!(err, RecordzError::Validation { field, .. } if field == "colour"));
        assert!(store.is_empty());
    }

    #[test]
    fn rejects_missing_required_field() {
        let mut store = empty_tasks();
        let err = run(&mut store, &assignments(&[("category", "Work")])).unwrap_err();
        assert!(matches!(err, RecordzError::Validation { field, .. } if field == "title"));
    }

    #[test]
    fn failed_save_becomes_a_warning() {
        let mut store = empty_tasks();
        store.backend().set_simulate_write_error(true);
        let result = run(&mut store, &assignments(&[("title", "A")])).unwrap();

        assert_eq!(store.len(), 1);
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning && m.content.contains("not saved")));
    }
}
