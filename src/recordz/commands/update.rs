use crate::commands::{headline, CmdMessage, CmdResult};
use crate::error::{RecordzError, Result};
use crate::model::RecordId;
use crate::store::{RecordStore, StorageBackend};

pub fn run<B: StorageBackend>(
    store: &mut RecordStore<B>,
    id: &RecordId,
    assignments: &[(String, String)],
) -> Result<CmdResult> {
    if assignments.is_empty() {
        return Err(RecordzError::Api("Nothing to update".to_string()));
    }
    let schema = store.schema();
    let fields = schema.parse_fields(assignments.iter().map(|(k, v)| (k, v)))?;
    let record = store.update(id, fields)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Updated {} ({})",
        headline(schema, &record),
        record.id
    )));
    result.drain_notice(store);
    Ok(result.with_affected_records(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::commands::test_support::{assignments, empty_tasks};
    use crate::model::Value;

    #[test]
    fn merges_fields() {
        let mut store = empty_tasks();
        let created = create::run(
            &mut store,
            &assignments(&[("title", "A"), ("category", "Work")]),
        )
        .unwrap();
        let id = created.affected_records[0].id.clone();

        let result = run(&mut store, &id, &assignments(&[("status", "done")])).unwrap();
        let record = &result.affected_records[0];
        assert_eq!(record.get("status"), Some(&Value::text("Done")));
        assert_eq!(record.get("category"), Some(&Value::text("Work")));
        assert_eq!(store.get(&id), Some(record));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut store = empty_tasks();
        let err = run(
            &mut store,
            &RecordId::new("1-0"),
            &assignments(&[("status", "Done")]),
        )
        .unwrap_err();
        assert!(matches!(err, RecordzError::RecordNotFound(_)));
    }

    #[test]
    fn invalid_value_leaves_record_unchanged() {
        let mut store = empty_tasks();
        let created = create::run(&mut store, &assignments(&[("title", "A")])).unwrap();
        let before = created.affected_records[0].clone();

        let err = run(&mut store, &before.id, &assignments(&[("due_date", "soon")])).unwrap_err();
        assert!(matches!(err, RecordzError::Validation { .. }));
        assert_eq!(store.get(&before.id), Some(&before));
    }

    #[test]
    fn empty_update_is_rejected() {
        let mut store = empty_tasks();
        assert!(run(&mut store, &RecordId::new("1-0"), &[]).is_err());
    }
}
