use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::query::{query, QuerySpec};
use crate::store::{RecordStore, StorageBackend};

pub fn run<B: StorageBackend>(store: &RecordStore<B>, spec: &QuerySpec) -> Result<CmdResult> {
    spec.check(store.schema())?;
    let view: Vec<_> = query(store.records(), store.schema(), spec)
        .into_iter()
        .cloned()
        .collect();

    let mut result = CmdResult::default();
    if view.len() != store.len() {
        result.add_message(CmdMessage::info(format!(
            "Showing {} of {} records",
            view.len(),
            store.len()
        )));
    }
    Ok(result.with_listed_records(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::commands::test_support::{assignments, empty_tasks};
    use crate::query::Direction;

    #[test]
    fn lists_a_filtered_sorted_view() {
        let mut store = empty_tasks();
        for (title, status) in [("b", "Done"), ("a", "Done"), ("c", "To Do")] {
            create::run(&mut store, &assignments(&[("title", title), ("status", status)])).unwrap();
        }

        let spec = QuerySpec::new()
            .filter("status", "Done")
            .sort_by("title", Direction::Asc);
        let result = run(&store, &spec).unwrap();
        let titles: Vec<_> = result
            .listed_records
            .iter()
            .map(|r| r.display("title"))
            .collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(result.messages[0].content, "Showing 2 of 3 records");
    }

    #[test]
    fn unfiltered_list_has_no_message() {
        let mut store = empty_tasks();
        create::run(&mut store, &assignments(&[("title", "a")])).unwrap();
        let result = run(&store, &QuerySpec::new()).unwrap();
        assert_eq!(result.listed_records.len(), 1);
        assert!(result.messages.is_empty());
    }
}
