use crate::aggregate::Summary;
use crate::config::RecordzConfig;
use crate::model::Record;
use crate::schema::Schema;
use crate::store::{RecordStore, StorageBackend};
use std::path::PathBuf;

pub mod collections;
pub mod config;
pub mod create;
pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod reset;
pub mod stats;
pub mod template;
pub mod theme;
pub mod update;
pub mod view;

#[derive(Debug, Clone)]
pub struct RecordzPaths {
    /// Slots, `config.json` and `settings.json`
    pub data_dir: PathBuf,
    /// Fallback target for exports and templates
    pub working_dir: PathBuf,
}

impl RecordzPaths {
    /// Explicit directory, then the configured `export_dir`, then the working directory.
    pub fn export_dir(&self, explicit: Option<PathBuf>, config: &RecordzConfig) -> PathBuf {
        explicit
            .or_else(|| config.export_dir.clone())
            .unwrap_or_else(|| self.working_dir.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// One built-in collection as shown by `recordz collections`.
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub name: &'static str,
    pub about: &'static str,
    pub records: usize,
    /// False when the collection has never been saved (the count is the seed)
    pub stored: bool,
    pub active: bool,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<Record>,
    pub listed_records: Vec<Record>,
    pub summary: Option<Summary>,
    pub written_paths: Vec<PathBuf>,
    pub config: Option<RecordzConfig>,
    pub collections: Vec<CollectionInfo>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<Record>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<Record>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_summary(mut self, summary: Summary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_written_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.written_paths = paths;
        self
    }

    pub fn with_config(mut self, config: RecordzConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Turn a pending persistence failure into a warning.
    pub(crate) fn drain_notice<B: StorageBackend>(&mut self, store: &mut RecordStore<B>) {
        if let Some(e) = store.take_notice() {
            self.add_message(CmdMessage::warning(format!(
                "Changes are kept in memory but were not saved: {}",
                e
            )));
        }
    }
}

/// Headline text for messages: the title field, or the id when it is empty.
pub fn headline(schema: &Schema, record: &Record) -> String {
    let title = record.display(schema.title_field);
    if title.trim().is_empty() {
        record.id.to_string()
    } else {
        title
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domains::TASKS;
    use crate::store::memory::MemBackend;
    use crate::store::RecordStore;
    use std::rc::Rc;

    pub fn assignments(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// A tasks store with no records, backed by a shared `MemBackend`.
    pub fn empty_tasks() -> RecordStore<Rc<MemBackend>> {
        RecordStore::open(&TASKS, Rc::new(MemBackend::new().with_slot("tasks", "[]")))
    }
}
