//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all recordz operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (`key=value` assignments, raw id strings)
//! - **Owns session state**: the open collection and the lazily loaded settings
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O to the terminal**: No stdout, stderr, or formatting
//!
//! ## Generic Over StorageBackend
//!
//! `RecordzApi<B: StorageBackend>` is generic over the storage backend:
//! - Production: `RecordzApi<FsBackend>`
//! - Testing: `RecordzApi<MemBackend>`
//!
//! The backend is shared (`Rc`) between the open collection and the settings.

use crate::aggregate::SummaryOptions;
use crate::commands;
use crate::config::RecordzConfig;
use crate::domains;
use crate::error::{RecordzError, Result};
use crate::model::RecordId;
use crate::query::QuerySpec;
use crate::schema::Schema;
use crate::settings::{Settings, Theme};
use crate::store::{RecordStore, StorageBackend};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// The main API facade for recordz operations.
///
/// All UI clients (CLI, web, etc.) should interact through this API.
pub struct RecordzApi<B: StorageBackend> {
    backend: Rc<B>,
    store: RecordStore<Rc<B>>,
    settings: Option<Settings<Rc<B>>>,
    paths: commands::RecordzPaths,
}

impl<B: StorageBackend> RecordzApi<B> {
    /// Open `collection` (a built-in schema name) on `backend`.
    pub fn new(backend: B, paths: commands::RecordzPaths, collection: &str) -> Result<Self> {
        let schema = domains::lookup(collection)?;
        let backend = Rc::new(backend);
        let store = RecordStore::open(schema, Rc::clone(&backend));
        Ok(Self {
            backend,
            store,
            settings: None,
            paths,
        })
    }

    pub fn schema(&self) -> &'static Schema {
        self.store.schema()
    }

    pub fn store(&self) -> &RecordStore<Rc<B>> {
        &self.store
    }

    pub fn paths(&self) -> &commands::RecordzPaths {
        &self.paths
    }

    /// Switch to another collection, hydrating it from storage.
    pub fn use_collection(&mut self, collection: &str) -> Result<()> {
        if self.store.is_busy() {
            return Err(RecordzError::Busy);
        }
        let schema = domains::lookup(collection)?;
        self.store = RecordStore::open(schema, Rc::clone(&self.backend));
        Ok(())
    }

    pub fn create_record<I: AsRef<str>>(&mut self, assignments: &[I]) -> Result<commands::CmdResult> {
        let pairs = parse_assignments(assignments)?;
        commands::create::run(&mut self.store, &pairs)
    }

    pub fn update_record<I: AsRef<str>>(
        &mut self,
        id: &str,
        assignments: &[I],
    ) -> Result<commands::CmdResult> {
        let pairs = parse_assignments(assignments)?;
        commands::update::run(&mut self.store, &parse_id(id), &pairs)
    }

    pub fn delete_records<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<commands::CmdResult> {
        let ids = parse_ids(ids);
        commands::delete::run(&mut self.store, &ids)
    }

    pub fn list_records(&self, spec: &QuerySpec) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, spec)
    }

    pub fn view_records<I: AsRef<str>>(&self, ids: &[I]) -> Result<commands::CmdResult> {
        commands::view::run(&self.store, &parse_ids(ids))
    }

    /// Summary of the records matching `spec`. Goals come from `config.json`.
    pub fn stats(&self, spec: &QuerySpec, date: Option<NaiveDate>) -> Result<commands::CmdResult> {
        let config = self.load_config();
        let options = SummaryOptions {
            date,
            goals: config.goals,
        };
        commands::stats::run(&self.store, spec, &options)
    }

    pub fn export_records(
        &self,
        spec: &QuerySpec,
        dir: Option<PathBuf>,
    ) -> Result<commands::CmdResult> {
        let config = self.load_config();
        let dir = self.paths.export_dir(dir, &config);
        commands::export::run(&self.store, spec, &dir, today())
    }

    pub fn import_records(&mut self, path: &Path) -> Result<commands::CmdResult> {
        commands::import::run(&mut self.store, path)
    }

    pub fn write_template(&self, dir: Option<PathBuf>) -> Result<commands::CmdResult> {
        let config = self.load_config();
        let dir = self.paths.export_dir(dir, &config);
        commands::template::run(self.schema(), &dir)
    }

    pub fn reset(&mut self, mode: commands::reset::ResetMode) -> Result<commands::CmdResult> {
        commands::reset::run(&mut self.store, mode)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn theme(&mut self, action: ThemeAction) -> Result<commands::CmdResult> {
        commands::theme::run(self.settings(), action)
    }

    pub fn collections(&self) -> Result<commands::CmdResult> {
        commands::collections::run(&*self.backend, self.schema().name)
    }

    /// The stored theme, or the OS theme when none has been chosen yet.
    pub fn current_theme(&mut self) -> Theme {
        self.settings().theme()
    }

    fn settings(&mut self) -> &mut Settings<Rc<B>> {
        let backend = &self.backend;
        self.settings
            .get_or_insert_with(|| Settings::init(Rc::clone(backend)))
    }

    fn load_config(&self) -> RecordzConfig {
        RecordzConfig::load_or_default(&self.paths.data_dir)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_id(raw: &str) -> RecordId {
    RecordId::new(raw.trim())
}

fn parse_ids<I: AsRef<str>>(inputs: &[I]) -> Vec<RecordId> {
    inputs.iter().map(|s| parse_id(s.as_ref())).collect()
}

/// `["title=Buy milk", "priority=High"]` → `[("title", "Buy milk"), ...]`.
/// Only the first `=` splits, so values may contain `=`.
pub fn parse_assignments<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<(String, String)>> {
    inputs
        .iter()
        .map(|s| {
            let s = s.as_ref();
            let (key, value) = s.split_once('=').ok_or_else(|| {
                RecordzError::Api(format!("Expected field=value, got '{}'", s))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(RecordzError::Api(format!("Missing field name in '{}'", s)));
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::reset::ResetMode;
pub use crate::commands::theme::ThemeAction;
pub use commands::{CmdMessage, CmdResult, CollectionInfo, MessageLevel, RecordzPaths};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SETTINGS_KEY;
    use crate::store::memory::MemBackend;
    use tempfile::TempDir;

    fn api(dir: &TempDir) -> RecordzApi<MemBackend> {
        let paths = RecordzPaths {
            data_dir: dir.path().to_path_buf(),
            working_dir: dir.path().to_path_buf(),
        };
        RecordzApi::new(MemBackend::new().with_slot("tasks", "[]"), paths, "tasks").unwrap()
    }

    #[test]
    fn parses_assignments() {
        let pairs = parse_assignments(&["title=a=b", " status = Done"]).unwrap();
        assert_eq!(pairs[0], ("title".to_string(), "a=b".to_string()));
        assert_eq!(pairs[1], ("status".to_string(), " Done".to_string()));
        assert!(parse_assignments(&["title"]).is_err());
        assert!(parse_assignments(&["=x"]).is_err());
    }

    #[test]
    fn create_then_list_dispatches() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        api.create_record(&["title=Write docs"]).unwrap();

        let listed = api.list_records(&QuerySpec::new()).unwrap();
        assert_eq!(listed.listed_records.len(), 1);
        assert_eq!(listed.listed_records[0].display("title"), "Write docs");
    }

    #[test]
    fn update_and_delete_take_raw_ids() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        let created = api.create_record(&["title=A"]).unwrap();
        let id = created.affected_records[0].id.to_string();

        api.update_record(&format!(" {} ", id), &["status=Done"]).unwrap();
        let viewed = api.view_records(&[id.as_str()]).unwrap();
        assert_eq!(viewed.listed_records[0].display("status"), "Done");

        api.delete_records(&[id.as_str()]).unwrap();
        assert!(api.store().is_empty());
    }

    #[test]
    fn unknown_collection_fails() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        assert!(matches!(
            api.use_collection("recipes"),
            Err(RecordzError::UnknownCollection(_))
        ));
        api.use_collection("food").unwrap();
        assert_eq!(api.schema().name, "food");
    }

    #[test]
    fn stats_use_configured_goals() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        api.config(ConfigAction::Set("goal.calories".into(), "600".into()))
            .unwrap();
        api.use_collection("food").unwrap();

        let result = api
            .stats(&QuerySpec::new(), NaiveDate::from_ymd_opt(2026, 1, 5))
            .unwrap();
        let summary = result.summary.unwrap();
        assert_eq!(summary.goals[0].goal, 600.0);
        assert_eq!(summary.goals[0].percent, 95);
    }

    #[test]
    fn current_theme_reads_the_stored_choice() {
        let dir = TempDir::new().unwrap();
        let paths = RecordzPaths {
            data_dir: dir.path().to_path_buf(),
            working_dir: dir.path().to_path_buf(),
        };
        let backend = MemBackend::new().with_slot(SETTINGS_KEY, r#"{"theme": "light"}"#);
        let mut api = RecordzApi::new(backend, paths, "food").unwrap();

        assert_eq!(api.current_theme(), Theme::Light);
        api.theme(ThemeAction::Set(Theme::Dark)).unwrap();
        assert_eq!(api.current_theme(), Theme::Dark);
    }

    #[test]
    fn corrupt_config_does_not_block_stats() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "goals: [").unwrap();
        let paths = RecordzPaths {
            data_dir: dir.path().to_path_buf(),
            working_dir: dir.path().to_path_buf(),
        };
        let api = RecordzApi::new(MemBackend::new(), paths, "food").unwrap();

        let result = api.stats(&QuerySpec::new(), None).unwrap();
        assert!(result.summary.is_some());
    }

    #[test]
    fn theme_uses_the_shared_backend() {
        let dir = TempDir::new().unwrap();
        let paths = RecordzPaths {
            data_dir: dir.path().to_path_buf(),
            working_dir: dir.path().to_path_buf(),
        };
        let backend = MemBackend::new().with_slot(SETTINGS_KEY, r#"{"theme": "dark"}"#);
        let mut api = RecordzApi::new(backend, paths, "tasks").unwrap();

        api.theme(ThemeAction::Toggle).unwrap();
        assert_eq!(api.settings().theme(), Theme::Light);
        assert!(api.backend.raw_slot(SETTINGS_KEY).unwrap().contains("light"));
    }

    #[test]
    fn export_goes_to_working_dir_by_default() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        api.create_record(&["title=A"]).unwrap();
        let result = api.export_records(&QuerySpec::new(), None).unwrap();
        assert_eq!(result.written_paths[0].parent(), Some(dir.path()));
    }
}
