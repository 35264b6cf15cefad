use crate::error::{RecordzError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_COLLECTION: &str = "tasks";
const DEFAULT_CALORIE_GOAL: f64 = 2000.0;

/// Configuration for recordz, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordzConfig {
    /// Collection used when `-c` is not given
    #[serde(default = "default_collection")]
    pub default_collection: String,

    /// Daily goal per summable field (e.g. calories = 2000)
    #[serde(default = "default_goals")]
    pub goals: BTreeMap<String, f64>,

    /// Where exports and templates are written (defaults to the working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_goals() -> BTreeMap<String, f64> {
    [("calories".to_string(), DEFAULT_CALORIE_GOAL)]
        .into_iter()
        .collect()
}

impl Default for RecordzConfig {
    fn default() -> Self {
        Self {
            default_collection: default_collection(),
            goals: default_goals(),
            export_dir: None,
        }
    }
}

impl RecordzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(RecordzError::Io)?;
        let config: RecordzConfig =
            serde_json::from_str(&content).map_err(RecordzError::Serialization)?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but an unreadable file falls back to the
    /// defaults with a warning. Every command reads config this way, so
    /// `config set` can still overwrite a corrupt file.
    pub fn load_or_default<P: AsRef<Path>>(config_dir: P) -> Self {
        let config_dir = config_dir.as_ref();
        Self::load(config_dir).unwrap_or_else(|e| {
            tracing::warn!(
                path = %config_dir.join(CONFIG_FILENAME).display(),
                error = %e,
                "config.json is unreadable, using defaults"
            );
            Self::default()
        })
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(RecordzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(RecordzError::Serialization)?;
        fs::write(config_path, content).map_err(RecordzError::Io)?;
        Ok(())
    }

    /// Every key with its current value, in display order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = vec![(
            "default-collection".to_string(),
            self.default_collection.clone(),
        )];
        entries.push((
            "export-dir".to_string(),
            self.export_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        ));
        for (field, goal) in &self.goals {
            entries.push((format!("goal.{}", field), goal.to_string()));
        }
        entries
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default-collection" => Some(self.default_collection.clone()),
            "export-dir" => Some(
                self.export_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            _ => {
                let field = key.strip_prefix("goal.")?;
                self.goals.get(field).map(|g| g.to_string())
            }
        }
    }

    /// Set a key from user text. An empty `export-dir` unsets it.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match key {
            "default-collection" => {
                let schema = crate::domains::lookup(value).map_err(|e| e.to_string())?;
                self.default_collection = schema.name.to_string();
            }
            "export-dir" => {
                self.export_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            _ => {
                let field = key
                    .strip_prefix("goal.")
                    .filter(|f| !f.is_empty())
                    .ok_or_else(|| format!("Unknown config key: {}", key))?;
                let goal: f64 = value
                    .parse()
                    .ok()
                    .filter(|g: &f64| g.is_finite() && *g >= 0.0)
                    .ok_or_else(|| format!("Goal must be a non-negative number: {}", value))?;
                self.goals.insert(field.to_string(), goal);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = RecordzConfig::default();
        assert_eq!(config.default_collection, "tasks");
        assert_eq!(config.goals.get("calories"), Some(&2000.0));
        assert_eq!(config.export_dir, None);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = RecordzConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, RecordzConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();

        let mut config = RecordzConfig::default();
        config.set("default-collection", "Food").unwrap();
        config.set("goal.protein", "120").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = RecordzConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.default_collection, "food");
        assert_eq!(loaded.get("goal.protein").as_deref(), Some("120"));
        assert_eq!(loaded.get("goal.calories").as_deref(), Some("2000"));
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"export_dir": "/tmp/out"}"#).unwrap();

        let config = RecordzConfig::load(dir.path()).unwrap();
        assert_eq!(config.default_collection, "tasks");
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();

        assert!(RecordzConfig::load(dir.path()).is_err());
        assert_eq!(
            RecordzConfig::load_or_default(dir.path()),
            RecordzConfig::default()
        );
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = RecordzConfig::default();
        assert!(config.set("default-collection", "recipes").is_err());
        assert!(config.set("goal.calories", "lots").is_err());
        assert!(config.set("goal.calories", "-5").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, RecordzConfig::default());
    }

    #[test]
    fn test_export_dir_can_be_unset() {
        let mut config = RecordzConfig::default();
        config.set("export-dir", "out").unwrap();
        assert_eq!(config.get("export-dir").as_deref(), Some("out"));
        config.set("export-dir", "").unwrap();
        assert_eq!(config.export_dir, None);
    }
}
