use super::backend::StorageBackend;
use crate::error::{RecordzError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use uuid::Uuid;

/// File-per-slot storage: slot `tasks` lives at `<root>/tasks.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(RecordzError::Io)?;
        }
        Ok(())
    }
}

/// Keys become file names, so anything outside `[A-Za-z0-9_-]` is replaced.
fn slot_filename(key: &str) -> String {
    let safe: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.json", safe)
}

impl StorageBackend for FsBackend {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RecordzError::Io(e)),
        }
    }

    fn write_slot(&self, key: &str, contents: &str) -> Result<()> {
        self.ensure_dir()?;

        // Atomic write
        let tmp_path = self.root.join(format!(".slot-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, contents).map_err(RecordzError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, self.slot_path(key)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(RecordzError::Io(e));
        }
        Ok(())
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(slot_filename(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names_are_sanitized() {
        assert_eq!(slot_filename("tasks"), "tasks.json");
        assert_eq!(slot_filename("../etc/passwd"), "___etc_passwd.json");
    }
}
