use crate::error::Result;
use std::path::PathBuf;

/// Raw key-value slot I/O.
///
/// A slot is one named string value (in practice a JSON document). This trait
/// handles the "how" of storage (filesystem vs memory); [`super::Persistence`]
/// handles the "what" (parsing, fallbacks, error surfacing).
pub trait StorageBackend {
    /// Read a slot. `Ok(None)` when the slot has never been written.
    /// `Err` only on actual I/O failure (permissions, disk failure).
    fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Replace a slot's contents.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write_slot(&self, key: &str, contents: &str) -> Result<()>;

    /// Where the slot lives. For `MemBackend`, a virtual path.
    fn slot_path(&self, key: &str) -> PathBuf;
}

impl<B: StorageBackend + ?Sized> StorageBackend for std::rc::Rc<B> {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, contents: &str) -> Result<()> {
        (**self).write_slot(key, contents)
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        (**self).slot_path(key)
    }
}

impl<B: StorageBackend + ?Sized> StorageBackend for &B {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, contents: &str) -> Result<()> {
        (**self).write_slot(key, contents)
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        (**self).slot_path(key)
    }
}
