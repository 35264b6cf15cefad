//! # Storage Layer
//!
//! Records live in memory and are mirrored to a durable key-value slot after
//! every change. The layer is split in three:
//!
//! 1. **Backends** ([`StorageBackend`]): raw slot I/O. A slot is one named
//!    string value.
//! 2. **Persistence** ([`Persistence`]): JSON on top of a backend, tolerant of
//!    missing and corrupt slots.
//! 3. **Record Store** ([`RecordStore`]): the in-memory collection for one
//!    schema, with create / update / delete / clear and id generation.
//!
//! ## Failure Model
//!
//! - **Reads never fail.** A slot that is absent, unparseable or the wrong
//!   shape yields the caller's default (for collections: the schema's sample
//!   records). The reason is logged through `tracing`.
//! - **Writes may fail.** The in-memory mutation stands; the store keeps a
//!   pending [`RecordzError::StorageWrite`](crate::error::RecordzError) notice
//!   that the command layer turns into a warning.
//!
//! ## Implementations
//!
//! - [`fs::FsBackend`]: one JSON file per slot, written atomically.
//! - [`memory::MemBackend`]: in-memory slots for tests, with write failure
//!   simulation.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── config.json        # RecordzConfig
//! ├── settings.json      # Settings (theme)
//! ├── tasks.json         # one slot per collection
//! └── food.json
//! ```

pub mod backend;
pub mod fs;
pub mod memory;
pub mod persist;
pub mod record_store;

pub use backend::StorageBackend;
pub use persist::{Persistence, SlotState};
pub use record_store::RecordStore;
