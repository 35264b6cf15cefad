//! # Recordz Architecture
//!
//! Recordz is a **UI-agnostic record collection library**. It keeps typed
//! collections (tasks, a food log, invoices, products, lesson plans) in
//! memory, mirrors them to durable key-value slots after every change, and
//! offers pure query, aggregate and CSV layers on top. The `recordz` binary
//! is one client of it.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (key=value pairs, raw ids)             │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic per command                               │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (store/, query.rs, aggregate.rs, csv_io.rs)           │
//! │  - RecordStore over a StorageBackend (FsBackend, MemBackend)│
//! │  - Pure query and aggregate functions                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! A command mutates the [`store::RecordStore`], which writes the whole
//! collection through [`store::Persistence`] right away. Listing runs the
//! collection through [`query::query`]; stats run the same view through
//! [`aggregate::summarize`]. Neither is cached: both are recomputed from the
//! records on every call.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr (diagnostics go through `tracing`)
//! - **Never** calls `std::process::exit`
//!
//! ## Testing Strategy
//!
//! 1. **Core and commands**: unit tests against [`store::memory::MemBackend`],
//!    which can also simulate failed writes.
//! 2. **API** (`api.rs`): dispatch and input normalization.
//! 3. **CLI**: end-to-end tests in `tests/` running the binary against a
//!    temporary data directory.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Backends, persistence and the record store
//! - [`model`]: `Record`, `RecordId`, `Value` and id generation
//! - [`schema`]: Typed field specifications and parsing
//! - [`domains`]: The built-in collections
//! - [`query`]: Search, filter and sort
//! - [`aggregate`]: Counts, sums and goal progress
//! - [`csv_io`]: CSV export, import and templates
//! - [`settings`]: Theme preference
//! - [`config`]: `config.json`
//! - [`error`]: Error types

pub mod aggregate;
pub mod api;
pub mod commands;
pub mod config;
pub mod csv_io;
pub mod domains;
pub mod error;
pub mod model;
pub mod query;
pub mod schema;
pub mod settings;
pub mod store;
