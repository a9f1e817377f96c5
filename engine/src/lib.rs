//! Dynamic tool control engine.
//!
//! Toolgate governs whether an agent may enable or disable the external tools
//! it has discovered. One [`ToolControlEngine`] instance owns the canonical
//! in-memory state map, a bounded audit log, and a map of approvals awaiting
//! a user decision, all written through to a [`ControlStore`] after every
//! mutation.
//!
//! The engine is single-threaded: callers hold it behind `&mut` and no
//! operation yields mid-mutation. `process_request` and
//! `resolve_approval` are `async fn` purely to match the call convention of
//! the surrounding runtime.

pub mod audit;
mod engine;
pub mod evaluate;
pub mod store;

pub use audit::{AUDIT_LOG_CAPACITY, AuditLog, DEFAULT_AUDIT_LIMIT};
pub use engine::ToolControlEngine;
pub use evaluate::check_permission;
pub use store::{ControlSnapshot, ControlStore, JsonFileStore, MemoryStore};
