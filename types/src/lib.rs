//! Core domain types for Toolgate.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer: the engine, a
//! meta-tool handler surfacing control operations to an agent, or a UI
//! rendering tool lists.
//!
//! The split mirrors the boundary the engine enforces: identities and actions
//! (`ids`, `action`), per-tool policy (`permissions`), observed behavior
//! (`stats`), the managed entity itself (`state`), the transient control
//! protocol (`request`), the audit record (`audit`), and configuration
//! (`config`).

mod action;
mod audit;
mod config;
mod ids;
mod permissions;
mod request;
mod state;
mod stats;

pub use action::{Actor, ToolAction};
pub use audit::{AuditDetails, AuditEntry};
pub use config::{ControlConfig, RawControlConfig};
pub use ids::{ApprovalToken, ToolId, ToolIdError};
pub use permissions::ToolPermissions;
pub use request::{ControlError, ControlOutcome, ControlRequest};
pub use state::ToolState;
pub use stats::ToolUsageStats;
