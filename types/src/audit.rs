//! Audit record types.

use crate::action::{Actor, ToolAction};
use crate::ids::ToolId;

/// Structured payload attached to an audit entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One control action as recorded in the bounded audit log.
///
/// Queries are intentionally not audited; only actions that mutate (or were
/// denied at resolution time) appear here.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AuditEntry {
    pub timestamp_ms: i64,
    pub action: ToolAction,
    pub tool: ToolId,
    pub requested_by: Actor,
    pub success: bool,
    #[serde(default)]
    pub details: AuditDetails,
}
