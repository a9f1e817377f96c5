//! The managed tool-state entity.

use crate::action::Actor;
use crate::ids::ToolId;
use crate::permissions::ToolPermissions;
use crate::stats::ToolUsageStats;

/// Canonical control state for one registered tool.
///
/// Created once at registration, mutated by control requests and usage
/// recording, never destroyed. Lives for the process lifetime and is written
/// through to persistence after every mutation; on restart the persisted
/// snapshot seeds the map before tools re-register.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolState {
    pub tool: ToolId,
    /// Owning server; corrected on re-registration if the tool moved.
    pub server: String,
    pub enabled: bool,
    /// True once any explicit enable/disable has been applied, as opposed to
    /// only ever carrying the registration default.
    pub dynamically_controlled: bool,
    pub last_modified_ms: i64,
    pub modified_by: Actor,
    pub permissions: ToolPermissions,
    pub usage: ToolUsageStats,
    /// Present only while a timed disable is active; unix milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary_disable_until_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_reason: Option<String>,
}

impl ToolState {
    /// A freshly registered tool: enabled, not yet dynamically controlled.
    #[must_use]
    pub fn new(
        tool: ToolId,
        server: impl Into<String>,
        permissions: ToolPermissions,
        now_ms: i64,
    ) -> Self {
        Self {
            tool,
            server: server.into(),
            enabled: true,
            dynamically_controlled: false,
            last_modified_ms: now_ms,
            modified_by: Actor::System,
            permissions,
            usage: ToolUsageStats::default(),
            temporary_disable_until_ms: None,
            disable_reason: None,
        }
    }
}
