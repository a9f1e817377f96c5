//! Engine configuration: raw persisted overrides and the resolved form.
//!
//! `RawControlConfig` is what lands in the persisted snapshot: every field
//! optional, absent meaning "use the default". `ControlConfig` is the
//! resolved runtime view with no `Option` flags left. The resolution is a
//! shallow merge; the engine only ever consults the resolved form.

use std::collections::BTreeSet;

use crate::action::ToolAction;
use crate::permissions::ToolPermissions;

/// 24 hours; default cap on a single temporary-disable window.
pub const DEFAULT_MAX_TEMPORARY_DISABLE_MS: u64 = 86_400_000;

/// Persisted configuration overrides, all optional.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawControlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_agent_tool_control: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_logging: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temporary_disable_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_permissions: Option<ToolPermissions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_agent_operations: Option<BTreeSet<ToolAction>>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlConfig {
    /// Global gate: when false, every agent-issued request is denied before
    /// any per-tool policy is consulted.
    pub enable_agent_tool_control: bool,
    pub audit_logging: bool,
    pub max_temporary_disable_ms: u64,
    /// Permission set stamped onto newly registered non-system tools.
    pub default_permissions: ToolPermissions,
    /// Actions an agent may request at all, before per-tool policy.
    pub allowed_agent_operations: BTreeSet<ToolAction>,
}

impl ControlConfig {
    /// Shallow-merge raw overrides over the built-in defaults.
    #[must_use]
    pub fn resolve(raw: &RawControlConfig) -> Self {
        let max_temporary_disable_ms = raw
            .max_temporary_disable_ms
            .unwrap_or(DEFAULT_MAX_TEMPORARY_DISABLE_MS);
        let default_permissions = raw.default_permissions.clone().unwrap_or_else(|| {
            ToolPermissions {
                agent_can_disable: true,
                agent_can_enable: true,
                requires_approval: false,
                max_disable_ms: Some(max_temporary_disable_ms),
                allowed_operations: ToolPermissions::all_operations(),
            }
        });
        Self {
            enable_agent_tool_control: raw.enable_agent_tool_control.unwrap_or(true),
            audit_logging: raw.audit_logging.unwrap_or(true),
            max_temporary_disable_ms,
            default_permissions,
            allowed_agent_operations: raw
                .allowed_agent_operations
                .clone()
                .unwrap_or_else(ToolPermissions::all_operations),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::resolve(&RawControlConfig::default())
    }
}
