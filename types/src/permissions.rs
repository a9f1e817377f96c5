//! Per-tool control policy.

use std::collections::BTreeSet;

use crate::action::ToolAction;

/// What a tool's state admits, and from whom.
///
/// The unlocked default comes from resolved configuration
/// (`ControlConfig::default_permissions`); the locked variant below is forced
/// onto system tools at registration and is never relaxed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ToolPermissions {
    pub agent_can_disable: bool,
    pub agent_can_enable: bool,
    pub requires_approval: bool,
    /// Upper bound on a single temporary-disable window, in milliseconds.
    pub max_disable_ms: Option<u64>,
    pub allowed_operations: BTreeSet<ToolAction>,
}

impl ToolPermissions {
    /// The locked permission set for system tools.
    ///
    /// System tools are the control surface itself (list/enable/disable
    /// meta-operations). An agent must never be able to disable the mechanism
    /// that controls tools, so these admit nothing but `query`.
    #[must_use]
    pub fn system_tool() -> Self {
        Self {
            agent_can_disable: false,
            agent_can_enable: false,
            requires_approval: true,
            max_disable_ms: None,
            allowed_operations: BTreeSet::from([ToolAction::Query]),
        }
    }

    /// All three operations, for building unlocked permission sets.
    #[must_use]
    pub fn all_operations() -> BTreeSet<ToolAction> {
        BTreeSet::from([ToolAction::Enable, ToolAction::Disable, ToolAction::Query])
    }

    #[must_use]
    pub fn allows(&self, action: ToolAction) -> bool {
        self.allowed_operations.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_tool_set_is_locked() {
        let locked = ToolPermissions::system_tool();
        assert!(!locked.agent_can_disable);
        assert!(!locked.agent_can_enable);
        assert!(locked.requires_approval);
        assert!(locked.allows(ToolAction::Query));
        assert!(!locked.allows(ToolAction::Enable));
        assert!(!locked.allows(ToolAction::Disable));
    }
}
