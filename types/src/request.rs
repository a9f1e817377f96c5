//! The transient control protocol: requests, outcomes, denial reasons.

use thiserror::Error;

use crate::action::{Actor, ToolAction};
use crate::ids::{ApprovalToken, ToolId};

/// One enable/disable/query request against a registered tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlRequest {
    pub tool: ToolId,
    pub action: ToolAction,
    pub requested_by: Actor,
    pub reason: Option<String>,
    /// Window for a temporary disable, in milliseconds. Interpreted lazily by
    /// the expiry reconciler; nothing waits on it.
    pub duration_ms: Option<u64>,
}

impl ControlRequest {
    /// Shorthand for a request with no reason and no duration.
    #[must_use]
    pub fn new(tool: ToolId, action: ToolAction, requested_by: Actor) -> Self {
        Self {
            tool,
            action,
            requested_by,
            reason: None,
            duration_ms: None,
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Why a control request was denied.
///
/// The display strings are the caller-visible reasons; a meta-tool surfaces
/// them verbatim in its response payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("Tool not found")]
    NotFound,
    #[error("Operation '{0}' not allowed for this tool")]
    OperationNotAllowed(ToolAction),
    #[error("Agent cannot enable this tool")]
    AgentCannotEnable,
    #[error("Agent cannot disable this tool")]
    AgentCannotDisable,
    #[error("Agent tool control is disabled")]
    AgentControlDisabled,
    #[error("Disable duration exceeds maximum allowed ({max_ms}ms)")]
    DurationExceedsMax { max_ms: u64 },
    #[error("Unknown or already resolved approval token")]
    UnknownApprovalToken,
    #[error("Operation denied by user")]
    ApprovalDenied,
}

/// Result of processing one control request.
///
/// Denials travel as data; the engine never propagates them as `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOutcome {
    /// The request took effect (or, for `query`, was answered). `enabled` is
    /// the tool's state after processing.
    Applied { enabled: bool },
    Denied { error: ControlError },
    /// The mutation is parked until a user resolves the token.
    PendingApproval { token: ApprovalToken },
}

impl ControlOutcome {
    #[must_use]
    pub fn denied(error: ControlError) -> Self {
        Self::Denied { error }
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}
