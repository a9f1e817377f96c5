//! Pure permission evaluation.
//!
//! No side effects here: the processor owns the global agent gate, the state
//! lookup, and every mutation. This module only answers "does this tool's
//! policy admit this request".

use toolgate_types::{Actor, ControlError, ControlRequest, ToolAction, ToolState};

/// Evaluate one request against one tool's permission set.
///
/// Check order is fixed: allowed operations, then agent capability, then the
/// duration bound. The first failing check wins, so a denial reason is
/// deterministic for a given (state, request) pair.
pub fn check_permission(state: &ToolState, request: &ControlRequest) -> Result<(), ControlError> {
    let permissions = &state.permissions;

    if !permissions.allows(request.action) {
        return Err(ControlError::OperationNotAllowed(request.action));
    }

    if request.requested_by == Actor::Agent {
        match request.action {
            ToolAction::Enable if !permissions.agent_can_enable => {
                return Err(ControlError::AgentCannotEnable);
            }
            ToolAction::Disable if !permissions.agent_can_disable => {
                return Err(ControlError::AgentCannotDisable);
            }
            _ => {}
        }
    }

    if request.action == ToolAction::Disable {
        if let (Some(duration_ms), Some(max_ms)) = (request.duration_ms, permissions.max_disable_ms)
        {
            if duration_ms > max_ms {
                return Err(ControlError::DurationExceedsMax { max_ms });
            }
        }
    }

    Ok(())
}
