//! The control engine: state map, request processing, expiry, audit.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use toolgate_types::{
    Actor, ApprovalToken, AuditDetails, AuditEntry, ControlConfig, ControlError, ControlOutcome,
    ControlRequest, RawControlConfig, ToolAction, ToolId, ToolPermissions, ToolState,
};
use uuid::Uuid;

use crate::audit::AuditLog;
use crate::evaluate::check_permission;
use crate::store::{ControlSnapshot, ControlStore};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Flip an elapsed temporary disable back to enabled.
///
/// Shared by `is_tool_enabled` and `cleanup_expired_disables` so the two
/// paths can never disagree about what "expired" means.
fn expire_if_elapsed(state: &mut ToolState, now: i64) -> bool {
    match state.temporary_disable_until_ms {
        Some(until_ms) if until_ms <= now => {
            state.enabled = true;
            state.temporary_disable_until_ms = None;
            state.disable_reason = None;
            state.last_modified_ms = now;
            state.modified_by = Actor::System;
            tracing::debug!(tool = %state.tool, "temporary disable expired, tool re-enabled");
            true
        }
        _ => false,
    }
}

/// Engine governing dynamic enable/disable control over discovered tools.
///
/// One instance per hosting process, explicitly constructed and injected into
/// its callers (tool discovery, the agent-facing meta-tool handler, the
/// execution path recording usage). The in-memory map is the source of truth;
/// the store is written through after every mutation and only read back at
/// construction.
pub struct ToolControlEngine {
    states: BTreeMap<ToolId, ToolState>,
    config: ControlConfig,
    raw_config: RawControlConfig,
    audit: AuditLog,
    pending: HashMap<ApprovalToken, ControlRequest>,
    store: Box<dyn ControlStore>,
}

impl ToolControlEngine {
    /// Construct the engine, seeding state and configuration from whatever
    /// the store last persisted. A store that fails to load starts empty.
    #[must_use]
    pub fn new(store: Box<dyn ControlStore>) -> Self {
        let snapshot = match store.load() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!("failed to load tool control snapshot, starting empty: {error:#}");
                ControlSnapshot::default()
            }
        };
        let config = ControlConfig::resolve(&snapshot.config);
        Self {
            states: snapshot.states,
            config,
            raw_config: snapshot.config,
            audit: AuditLog::default(),
            pending: HashMap::new(),
            store,
        }
    }

    /// Register a discovered tool. Idempotent: an existing state is returned
    /// untouched except that a changed owning server is corrected (with
    /// `modified_by = System`). Never fails; persistence is best-effort.
    pub fn initialize_tool(
        &mut self,
        tool: ToolId,
        server: impl Into<String>,
        is_system_tool: bool,
    ) -> ToolState {
        let server = server.into();
        let now = now_ms();
        let state = match self.states.entry(tool) {
            Entry::Occupied(entry) => {
                let state = entry.into_mut();
                if state.server == server {
                    return state.clone();
                }
                tracing::debug!(tool = %state.tool, %server, "tool moved to a new server");
                state.server = server;
                state.last_modified_ms = now;
                state.modified_by = Actor::System;
                state.clone()
            }
            Entry::Vacant(entry) => {
                let permissions = if is_system_tool {
                    ToolPermissions::system_tool()
                } else {
                    self.config.default_permissions.clone()
                };
                let tool = entry.key().clone();
                tracing::debug!(%tool, %server, is_system_tool, "registered tool state");
                entry.insert(ToolState::new(tool, server, permissions, now)).clone()
            }
        };
        self.persist();
        state
    }

    #[must_use]
    pub fn tool_state(&self, tool: &ToolId) -> Option<&ToolState> {
        self.states.get(tool)
    }

    pub fn all_tool_states(&self) -> impl Iterator<Item = &ToolState> {
        self.states.values()
    }

    #[must_use]
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Replace the configuration overrides, re-resolve, and persist.
    pub fn apply_config(&mut self, raw: RawControlConfig) {
        self.config = ControlConfig::resolve(&raw);
        self.raw_config = raw;
        self.persist();
    }

    /// Process one control request end-to-end.
    ///
    /// Denials come back as [`ControlOutcome::Denied`] data, never as an
    /// error. `async` matches the surrounding call convention; there is no
    /// internal suspension, so no mutation is ever observed half-applied.
    #[allow(clippy::unused_async)] // signature parity with the hosting runtime
    pub async fn process_request(&mut self, request: ControlRequest) -> ControlOutcome {
        if request.requested_by == Actor::Agent {
            if !self.config.enable_agent_tool_control {
                return ControlOutcome::denied(ControlError::AgentControlDisabled);
            }
            if !self.config.allowed_agent_operations.contains(&request.action) {
                return ControlOutcome::denied(ControlError::OperationNotAllowed(request.action));
            }
        }

        let Some(state) = self.states.get(&request.tool) else {
            return ControlOutcome::denied(ControlError::NotFound);
        };

        if let Err(error) = check_permission(state, &request) {
            return ControlOutcome::denied(error);
        }

        // Query is read-only and intentionally unaudited.
        if request.action == ToolAction::Query {
            return ControlOutcome::Applied {
                enabled: state.enabled,
            };
        }

        if state.permissions.requires_approval && request.requested_by == Actor::Agent {
            let token = ApprovalToken::new(Uuid::new_v4().to_string());
            tracing::debug!(tool = %request.tool, action = %request.action, %token,
                "control request parked for user approval");
            self.pending.insert(token.clone(), request);
            return ControlOutcome::PendingApproval { token };
        }

        let modified_by = request.requested_by;
        self.apply_mutation(&request, modified_by)
    }

    /// Requests parked behind an approval token, awaiting [`Self::resolve_approval`].
    pub fn pending_approvals(&self) -> impl Iterator<Item = (&ApprovalToken, &ControlRequest)> {
        self.pending.iter()
    }

    /// Resolve a parked request with the user's decision. Tokens are
    /// single-use: approved or denied, the entry is gone afterward.
    ///
    /// An approved mutation applies with `modified_by = User`, since the user
    /// is the authority that let it through.
    #[allow(clippy::unused_async)] // signature parity with the hosting runtime
    pub async fn resolve_approval(
        &mut self,
        token: &ApprovalToken,
        approved: bool,
    ) -> ControlOutcome {
        let Some(request) = self.pending.remove(token) else {
            return ControlOutcome::denied(ControlError::UnknownApprovalToken);
        };
        if !approved {
            let error = ControlError::ApprovalDenied;
            self.audit_append(AuditEntry {
                timestamp_ms: now_ms(),
                action: request.action,
                tool: request.tool,
                requested_by: request.requested_by,
                success: false,
                details: AuditDetails {
                    reason: request.reason,
                    duration_ms: request.duration_ms,
                    error: Some(error.to_string()),
                },
            });
            return ControlOutcome::denied(error);
        }
        self.apply_mutation(&request, Actor::User)
    }

    /// Whether a tool may run right now.
    ///
    /// Unregistered tools default to enabled (fail-open: registration, not
    /// this engine, decides what exists). An elapsed temporary disable is
    /// repaired here before answering, so a read is also a reconciliation.
    pub fn is_tool_enabled(&mut self, tool: &ToolId) -> bool {
        let now = now_ms();
        let Some(state) = self.states.get_mut(tool) else {
            return true;
        };
        let expired = expire_if_elapsed(state, now);
        let enabled = state.enabled;
        if expired {
            self.persist();
        }
        enabled
    }

    /// Bulk sweep applying the same expiry rule as [`Self::is_tool_enabled`].
    /// Persists once if anything changed. Cadence is the caller's concern.
    pub fn cleanup_expired_disables(&mut self) {
        let now = now_ms();
        let mut changed = false;
        for state in self.states.values_mut() {
            changed |= expire_if_elapsed(state, now);
        }
        if changed {
            self.persist();
        }
    }

    /// Fold one tool execution into its usage stats. No-op for unregistered
    /// tools; called by the execution path after every invocation.
    pub fn record_tool_usage(&mut self, tool: &ToolId, success: bool, execution_ms: u64) {
        let now = now_ms();
        let Some(state) = self.states.get_mut(tool) else {
            return;
        };
        state.usage.record(success, execution_ms, now);
        self.persist();
    }

    /// The most recent `limit` audit entries, newest last.
    #[must_use]
    pub fn audit_log(&self, limit: usize) -> Vec<AuditEntry> {
        self.audit.recent(limit)
    }

    #[must_use]
    pub fn audit_len(&self) -> usize {
        self.audit.len()
    }

    /// Apply an enable/disable that already passed every gate.
    fn apply_mutation(&mut self, request: &ControlRequest, modified_by: Actor) -> ControlOutcome {
        let now = now_ms();
        let Some(state) = self.states.get_mut(&request.tool) else {
            // A parked approval can outlive registration churn.
            return ControlOutcome::denied(ControlError::NotFound);
        };
        match request.action {
            ToolAction::Enable => {
                state.enabled = true;
                state.temporary_disable_until_ms = None;
                state.disable_reason = None;
            }
            ToolAction::Disable => {
                state.enabled = false;
                // Saturate: a window past i64 millis must stay in the future,
                // not wrap negative and expire on the next read.
                state.temporary_disable_until_ms = request.duration_ms.map(|duration_ms| {
                    i64::try_from(duration_ms).map_or(i64::MAX, |d| now.saturating_add(d))
                });
                state.disable_reason = request.reason.clone();
            }
            ToolAction::Query => {
                return ControlOutcome::Applied {
                    enabled: state.enabled,
                };
            }
        }
        state.dynamically_controlled = true;
        state.last_modified_ms = now;
        state.modified_by = modified_by;
        let enabled = state.enabled;
        tracing::debug!(tool = %request.tool, action = %request.action, %modified_by, enabled,
            "control request applied");

        self.persist();
        self.audit_append(AuditEntry {
            timestamp_ms: now,
            action: request.action,
            tool: request.tool.clone(),
            requested_by: request.requested_by,
            success: true,
            details: AuditDetails {
                reason: request.reason.clone(),
                duration_ms: request.duration_ms,
                error: None,
            },
        });
        ControlOutcome::Applied { enabled }
    }

    fn audit_append(&mut self, entry: AuditEntry) {
        if self.config.audit_logging {
            self.audit.push(entry);
        }
    }

    /// Write-through save. Failures are logged and absorbed: the in-memory
    /// map stays authoritative for the running session.
    fn persist(&self) {
        let snapshot = ControlSnapshot {
            states: self.states.clone(),
            config: self.raw_config.clone(),
        };
        if let Err(error) = self.store.save(&snapshot) {
            tracing::warn!("failed to persist tool control snapshot: {error:#}");
        }
    }
}
