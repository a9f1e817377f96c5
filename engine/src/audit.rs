//! Bounded in-memory audit log.

use std::collections::VecDeque;

use toolgate_types::AuditEntry;

/// Entries retained before the oldest is silently dropped.
pub const AUDIT_LOG_CAPACITY: usize = 1000;

/// Window returned to callers that don't ask for a specific limit.
pub const DEFAULT_AUDIT_LIMIT: usize = 100;

/// Append-only ring of recent control actions.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: VecDeque<AuditEntry>,
}

impl AuditLog {
    pub fn push(&mut self, entry: AuditEntry) {
        if self.entries.len() == AUDIT_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// The most recent `limit` entries, oldest first (newest last).
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<AuditEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use toolgate_types::{Actor, AuditDetails, ToolAction};

    use super::*;

    fn entry(n: i64) -> AuditEntry {
        AuditEntry {
            timestamp_ms: n,
            action: ToolAction::Disable,
            tool: "srv:echo".parse().expect("valid id"),
            requested_by: Actor::Agent,
            success: true,
            details: AuditDetails::default(),
        }
    }

    #[test]
    fn recent_returns_newest_last() {
        let mut log = AuditLog::default();
        for n in 0..5 {
            log.push(entry(n));
        }
        let window = log.recent(3);
        let stamps: Vec<i64> = window.iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(stamps, vec![2, 3, 4]);
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut log = AuditLog::default();
        for n in 0..(AUDIT_LOG_CAPACITY as i64 + 10) {
            log.push(entry(n));
        }
        assert_eq!(log.len(), AUDIT_LOG_CAPACITY);
        let oldest = log.recent(AUDIT_LOG_CAPACITY);
        assert_eq!(oldest.first().map(|e| e.timestamp_ms), Some(10));
    }
}
