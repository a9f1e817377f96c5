//! Per-tool usage counters.

/// Observed execution history for one tool.
///
/// Invariant: `successful_calls + failed_calls == total_calls`. Timestamps
/// are unix milliseconds with `0` meaning "never"; `first_used_ms` is set
/// once and never moves afterward.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolUsageStats {
    pub total_calls: u64,
    pub successful_calls: u64,
    pub failed_calls: u64,
    pub last_used_ms: i64,
    pub first_used_ms: i64,
    /// Running mean of execution time in milliseconds.
    pub avg_execution_ms: f64,
}

impl ToolUsageStats {
    /// Fold one execution into the counters.
    ///
    /// The mean is updated incrementally:
    /// `new = (old * (n - 1) + sample) / n` for `n` = calls including this one.
    pub fn record(&mut self, success: bool, execution_ms: u64, now_ms: i64) {
        self.total_calls += 1;
        if success {
            self.successful_calls += 1;
        } else {
            self.failed_calls += 1;
        }
        self.last_used_ms = now_ms;
        if self.first_used_ms == 0 {
            self.first_used_ms = now_ms;
        }
        let n = self.total_calls as f64;
        self.avg_execution_ms = (self.avg_execution_ms * (n - 1.0) + execution_ms as f64) / n;
    }
}
