use std::fmt::Display;

/// Result of one enrichment stage. Stages never abort the aggregation;
/// a failure is absorbed into `Degraded` together with the substitute value
/// and a reason the caller surfaces to the frontend.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    /// The stage ran against live upstream data.
    Live(T),
    /// The stage fell back to a default; `reason` says why.
    Degraded { value: T, reason: String },
}

impl<T> StageOutcome<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        StageOutcome::Degraded {
            value,
            reason: reason.into(),
        }
    }

    /// Collapse a port call into an outcome: errors become `Degraded` with
    /// the fallback produced from the error.
    pub fn from_result<E: Display>(
        stage: &str,
        result: Result<T, E>,
        fallback: impl FnOnce(&E) -> T,
    ) -> Self {
        match result {
            Ok(value) => StageOutcome::Live(value),
            Err(e) => StageOutcome::Degraded {
                value: fallback(&e),
                reason: format!("{stage}: {e}"),
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StageOutcome::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            StageOutcome::Live(_) => None,
            StageOutcome::Degraded { reason, .. } => Some(reason),
        }
    }

    /// Hand the value over, pushing the degradation reason (if any) onto the
    /// aggregator's collector.
    pub fn collect_into(self, reasons: &mut Vec<String>) -> T {
        match self {
            StageOutcome::Live(value) => value,
            StageOutcome::Degraded { value, reason } => {
                reasons.push(reason);
                value
            }
        }
    }
}
