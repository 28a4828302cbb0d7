//! Per-item outcomes of apply / rollback batches

use std::fmt;
use std::time::Duration;

/// What happened to one migration in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Forward section executed and ledger record written
    Applied,
    /// Reverse section executed and ledger record removed
    RolledBack,
    /// Left untouched; the batch continued
    Skipped { reason: String },
    /// Execution or ledger write failed; the batch stopped here
    Failed { error: String },
}

/// Outcome of a single migration
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    /// Migration filename
    pub name: String,

    /// Result for this migration
    pub status: OutcomeStatus,

    /// Time spent on this migration
    pub duration: Duration,
}

impl ItemOutcome {
    pub fn applied(name: &str, duration: Duration) -> Self {
        Self::new(name, OutcomeStatus::Applied, duration)
    }

    pub fn rolled_back(name: &str, duration: Duration) -> Self {
        Self::new(name, OutcomeStatus::RolledBack, duration)
    }

    pub fn skipped(name: &str, reason: impl Into<String>, duration: Duration) -> Self {
        Self::new(
            name,
            OutcomeStatus::Skipped {
                reason: reason.into(),
            },
            duration,
        )
    }

    pub fn failed(name: &str, error: impl fmt::Display, duration: Duration) -> Self {
        Self::new(
            name,
            OutcomeStatus::Failed {
                error: error.to_string(),
            },
            duration,
        )
    }

    fn new(name: &str, status: OutcomeStatus, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            status,
            duration,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            OutcomeStatus::Applied => write!(f, "Migration applied: {}", self.name),
            OutcomeStatus::RolledBack => write!(f, "Rolled back migration: {}", self.name),
            OutcomeStatus::Skipped { reason } => {
                write!(f, "Skipped migration {}: {}", self.name, reason)
            }
            OutcomeStatus::Failed { error } => {
                write!(f, "Failed migration {}: {}", self.name, error)
            }
        }
    }
}

/// Ordered outcomes of one apply or rollback invocation.
///
/// At most one entry is a failure, and when present it is the last entry:
/// nothing after a failure is attempted.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub(crate) fn push(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    /// Nothing was pending / nothing was available to roll back.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// The failure that stopped the batch, if any.
    pub fn failure(&self) -> Option<&ItemOutcome> {
        self.outcomes.iter().find(|o| o.is_failure())
    }

    /// Whether the batch ran to completion.
    pub fn is_success(&self) -> bool {
        self.failure().is_none()
    }

    /// Names of migrations with the given status kind, in batch order.
    pub fn names_where(&self, pred: impl Fn(&OutcomeStatus) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| pred(&o.status))
            .map(|o| o.name.as_str())
            .collect()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_outcomes(&self.outcomes)
    }
}

/// Counts per outcome kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub applied: usize,
    pub rolled_back: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duration: Duration,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ItemOutcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome.status {
                    OutcomeStatus::Applied => summary.applied += 1,
                    OutcomeStatus::RolledBack => summary.rolled_back += 1,
                    OutcomeStatus::Skipped { .. } => summary.skipped += 1,
                    OutcomeStatus::Failed { .. } => summary.failed += 1,
                }
                summary.duration += outcome.duration;
                summary
            })
    }
}
