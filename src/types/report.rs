use serde::Serialize;

use super::plan::{Action, RunMode};
use super::topology::Topology;

/// States of a run. Only the terminal ones appear in a finished report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Validating,
    Applying,
    RollingBack,
    /// Validation, resolution or preconditions failed; nothing was mutated.
    Rejected,
    Succeeded,
    /// A forward action failed and every recorded step was undone.
    RolledBack,
    /// An inverse failed; leftovers must be handled by hand.
    RollbackFailed,
}

impl RunState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RunState::Validating => "validating",
            RunState::Applying => "applying",
            RunState::RollingBack => "rolling_back",
            RunState::Rejected => "rejected",
            RunState::Succeeded => "succeeded",
            RunState::RolledBack => "rolled_back",
            RunState::RollbackFailed => "rollback_failed",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Rejected
                | RunState::Succeeded
                | RunState::RolledBack
                | RunState::RollbackFailed
        )
    }
}

/// An inverse that was never attempted because rollback stopped earlier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeftoverStep {
    /// 1-based position from the ledger head.
    pub position: usize,
    pub description: String,
    pub inverse: Action,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub mode: RunMode,
    pub dry_run: bool,
    pub state: RunState,
    pub run_id: String,
    pub topology: Option<Topology>,
    /// Forward actions that completed, in order.
    pub executed: Vec<Action>,
    /// Ledger size when the forward pass stopped.
    pub ledger_len: usize,
    /// Inverses that completed during rollback, in the order run.
    pub undone: Vec<Action>,
    pub error: Option<String>,
    pub rollback_error: Option<String>,
    pub leftovers: Vec<LeftoverStep>,
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

impl RunReport {
    pub(crate) fn new(mode: RunMode, dry_run: bool, run_id: String) -> Self {
        Self {
            mode,
            dry_run,
            state: RunState::Validating,
            run_id,
            topology: None,
            executed: Vec::new(),
            ledger_len: 0,
            undone: Vec::new(),
            error: None,
            rollback_error: None,
            leftovers: Vec::new(),
            warnings: Vec::new(),
            duration_ms: 0,
        }
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.state == RunState::Succeeded
    }

    /// Process exit code: 0 on success, 1 on any failure including a clean rollback.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.succeeded() {
            0
        } else {
            1
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct PreflightReport {
    pub ok: bool,
    /// Human-readable reasons the run must not proceed.
    pub stops: Vec<String>,
}
