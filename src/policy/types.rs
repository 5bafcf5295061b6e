/// How `start_vm` actions are issued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StartWait {
    /// Return as soon as the provider accepts the request; guest boot is not awaited.
    #[default]
    FireAndForget,
    /// Block until the provider reports the VM running.
    Wait,
}

impl StartWait {
    #[must_use]
    pub const fn blocks(&self) -> bool {
        matches!(self, StartWait::Wait)
    }
}

/// What happens to the alternate NIC once a revert has detached it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Delete it; a failure is reported as a warning and does not fail the run.
    #[default]
    BestEffort,
    /// Leave it in place for manual removal.
    Skip,
}
