use crate::constants::DEFAULT_ALT_NIC_PREFIX;

use super::types::{CleanupPolicy, StartWait};

/// Policy governs how a swap is carried out.
///
/// Everything that must hold for a swap to be safe (shared resource group,
/// region and subnet; distinct addresses) is not configurable. These knobs
/// only tune behavior around it.
#[derive(Clone, Debug)]
pub struct Policy {
    pub start: StartWait,
    pub cleanup: CleanupPolicy,
    /// Infix of the generated alternate NIC name.
    pub alternate_nic_prefix: String,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            start: StartWait::FireAndForget,
            cleanup: CleanupPolicy::BestEffort,
            alternate_nic_prefix: DEFAULT_ALT_NIC_PREFIX.to_string(),
        }
    }
}

impl Policy {
    /// Generated alternate NIC name: `<vm>-<prefix>-<suffix>`.
    #[must_use]
    pub fn alternate_nic_name(&self, vm: &str, suffix: &str) -> String {
        format!("{vm}-{}-{suffix}", self.alternate_nic_prefix)
    }
}
