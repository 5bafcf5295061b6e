use std::net::Ipv4Addr;

use serde::Serialize;

use super::addresses::SwapAddresses;
use super::plan::RunMode;

/// Resolved identity of one VM and the NIC serving a given address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub address: Ipv4Addr,
    pub vm: String,
    pub nic: String,
    pub resource_group: String,
    pub region: String,
    pub subnet_id: String,
}

/// Everything the action sequence needs, resolved once per run.
///
/// In apply mode the ZCA endpoint is looked up at the original address and
/// `original_nic == zca.nic`. In revert mode it is looked up at the alternate
/// address, so `zca.nic` is the alternate NIC and `original_nic` is found by
/// its address on the appliance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Topology {
    pub mode: RunMode,
    pub addresses: SwapAddresses,
    pub zca: Endpoint,
    pub appliance: Endpoint,
    pub original_nic: String,
    pub alternate_nic: String,
    /// Apply only: some NIC already holds the alternate address.
    pub alternate_in_use: bool,
}

impl Topology {
    /// Resource group every action runs in.
    #[must_use]
    pub fn resource_group(&self) -> &str {
        &self.zca.resource_group
    }
}
