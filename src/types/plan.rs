use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

use super::errors::{Error, ErrorKind, Result};

/// Which action sequence a run drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Apply,
    Revert,
}

impl RunMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RunMode::Apply => "apply",
            RunMode::Revert => "revert",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApplyMode {
    DryRun,
    #[default]
    Commit,
}

/// One mutating remote operation with typed parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    CreateNic {
        name: String,
        resource_group: String,
        location: String,
        subnet_id: String,
        address: Ipv4Addr,
    },
    DeleteNic {
        name: String,
        resource_group: String,
    },
    DeallocateVm {
        resource_group: String,
        vm: String,
    },
    StartVm {
        resource_group: String,
        vm: String,
    },
    AttachNic {
        nic: String,
        resource_group: String,
        vm: String,
    },
    DetachNic {
        nic: String,
        resource_group: String,
        vm: String,
    },
}

impl Action {
    /// Stable operation identifier.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Action::CreateNic { .. } => "create_nic",
            Action::DeleteNic { .. } => "delete_nic",
            Action::DeallocateVm { .. } => "deallocate_vm",
            Action::StartVm { .. } => "start_vm",
            Action::AttachNic { .. } => "attach_nic",
            Action::DetachNic { .. } => "detach_nic",
        }
    }

    /// Ordered string parameters, as handed to the remote call.
    #[must_use]
    pub fn params(&self) -> Vec<String> {
        match self {
            Action::CreateNic {
                name,
                resource_group,
                location,
                subnet_id,
                address,
            } => vec![
                name.clone(),
                resource_group.clone(),
                location.clone(),
                subnet_id.clone(),
                address.to_string(),
            ],
            Action::DeleteNic {
                name,
                resource_group,
            } => vec![name.clone(), resource_group.clone()],
            Action::DeallocateVm { resource_group, vm }
            | Action::StartVm { resource_group, vm } => vec![resource_group.clone(), vm.clone()],
            Action::AttachNic {
                nic,
                resource_group,
                vm,
            }
            | Action::DetachNic {
                nic,
                resource_group,
                vm,
            } => vec![nic.clone(), resource_group.clone(), vm.clone()],
        }
    }

    /// Human description used in logs and leftover listings.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Action::CreateNic {
                name,
                resource_group,
                address,
                ..
            } => format!(
                "create NIC '{name}' with address {address} in resource group '{resource_group}'"
            ),
            Action::DeleteNic {
                name,
                resource_group,
            } => format!("delete NIC '{name}' in resource group '{resource_group}'"),
            Action::DeallocateVm { resource_group, vm } => {
                format!("deallocate VM '{vm}' in resource group '{resource_group}'")
            }
            Action::StartVm { resource_group, vm } => {
                format!("start VM '{vm}' in resource group '{resource_group}'")
            }
            Action::AttachNic {
                nic,
                resource_group,
                vm,
            } => format!("attach NIC '{nic}' to VM '{vm}' in resource group '{resource_group}'"),
            Action::DetachNic {
                nic,
                resource_group,
                vm,
            } => format!("detach NIC '{nic}' from VM '{vm}' in resource group '{resource_group}'"),
        }
    }

    /// The operation that undoes this one, if any.
    ///
    /// Deleting a NIC has no inverse: its address and configuration are gone.
    #[must_use]
    pub fn inverse(&self) -> Option<Action> {
        match self {
            Action::CreateNic {
                name,
                resource_group,
                ..
            } => Some(Action::DeleteNic {
                name: name.clone(),
                resource_group: resource_group.clone(),
            }),
            Action::DeleteNic { .. } => None,
            Action::DeallocateVm { resource_group, vm } => Some(Action::StartVm {
                resource_group: resource_group.clone(),
                vm: vm.clone(),
            }),
            Action::StartVm { resource_group, vm } => Some(Action::DeallocateVm {
                resource_group: resource_group.clone(),
                vm: vm.clone(),
            }),
            Action::AttachNic {
                nic,
                resource_group,
                vm,
            } => Some(Action::DetachNic {
                nic: nic.clone(),
                resource_group: resource_group.clone(),
                vm: vm.clone(),
            }),
            Action::DetachNic {
                nic,
                resource_group,
                vm,
            } => Some(Action::AttachNic {
                nic: nic.clone(),
                resource_group: resource_group.clone(),
                vm: vm.clone(),
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A forward action paired with the inverse recorded once it succeeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedStep {
    pub action: Action,
    pub inverse: Action,
}

impl PlannedStep {
    /// # Errors
    /// Returns `ErrorKind::Plan` for actions without an inverse.
    pub fn reversible(action: Action) -> Result<Self> {
        match action.inverse() {
            Some(inverse) => Ok(Self { action, inverse }),
            None => Err(Error::new(
                ErrorKind::Plan,
                format!("'{}' cannot be undone and may not be a forward step", action.kind()),
            )),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Plan {
    pub mode: RunMode,
    pub steps: Vec<PlannedStep>,
    /// Best-effort actions run after every step succeeded; failures only warn.
    pub cleanup: Vec<Action>,
}
