use std::net::Ipv4Addr;

use thiserror::Error;

/// A remote call failed or returned something unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}")]
pub struct CloudError {
    pub operation: &'static str,
    pub message: String,
}

impl CloudError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

pub type CloudResult<T> = std::result::Result<T, CloudError>;

/// Parameters for creating the alternate NIC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NicSpec<'a> {
    pub name: &'a str,
    pub resource_group: &'a str,
    pub location: &'a str,
    pub subnet_id: &'a str,
    pub address: Ipv4Addr,
}

/// Remote operations against the cloud provider.
///
/// Lookups are read-only; every other method mutates infrastructure. Calls
/// block until the provider answers, except `start_vm` with `wait = false`.
pub trait CloudClient {
    /// Name of the VM whose NIC holds `address`.
    fn vm_by_address(&self, address: Ipv4Addr) -> CloudResult<String>;
    /// Name of the NIC holding `address`, `None` when no NIC does.
    fn nic_by_address(&self, address: Ipv4Addr) -> CloudResult<Option<String>>;
    fn resource_group_by_address(&self, address: Ipv4Addr) -> CloudResult<String>;
    fn region_by_address(&self, address: Ipv4Addr) -> CloudResult<String>;
    fn subnet_of_nic(&self, nic: &str, resource_group: &str) -> CloudResult<String>;

    /// Returns the provider's identifier for the new NIC.
    fn create_nic(&self, spec: &NicSpec<'_>) -> CloudResult<String>;
    fn delete_nic(&self, name: &str, resource_group: &str) -> CloudResult<()>;
    fn deallocate_vm(&self, resource_group: &str, vm: &str) -> CloudResult<()>;
    fn start_vm(&self, resource_group: &str, vm: &str, wait: bool) -> CloudResult<()>;
    fn attach_nic(&self, nic: &str, resource_group: &str, vm: &str) -> CloudResult<()>;
    fn detach_nic(&self, nic: &str, resource_group: &str, vm: &str) -> CloudResult<()>;
}
