//! `CloudClient` backed by the Azure CLI.
//!
//! Every call spawns `az ... -o json` and parses stdout. Lookups list NICs
//! and match on the private address of any IP configuration.
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process::Command;

use serde::Deserialize;

use super::cloud::{CloudClient, CloudError, CloudResult, NicSpec};
use crate::constants::DEFAULT_AZ_BIN;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NicRecord {
    pub name: String,
    pub resource_group: String,
    pub location: String,
    #[serde(default)]
    pub ip_configurations: Vec<IpConfiguration>,
    #[serde(default)]
    pub virtual_machine: Option<SubResource>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IpConfiguration {
    #[serde(default, rename = "privateIPAddress")]
    pub private_ip_address: Option<String>,
    #[serde(default)]
    pub subnet: Option<SubResource>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SubResource {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedNic {
    #[serde(rename = "NewNIC")]
    new_nic: SubResource,
}

impl NicRecord {
    fn holds(&self, address: Ipv4Addr) -> bool {
        let want = address.to_string();
        self.ip_configurations
            .iter()
            .any(|c| c.private_ip_address.as_deref() == Some(want.as_str()))
    }

    fn subnet_id(&self) -> Option<&str> {
        self.ip_configurations
            .iter()
            .find_map(|c| c.subnet.as_ref().map(|s| s.id.as_str()))
    }

    fn vm_name(&self) -> Option<&str> {
        self.virtual_machine
            .as_ref()
            .and_then(|vm| last_segment(&vm.id))
    }
}

fn last_segment(id: &str) -> Option<&str> {
    id.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}

pub(crate) fn parse_nics(stdout: &str) -> CloudResult<Vec<NicRecord>> {
    serde_json::from_str(stdout)
        .map_err(|e| CloudError::new("list NICs", format!("unexpected az output: {e}")))
}

#[derive(Clone, Debug)]
pub struct AzCliClient {
    bin: PathBuf,
    subscription: Option<String>,
}

impl Default for AzCliClient {
    fn default() -> Self {
        Self {
            bin: PathBuf::from(DEFAULT_AZ_BIN),
            subscription: None,
        }
    }
}

impl AzCliClient {
    #[must_use]
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            subscription: None,
        }
    }

    #[must_use]
    pub fn with_subscription(mut self, subscription: Option<String>) -> Self {
        self.subscription = subscription;
        self
    }

    fn run(&self, operation: &'static str, args: &[&str]) -> CloudResult<String> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(args).args(["--output", "json", "--only-show-errors"]);
        if let Some(sub) = &self.subscription {
            cmd.args(["--subscription", sub.as_str()]);
        }
        let output = cmd.output().map_err(|e| {
            CloudError::new(
                operation,
                format!("could not run '{}': {e}", self.bin.display()),
            )
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CloudError::new(operation, stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn nic_holding(
        &self,
        operation: &'static str,
        address: Ipv4Addr,
    ) -> CloudResult<Option<NicRecord>> {
        let stdout = self
            .run(operation, &["network", "nic", "list"])
            .map_err(|e| CloudError::new(operation, e.message))?;
        let nics = parse_nics(&stdout).map_err(|e| CloudError::new(operation, e.message))?;
        Ok(nics.into_iter().find(|n| n.holds(address)))
    }

    fn require_nic(&self, operation: &'static str, address: Ipv4Addr) -> CloudResult<NicRecord> {
        self.nic_holding(operation, address)?
            .ok_or_else(|| CloudError::new(operation, format!("no NIC holds address {address}")))
    }
}

impl CloudClient for AzCliClient {
    fn vm_by_address(&self, address: Ipv4Addr) -> CloudResult<String> {
        let op = "resolve VM by address";
        let nic = self.require_nic(op, address)?;
        nic.vm_name().map(str::to_string).ok_or_else(|| {
            CloudError::new(
                op,
                format!("NIC '{}' holding {address} is not attached to a VM", nic.name),
            )
        })
    }

    fn nic_by_address(&self, address: Ipv4Addr) -> CloudResult<Option<String>> {
        Ok(self
            .nic_holding("resolve NIC by address", address)?
            .map(|n| n.name))
    }

    fn resource_group_by_address(&self, address: Ipv4Addr) -> CloudResult<String> {
        Ok(self
            .require_nic("resolve resource group by address", address)?
            .resource_group)
    }

    fn region_by_address(&self, address: Ipv4Addr) -> CloudResult<String> {
        Ok(self.require_nic("resolve region by address", address)?.location)
    }

    fn subnet_of_nic(&self, nic: &str, resource_group: &str) -> CloudResult<String> {
        let op = "resolve subnet by NIC";
        let stdout = self.run(op, &["network", "nic", "show", "-g", resource_group, "-n", nic])?;
        let record: NicRecord = serde_json::from_str(&stdout)
            .map_err(|e| CloudError::new(op, format!("unexpected az output: {e}")))?;
        record
            .subnet_id()
            .map(str::to_string)
            .ok_or_else(|| CloudError::new(op, format!("NIC '{nic}' has no subnet")))
    }

    fn create_nic(&self, spec: &NicSpec<'_>) -> CloudResult<String> {
        let op = "create NIC";
        let address = spec.address.to_string();
        let stdout = self.run(
            op,
            &[
                "network",
                "nic",
                "create",
                "-g",
                spec.resource_group,
                "-n",
                spec.name,
                "-l",
                spec.location,
                "--subnet",
                spec.subnet_id,
                "--private-ip-address",
                &address,
            ],
        )?;
        let created: CreatedNic = serde_json::from_str(&stdout)
            .map_err(|e| CloudError::new(op, format!("unexpected az output: {e}")))?;
        Ok(created.new_nic.id)
    }

    fn delete_nic(&self, name: &str, resource_group: &str) -> CloudResult<()> {
        self.run("delete NIC", &["network", "nic", "delete", "-g", resource_group, "-n", name])
            .map(drop)
    }

    fn deallocate_vm(&self, resource_group: &str, vm: &str) -> CloudResult<()> {
        self.run("deallocate VM", &["vm", "deallocate", "-g", resource_group, "-n", vm])
            .map(drop)
    }

    fn start_vm(&self, resource_group: &str, vm: &str, wait: bool) -> CloudResult<()> {
        let mut args = vec!["vm", "start", "-g", resource_group, "-n", vm];
        if !wait {
            args.push("--no-wait");
        }
        self.run("start VM", &args).map(drop)
    }

    fn attach_nic(&self, nic: &str, resource_group: &str, vm: &str) -> CloudResult<()> {
        self.run(
            "attach NIC to VM",
            &["vm", "nic", "add", "-g", resource_group, "--vm-name", vm, "--nics", nic],
        )
        .map(drop)
    }

    fn detach_nic(&self, nic: &str, resource_group: &str, vm: &str) -> CloudResult<()> {
        self.run(
            "detach NIC from VM",
            &["vm", "nic", "remove", "-g", resource_group, "--vm-name", vm, "--nics", nic],
        )
        .map(drop)
    }
}
