//! Read-only lookup of the VMs, NICs and placement the action sequence needs.
//!
//! Apply resolves the ZCA VM at the original address; revert resolves it at
//! the alternate address, because that is where a prior apply left it. Both
//! start from scratch: nothing is carried over from an earlier run.
use std::net::Ipv4Addr;

use log::Level;
use serde_json::json;
use uuid::Uuid;

use crate::adapters::{CloudClient, CloudError};
use crate::constants::ALT_NIC_SUFFIX_LEN;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::{Endpoint, RunMode, SwapAddresses, Topology};

use super::errors::{id_str, ApiError};
use super::NicSwap;

fn endpoint(cloud: &dyn CloudClient, address: Ipv4Addr) -> Result<Endpoint, CloudError> {
    let vm = cloud.vm_by_address(address)?;
    let nic = cloud.nic_by_address(address)?.ok_or_else(|| {
        CloudError::new("resolve NIC by address", format!("no NIC holds address {address}"))
    })?;
    let resource_group = cloud.resource_group_by_address(address)?;
    let region = cloud.region_by_address(address)?;
    let subnet_id = cloud.subnet_of_nic(&nic, &resource_group)?;
    Ok(Endpoint {
        address,
        vm,
        nic,
        resource_group,
        region,
        subnet_id,
    })
}

fn alternate_suffix() -> String {
    let mut s = Uuid::new_v4().simple().to_string();
    s.truncate(ALT_NIC_SUFFIX_LEN);
    s
}

fn topology<E: FactsEmitter, A: AuditSink>(
    api: &NicSwap<E, A>,
    addrs: &SwapAddresses,
    mode: RunMode,
) -> Result<Topology, CloudError> {
    let cloud = api.cloud.as_ref();
    match mode {
        RunMode::Apply => {
            let zca = endpoint(cloud, addrs.original_zca)?;
            let appliance = endpoint(cloud, addrs.appliance)?;
            let alternate_in_use = cloud.nic_by_address(addrs.alternate)?.is_some();
            let alternate_nic = api.policy.alternate_nic_name(&zca.vm, &alternate_suffix());
            Ok(Topology {
                mode,
                addresses: *addrs,
                original_nic: zca.nic.clone(),
                zca,
                appliance,
                alternate_nic,
                alternate_in_use,
            })
        }
        RunMode::Revert => {
            let zca = endpoint(cloud, addrs.alternate)?;
            let appliance = endpoint(cloud, addrs.appliance)?;
            let original_nic = cloud.nic_by_address(addrs.original_zca)?.ok_or_else(|| {
                CloudError::new(
                    "resolve NIC by address",
                    format!("no NIC holds the original address {}", addrs.original_zca),
                )
            })?;
            Ok(Topology {
                mode,
                addresses: *addrs,
                alternate_nic: zca.nic.clone(),
                zca,
                appliance,
                original_nic,
                alternate_in_use: false,
            })
        }
    }
}

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &NicSwap<E, A>,
    slog: &StageLogger<'_>,
    addrs: &SwapAddresses,
    mode: RunMode,
) -> Result<Topology, ApiError> {
    api.audit
        .log(Level::Debug, &format!("resolving resources for {addrs}"));
    match topology(api, addrs, mode) {
        Ok(topo) => {
            api.audit.log(
                Level::Debug,
                &format!(
                    "ZCA VM '{}' (NIC '{}'), appliance VM '{}' (NIC '{}'), resource group '{}'",
                    topo.zca.vm,
                    topo.zca.nic,
                    topo.appliance.vm,
                    topo.appliance.nic,
                    topo.resource_group()
                ),
            );
            slog.resolve()
                .field("topology", json!(topo))
                .emit_success();
            Ok(topo)
        }
        Err(e) => {
            let err = ApiError::from(e);
            api.audit.log(Level::Error, &err.to_string());
            slog.resolve()
                .merge(json!({
                    "error": err.to_string(),
                    "error_id": id_str(err.id()),
                }))
                .emit_failure();
            Err(err)
        }
    }
}
