//! Preflight stage: pure checks that gate the apply path.
//!
//! Runs on a resolved topology only; issues no remote calls and records
//! nothing in the ledger. A revert run has no preflight beyond address
//! validation and resolution.
use log::Level;
use serde_json::json;

use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::{PreflightReport, RunMode, Topology};

use super::errors::{id_str, ErrorId};
use super::NicSwap;

/// Every reason the apply sequence cannot run against `topo`.
pub(crate) fn stops(topo: &Topology) -> Vec<String> {
    let mut stops = Vec::new();
    if topo.mode != RunMode::Apply {
        return stops;
    }
    let (zca, app) = (&topo.zca, &topo.appliance);
    if !zca.resource_group.eq_ignore_ascii_case(&app.resource_group) {
        stops.push(format!(
            "resource groups differ: ZCA NIC '{}' is in '{}', appliance NIC '{}' is in '{}'",
            zca.nic, zca.resource_group, app.nic, app.resource_group
        ));
    }
    if zca.region != app.region {
        stops.push(format!(
            "regions differ: ZCA VM '{}' is in '{}', appliance VM '{}' is in '{}'",
            zca.vm, zca.region, app.vm, app.region
        ));
    }
    if zca.subnet_id != app.subnet_id {
        stops.push(format!(
            "subnets differ: ZCA NIC uses '{}', appliance NIC uses '{}'",
            zca.subnet_id, app.subnet_id
        ));
    }
    if topo.alternate_in_use {
        stops.push(format!(
            "alternative address {} is already assigned to a NIC",
            topo.addresses.alternate
        ));
    }
    stops
}

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &NicSwap<E, A>,
    slog: &StageLogger<'_>,
    topo: &Topology,
) -> PreflightReport {
    let stops = stops(topo);
    let ok = stops.is_empty();
    if ok {
        api.audit.log(Level::Debug, "preflight: all checks passed");
        slog.preflight().emit_success();
    } else {
        for s in &stops {
            api.audit.log(Level::Error, &format!("preflight: {s}"));
        }
        slog.preflight()
            .merge(json!({
                "stops": stops,
                "error_id": id_str(ErrorId::E_PRECONDITION),
            }))
            .emit_failure();
    }
    PreflightReport { ok, stops }
}
