//! Builds the ordered action sequence for a run mode.
//!
//! Order is fixed: the alternate NIC exists before any VM goes down, both
//! VMs are deallocated before NICs move, and NICs are in place before
//! either VM starts again.
use serde_json::json;

use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::policy::{CleanupPolicy, Policy};
use crate::types::errors::Result;
use crate::types::ids::{action_id, plan_id};
use crate::types::{Action, Plan, PlannedStep, RunMode, Topology};

use super::errors::ApiError;
use super::NicSwap;

fn apply_actions(topo: &Topology) -> Vec<Action> {
    let rg = topo.resource_group().to_string();
    let zca = topo.zca.vm.clone();
    let app = topo.appliance.vm.clone();
    vec![
        Action::CreateNic {
            name: topo.alternate_nic.clone(),
            resource_group: rg.clone(),
            location: topo.zca.region.clone(),
            subnet_id: topo.zca.subnet_id.clone(),
            address: topo.addresses.alternate,
        },
        Action::DeallocateVm {
            resource_group: rg.clone(),
            vm: zca.clone(),
        },
        Action::DeallocateVm {
            resource_group: rg.clone(),
            vm: app.clone(),
        },
        Action::DetachNic {
            nic: topo.original_nic.clone(),
            resource_group: rg.clone(),
            vm: zca.clone(),
        },
        Action::AttachNic {
            nic: topo.original_nic.clone(),
            resource_group: rg.clone(),
            vm: app.clone(),
        },
        Action::AttachNic {
            nic: topo.alternate_nic.clone(),
            resource_group: rg.clone(),
            vm: zca.clone(),
        },
        Action::StartVm {
            resource_group: rg.clone(),
            vm: zca,
        },
        Action::StartVm {
            resource_group: rg,
            vm: app,
        },
    ]
}

fn revert_actions(topo: &Topology) -> Vec<Action> {
    let rg = topo.resource_group().to_string();
    let zca = topo.zca.vm.clone();
    let app = topo.appliance.vm.clone();
    vec![
        Action::DeallocateVm {
            resource_group: rg.clone(),
            vm: zca.clone(),
        },
        Action::DeallocateVm {
            resource_group: rg.clone(),
            vm: app.clone(),
        },
        Action::DetachNic {
            nic: topo.original_nic.clone(),
            resource_group: rg.clone(),
            vm: app.clone(),
        },
        Action::AttachNic {
            nic: topo.original_nic.clone(),
            resource_group: rg.clone(),
            vm: zca.clone(),
        },
        Action::DetachNic {
            nic: topo.alternate_nic.clone(),
            resource_group: rg.clone(),
            vm: zca.clone(),
        },
        Action::StartVm {
            resource_group: rg.clone(),
            vm: zca,
        },
        Action::StartVm {
            resource_group: rg,
            vm: app,
        },
    ]
}

/// Pure plan construction; no facts.
pub(crate) fn for_topology(topo: &Topology, policy: &Policy) -> Result<Plan> {
    let (actions, cleanup) = match topo.mode {
        RunMode::Apply => (apply_actions(topo), Vec::new()),
        RunMode::Revert => {
            let cleanup = match policy.cleanup {
                CleanupPolicy::BestEffort => vec![Action::DeleteNic {
                    name: topo.alternate_nic.clone(),
                    resource_group: topo.resource_group().to_string(),
                }],
                CleanupPolicy::Skip => Vec::new(),
            };
            (revert_actions(topo), cleanup)
        }
    };
    let steps = actions
        .into_iter()
        .map(PlannedStep::reversible)
        .collect::<Result<Vec<_>>>()?;
    Ok(Plan {
        mode: topo.mode,
        steps,
        cleanup,
    })
}

/// Build the plan and emit one plan fact per step.
pub(crate) fn build<E: FactsEmitter, A: AuditSink>(
    api: &NicSwap<E, A>,
    slog: &StageLogger<'_>,
    topo: &Topology,
) -> std::result::Result<Plan, ApiError> {
    let plan = for_topology(topo, &api.policy)?;
    let pid = plan_id(&plan);
    for (idx, step) in plan.steps.iter().enumerate() {
        slog.plan()
            .action(action_id(&pid, &step.action, idx).to_string())
            .step(idx + 1)
            .merge(json!({
                "plan_id": pid.to_string(),
                "action": step.action,
                "inverse": step.inverse,
            }))
            .emit_success();
    }
    Ok(plan)
}
