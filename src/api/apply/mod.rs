//! Apply stage: runs the planned steps, recording each inverse, and drives
//! rollback and leftover reporting when a step fails.
//!
//! Side-effects:
//! - Emits `apply.attempt` and `apply.result` facts per step.
//! - On the first failure, undoes the ledger tail-to-head (`rollback` facts
//!   plus a `rollback.summary`) and, if an inverse fails, lists the steps
//!   that were never undone (`leftover` facts).
//! - After a fully successful forward pass, runs best-effort cleanup.
//! - In dry-run, issues no remote calls and never rolls back.

use log::Level;
use serde_json::json;

use crate::api::errors::{id_str, ErrorId};
use crate::api::NicSwap;
use crate::logging::audit::AuditCtx;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::ids::{action_id, plan_id};
use crate::types::{ApplyMode, Ledger, Plan, RunReport, RunState};

mod cleanup;
mod executor;
mod leftover;
mod rollback;
pub(crate) mod summary;

use rollback::RollbackOutcome;

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &NicSwap<E, A>,
    ctx: &AuditCtx<'_>,
    plan: &Plan,
    mode: ApplyMode,
    report: &mut RunReport,
) {
    let dry = matches!(mode, ApplyMode::DryRun);
    let pid = plan_id(plan);
    let tctx = ctx.with_plan_id(pid.to_string());
    let slog = StageLogger::new(&tctx);
    let total = plan.steps.len();
    let mut ledger = Ledger::new();
    let mut failure = None;

    report.state = RunState::Applying;
    for (idx, step) in plan.steps.iter().enumerate() {
        let aid = action_id(&pid, &step.action, idx).to_string();
        let fields = json!({
            "action": step.action,
            "inverse": step.inverse,
        });
        api.audit.log(
            Level::Debug,
            &format!("step {}/{total}: {}", idx + 1, step.action.describe()),
        );
        slog.apply_attempt()
            .action(aid.clone())
            .step(idx + 1)
            .merge(fields.clone())
            .emit_success();

        let outcome = if dry {
            Ok(None)
        } else {
            executor::invoke(api.cloud.as_ref(), &api.policy, &step.action)
        };
        match outcome {
            Ok(provider_id) => {
                slog.apply_result()
                    .action(aid)
                    .step(idx + 1)
                    .merge(fields)
                    .field("provider_id", json!(provider_id))
                    .emit_success();
                ledger.record(step.action.clone(), step.inverse.clone());
                report.executed.push(step.action.clone());
            }
            Err(e) => {
                api.audit.log(
                    Level::Error,
                    &format!("step {}/{total} failed: {e}", idx + 1),
                );
                slog.apply_result()
                    .action(aid)
                    .step(idx + 1)
                    .merge(fields)
                    .merge(json!({
                        "error": e.to_string(),
                        "error_id": id_str(ErrorId::E_FORWARD),
                    }))
                    .emit_failure();
                failure = Some(e);
                break;
            }
        }
    }
    report.ledger_len = ledger.len();

    let Some(error) = failure else {
        report.warnings.extend(cleanup::run(api, &plan.cleanup, dry, &slog));
        report.state = RunState::Succeeded;
        return;
    };

    report.error = Some(error.to_string());
    report.state = RunState::RollingBack;
    let outcome = rollback::do_rollback(api, &ledger, &slog);
    rollback::emit_summary(&slog, &outcome);
    match outcome {
        RollbackOutcome::Completed { undone } => {
            api.audit.log(
                Level::Info,
                "rollback succeeded; the original configuration is restored",
            );
            report.undone = undone;
            report.state = RunState::RolledBack;
        }
        RollbackOutcome::Failed {
            position,
            error,
            undone,
        } => {
            report.undone = undone;
            report.rollback_error = Some(error.to_string());
            report.leftovers = leftover::report(api, &ledger, position, &slog);
            report.state = RunState::RollbackFailed;
        }
    }
}
