use log::Level;
use serde_json::json;

use crate::adapters::CloudError;
use crate::api::errors::{id_str, ErrorId};
use crate::api::NicSwap;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::{Action, Ledger};

use super::executor;

#[derive(Debug)]
pub(crate) enum RollbackOutcome {
    /// Every recorded step was undone (trivially so for an empty ledger).
    Completed { undone: Vec<Action> },
    /// The inverse at `position` failed; nothing older was attempted.
    Failed {
        position: usize,
        error: CloudError,
        undone: Vec<Action>,
    },
}

/// Undo the ledger tail-to-head, stopping at the first inverse that fails.
pub(crate) fn do_rollback<E: FactsEmitter, A: AuditSink>(
    api: &NicSwap<E, A>,
    ledger: &Ledger,
    slog: &StageLogger<'_>,
) -> RollbackOutcome {
    let mut undone = Vec::new();
    api.audit.log(
        Level::Info,
        &format!("rolling back {} completed step(s)", ledger.len()),
    );
    for step in ledger.iter_rev() {
        api.audit.log(
            Level::Info,
            &format!("undo step #{}: {}", step.position, step.description),
        );
        match executor::invoke(api.cloud.as_ref(), &api.policy, &step.inverse) {
            Ok(_) => {
                slog.rollback()
                    .step(step.position)
                    .field("inverse", json!(step.inverse))
                    .emit_success();
                undone.push(step.inverse.clone());
            }
            Err(error) => {
                api.audit.log(
                    Level::Error,
                    &format!("undo step #{} failed: {error}", step.position),
                );
                slog.rollback()
                    .step(step.position)
                    .merge(json!({
                        "inverse": step.inverse,
                        "error": error.to_string(),
                        "error_id": id_str(ErrorId::E_ROLLBACK),
                    }))
                    .emit_failure();
                return RollbackOutcome::Failed {
                    position: step.position,
                    error,
                    undone,
                };
            }
        }
    }
    RollbackOutcome::Completed { undone }
}

pub(crate) fn emit_summary(slog: &StageLogger<'_>, outcome: &RollbackOutcome) {
    match outcome {
        RollbackOutcome::Completed { undone } => slog
            .rollback_summary()
            .field("undone", json!(undone.len()))
            .emit_success(),
        RollbackOutcome::Failed {
            position, undone, ..
        } => slog
            .rollback_summary()
            .merge(json!({
                "undone": undone.len(),
                "failed_step": position,
                "error_id": id_str(ErrorId::E_ROLLBACK),
                "summary_error_ids": [id_str(ErrorId::E_ROLLBACK), id_str(ErrorId::E_FORWARD)],
            }))
            .emit_failure(),
    }
}
