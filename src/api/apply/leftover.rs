use log::Level;
use serde_json::json;

use crate::api::NicSwap;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::{Ledger, LeftoverStep};

/// Steps older than `failed_position` that were never undone, tail-to-head.
pub(crate) fn collect(ledger: &Ledger, failed_position: usize) -> Vec<LeftoverStep> {
    ledger
        .before(failed_position)
        .map(|s| LeftoverStep {
            position: s.position,
            description: s.description.clone(),
            inverse: s.inverse.clone(),
        })
        .collect()
}

/// Tell the operator exactly what is left to undo by hand, and in what order.
pub(crate) fn report<E: FactsEmitter, A: AuditSink>(
    api: &NicSwap<E, A>,
    ledger: &Ledger,
    failed_position: usize,
    slog: &StageLogger<'_>,
) -> Vec<LeftoverStep> {
    let leftovers = collect(ledger, failed_position);
    api.audit.log(
        Level::Error,
        &format!("rollback stopped at step #{failed_position}; the system is partially migrated"),
    );
    api.audit.log(
        Level::Error,
        &format!(
            "undo step #{failed_position} and then the following steps manually, in this order:"
        ),
    );
    for l in &leftovers {
        api.audit.log(Level::Error, &format!("  step #{}: {}", l.position, l.description));
        slog.leftover()
            .step(l.position)
            .merge(json!({
                "description": l.description,
                "inverse": l.inverse,
            }))
            .emit_warn();
    }
    if leftovers.is_empty() {
        api.audit.log(Level::Error, "  (no older steps remain)");
    }
    api.audit.log(
        Level::Error,
        "afterwards re-run with --revert and the same three addresses, or contact support",
    );
    leftovers
}
