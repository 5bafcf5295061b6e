use log::Level;
use serde_json::json;

use crate::api::errors::{id_str, ErrorId};
use crate::api::NicSwap;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::Action;

use super::executor;

/// Run best-effort actions. Failures become warnings and never trigger rollback.
pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &NicSwap<E, A>,
    actions: &[Action],
    dry: bool,
    slog: &StageLogger<'_>,
) -> Vec<String> {
    let mut warnings = Vec::new();
    for act in actions {
        api.audit.log(Level::Debug, &format!("cleanup: {}", act.describe()));
        if dry {
            slog.cleanup().field("action", json!(act)).emit_success();
            continue;
        }
        match executor::invoke(api.cloud.as_ref(), &api.policy, act) {
            Ok(_) => slog.cleanup().field("action", json!(act)).emit_success(),
            Err(e) => {
                let msg = format!(
                    "could not {}: {e}; it is unused and can be removed manually",
                    act.describe()
                );
                api.audit.log(Level::Warn, &msg);
                slog.cleanup()
                    .merge(json!({
                        "action": act,
                        "error": e.to_string(),
                        "error_id": id_str(ErrorId::E_CLEANUP),
                    }))
                    .emit_warn();
                warnings.push(msg);
            }
        }
    }
    warnings
}
