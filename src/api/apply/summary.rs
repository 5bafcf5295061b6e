use serde_json::{json, Value};

use crate::api::errors::{id_str, ErrorId};
use crate::logging::StageLogger;
use crate::types::{RunReport, RunState};

pub(crate) struct RunSummary {
    fields: Value,
}

impl RunSummary {
    pub(crate) fn new(report: &RunReport) -> Self {
        let fields = json!({
            "state": report.state.as_str(),
            "executed": report.executed.len(),
            "ledger_len": report.ledger_len,
            "undone": report.undone.len(),
            "warnings": report.warnings,
            "duration_ms": report.duration_ms,
            "exit_code": report.exit_code(),
        });
        Self { fields }
    }

    pub(crate) fn errors(mut self, report: &RunReport, rejected_by: Option<ErrorId>) -> Self {
        let chain: Vec<&'static str> = match report.state {
            RunState::Rejected => rejected_by.map(id_str).into_iter().collect(),
            RunState::RolledBack => vec![id_str(ErrorId::E_FORWARD)],
            RunState::RollbackFailed => {
                vec![id_str(ErrorId::E_ROLLBACK), id_str(ErrorId::E_FORWARD)]
            }
            _ => Vec::new(),
        };
        if let Some(obj) = self.fields.as_object_mut() {
            if let Some(first) = chain.first() {
                obj.insert("error_id".to_string(), json!(first));
                obj.insert("summary_error_ids".to_string(), json!(chain));
            }
            if let Some(e) = &report.error {
                obj.insert("error".to_string(), json!(e));
            }
            if !report.leftovers.is_empty() {
                let steps: Vec<usize> = report.leftovers.iter().map(|l| l.position).collect();
                obj.insert("leftover_steps".to_string(), json!(steps));
            }
        }
        self
    }

    pub(crate) fn emit(self, slog: &StageLogger<'_>, succeeded: bool) {
        let ev = slog.run_summary().merge(self.fields);
        if succeeded {
            ev.emit_success();
        } else {
            ev.emit_failure();
        }
    }
}
