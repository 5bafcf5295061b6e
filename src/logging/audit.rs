// Audit helpers that emit facts across nicswap stages.
//
// Side-effects:
// - Emits JSON facts via `FactsEmitter` for `resolve`, `preflight`, `plan`,
//   `apply.attempt`, `apply.result`, `rollback`, `rollback.summary`,
//   `leftover`, `cleanup` and `run.summary`.
// - Ensures a minimal envelope on every fact: `schema_version`, `ts`,
//   `plan_id`, `run_id`, `mode`, `dry_run`.
// - Applies redaction in dry-run.
use crate::constants::{SCHEMA_VERSION, SUBSYSTEM};
use crate::logging::{redact_event, FactsEmitter};
use crate::types::plan::RunMode;
use serde_json::{json, Value};

#[derive(Clone, Debug, Default)]
pub(crate) struct AuditMode {
    pub dry_run: bool,
    pub redact: bool,
}

pub(crate) struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub plan_id: String,
    pub run_id: String,
    pub run_mode: RunMode,
    pub ts: String,
    pub mode: AuditMode,
}

impl<'a> AuditCtx<'a> {
    pub(crate) fn new(
        facts: &'a dyn FactsEmitter,
        run_id: String,
        run_mode: RunMode,
        ts: String,
        mode: AuditMode,
    ) -> Self {
        Self {
            facts,
            plan_id: String::new(),
            run_id,
            run_mode,
            ts,
            mode,
        }
    }

    /// Same context, stamped with the plan once it is known.
    pub(crate) fn with_plan_id(&self, plan_id: String) -> AuditCtx<'a> {
        AuditCtx {
            facts: self.facts,
            plan_id,
            run_id: self.run_id.clone(),
            run_mode: self.run_mode,
            ts: self.ts.clone(),
            mode: self.mode.clone(),
        }
    }
}

/// Stage for typed audit emission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Preflight,
    Plan,
    ApplyAttempt,
    ApplyResult,
    Rollback,
    RollbackSummary,
    Leftover,
    Cleanup,
    RunSummary,
}

impl Stage {
    pub const fn as_event(&self) -> &'static str {
        match self {
            Stage::Resolve => "resolve",
            Stage::Preflight => "preflight",
            Stage::Plan => "plan",
            Stage::ApplyAttempt => "apply.attempt",
            Stage::ApplyResult => "apply.result",
            Stage::Rollback => "rollback",
            Stage::RollbackSummary => "rollback.summary",
            Stage::Leftover => "leftover",
            Stage::Cleanup => "cleanup",
            Stage::RunSummary => "run.summary",
        }
    }
}

/// Decision severity for audit events.
#[derive(Clone, Copy, Debug)]
pub enum Decision {
    Success,
    Failure,
    Warn,
}

impl Decision {
    const fn as_str(&self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
        }
    }
}

/// Builder facade over audit emission with centralized envelope+redaction.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub(crate) fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub fn resolve(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Resolve)
    }

    pub fn preflight(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Preflight)
    }

    pub fn plan(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Plan)
    }

    pub fn apply_attempt(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::ApplyAttempt)
    }

    pub fn apply_result(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::ApplyResult)
    }

    pub fn rollback(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Rollback)
    }

    pub fn rollback_summary(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::RollbackSummary)
    }

    pub fn leftover(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Leftover)
    }

    pub fn cleanup(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Cleanup)
    }

    pub fn run_summary(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::RunSummary)
    }
}

pub struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    pub fn action(mut self, action_id: impl Into<String>) -> Self {
        self.fields.insert("action_id".into(), json!(action_id.into()));
        self
    }

    /// 1-based ledger position.
    pub fn step(mut self, position: usize) -> Self {
        self.fields.insert("step".into(), json!(position));
        self
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn merge(mut self, extra: Value) -> Self {
        if let Some(obj) = extra.as_object() {
            for (k, v) in obj {
                self.fields.insert(k.clone(), v.clone());
            }
        }
        self
    }

    pub fn emit(self, decision: Decision) {
        let mut fields = Value::Object(self.fields);
        if let Some(obj) = fields.as_object_mut() {
            obj.entry("decision").or_insert(json!(decision.as_str()));
        }
        redact_and_emit(self.ctx, self.stage.as_event(), decision.as_str(), fields);
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success)
    }

    pub fn emit_failure(self) {
        self.emit(Decision::Failure)
    }

    pub fn emit_warn(self) {
        self.emit(Decision::Warn)
    }
}

fn redact_and_emit(ctx: &AuditCtx<'_>, event: &str, decision: &str, mut fields: Value) {
    if let Some(obj) = fields.as_object_mut() {
        obj.entry("schema_version").or_insert(json!(SCHEMA_VERSION));
        obj.entry("ts").or_insert(json!(ctx.ts));
        obj.entry("plan_id").or_insert(json!(ctx.plan_id));
        obj.entry("run_id").or_insert(json!(ctx.run_id));
        obj.entry("mode").or_insert(json!(ctx.run_mode.as_str()));
        obj.entry("dry_run").or_insert(json!(ctx.mode.dry_run));
    }
    let out = if ctx.mode.redact {
        redact_event(fields)
    } else {
        fields
    };
    ctx.facts.emit(SUBSYSTEM, event, decision, out);
}
