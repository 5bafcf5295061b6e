// Facade for API module; delegates to submodules under src/api/

use std::time::Instant;

use log::Level;
use serde_json::json;

use crate::adapters::CloudClient;
use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::{ts_for_mode, AuditSink, FactsEmitter, StageLogger};
use crate::policy::Policy;
use crate::types::ids::new_run_id;
use crate::types::{
    ApplyMode, Plan, PreflightReport, RunMode, RunReport, RunState, SwapAddresses, SwapInput,
    Topology,
};

mod apply;
pub mod errors;
mod plan;
mod preflight;
mod resolve;

use apply::summary::RunSummary;
use errors::{id_str, ApiError, ErrorId};

pub struct NicSwap<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    policy: Policy,
    cloud: Box<dyn CloudClient>,
}

impl<E: FactsEmitter, A: AuditSink> NicSwap<E, A> {
    pub fn new(facts: E, audit: A, policy: Policy, cloud: Box<dyn CloudClient>) -> Self {
        Self {
            facts,
            audit,
            policy,
            cloud,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    fn audit_ctx(&self, run_mode: RunMode, mode: ApplyMode) -> AuditCtx<'_> {
        let dry = matches!(mode, ApplyMode::DryRun);
        AuditCtx::new(
            &self.facts,
            new_run_id(),
            run_mode,
            ts_for_mode(mode),
            AuditMode {
                dry_run: dry,
                redact: dry,
            },
        )
    }

    /// Look up everything the action sequence for `mode` needs. Read-only.
    pub fn resolve(&self, addrs: &SwapAddresses, mode: RunMode) -> Result<Topology, ApiError> {
        let ctx = self.audit_ctx(mode, ApplyMode::Commit);
        resolve::run(self, &StageLogger::new(&ctx), addrs, mode)
    }

    /// Pure checks on a resolved topology; no remote calls.
    pub fn preflight(&self, topo: &Topology) -> PreflightReport {
        let ctx = self.audit_ctx(topo.mode, ApplyMode::Commit);
        preflight::run(self, &StageLogger::new(&ctx), topo)
    }

    pub fn plan(&self, topo: &Topology) -> Result<Plan, ApiError> {
        let ctx = self.audit_ctx(topo.mode, ApplyMode::Commit);
        plan::build(self, &StageLogger::new(&ctx), topo)
    }

    /// Execute a plan with automatic rollback. Returns a report in a terminal state.
    ///
    /// The report carries no topology and no `run.summary` fact is emitted;
    /// both belong to [`NicSwap::run`].
    pub fn apply(&self, plan: &Plan, mode: ApplyMode) -> RunReport {
        let t0 = Instant::now();
        let ctx = self.audit_ctx(plan.mode, mode);
        let mut report = RunReport::new(plan.mode, ctx.mode.dry_run, ctx.run_id.clone());
        apply::run(self, &ctx, plan, mode, &mut report);
        debug_assert!(report.state.is_terminal());
        report.duration_ms = elapsed_ms(t0);
        report
    }

    /// Full run: validate, resolve, preflight, plan, apply.
    pub fn run(&self, input: &SwapInput, run_mode: RunMode, mode: ApplyMode) -> RunReport {
        let t0 = Instant::now();
        let ctx = self.audit_ctx(run_mode, mode);
        let slog = StageLogger::new(&ctx);
        let mut report = RunReport::new(run_mode, ctx.mode.dry_run, ctx.run_id.clone());
        self.audit.log(Level::Info, &format!("{run_mode}: starting"));

        let mut rejected_by = None;
        match self.prepare(&slog, input, run_mode) {
            Ok((topo, plan)) => {
                report.topology = Some(topo);
                apply::run(self, &ctx, &plan, mode, &mut report);
            }
            Err(e) => {
                rejected_by = Some(e.id());
                report.error = Some(e.to_string());
                report.state = RunState::Rejected;
            }
        }
        debug_assert!(report.state.is_terminal());
        report.duration_ms = elapsed_ms(t0);

        let finished = match report.state {
            RunState::Succeeded => "finished successfully",
            RunState::Rejected => "rejected; nothing was changed",
            RunState::RolledBack => "failed; all completed steps were rolled back",
            _ => "failed; rollback did not complete",
        };
        let level = if report.succeeded() {
            Level::Info
        } else {
            Level::Error
        };
        self.audit.log(level, &format!("{run_mode}: {finished}"));
        RunSummary::new(&report)
            .errors(&report, rejected_by)
            .emit(&slog, report.succeeded());
        report
    }

    fn prepare(
        &self,
        slog: &StageLogger<'_>,
        input: &SwapInput,
        mode: RunMode,
    ) -> Result<(Topology, Plan), ApiError> {
        let addrs = input.parse().map_err(|e| {
            let err = ApiError::from(e);
            self.audit.log(Level::Error, &err.to_string());
            slog.preflight()
                .merge(json!({
                    "error": err.to_string(),
                    "error_id": id_str(ErrorId::E_CONFIG),
                }))
                .emit_failure();
            err
        })?;
        let topo = resolve::run(self, slog, &addrs, mode)?;
        let report = preflight::run(self, slog, &topo);
        if !report.ok {
            return Err(ApiError::Precondition(report.stops));
        }
        let plan = plan::build(self, slog, &topo)?;
        Ok((topo, plan))
    }
}

fn elapsed_ms(t0: Instant) -> u64 {
    u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX)
}
