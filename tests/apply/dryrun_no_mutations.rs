use crate::helpers::{api, input, FakeCloud};
use nicswap::logging::TS_ZERO;
use nicswap::types::{ApplyMode, RunMode, RunState};

#[test]
fn dry_run_resolves_but_never_mutates() {
    let cloud = FakeCloud::zerto_pair();
    let (api, facts, _) = api(&cloud);

    let report = api.run(&input(), RunMode::Apply, ApplyMode::DryRun);

    assert_eq!(report.state, RunState::Succeeded);
    assert!(report.dry_run);
    assert_eq!(report.executed.len(), 8);
    assert!(!cloud.calls().is_empty(), "lookups still happen");
    assert!(cloud.mutations().is_empty());
    assert_eq!(cloud.vm_holding("10.0.0.4").as_deref(), Some("zca-vm"));

    for (_, fields) in facts.of("apply.result") {
        assert_eq!(fields["ts"], TS_ZERO);
        assert!(fields.get("run_id").is_none());
        assert_eq!(fields["dry_run"], true);
    }
}

#[test]
fn dry_run_revert_skips_cleanup_calls() {
    let cloud = FakeCloud::zerto_pair();
    let (api, _, _) = api(&cloud);
    assert!(api.run(&input(), RunMode::Apply, ApplyMode::Commit).succeeded());
    cloud.clear_calls();

    let report = api.run(&input(), RunMode::Revert, ApplyMode::DryRun);
    assert!(report.succeeded(), "error: {:?}", report.error);
    assert_eq!(report.executed.len(), 7);
    assert!(cloud.mutations().is_empty());
    assert_eq!(cloud.vm_holding("10.0.0.9").as_deref(), Some("zca-vm"));
}
