use crate::helpers::{api, input, FakeCloud};
use nicswap::types::{ApplyMode, RunMode, RunState};

#[test]
fn failed_inverse_reports_only_older_steps() {
    let cloud = FakeCloud::zerto_pair();
    // Step 5 fails; rollback undoes step 4 (call 6) and then fails on step 3 (call 7).
    cloud.fail_mutation(5).fail_mutation(7);
    let (api, facts, audit) = api(&cloud);

    let report = api.run(&input(), RunMode::Apply, ApplyMode::Commit);

    assert_eq!(report.state, RunState::RollbackFailed);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.undone.len(), 1);
    assert!(report.rollback_error.is_some());

    let positions: Vec<usize> = report.leftovers.iter().map(|l| l.position).collect();
    assert_eq!(positions, vec![2, 1]);
    assert_eq!(report.leftovers[1].inverse.kind(), "delete_nic");

    // Nothing older than the failed inverse was attempted.
    assert_eq!(cloud.mutations().len(), 7);

    assert!(audit.contains("rollback stopped at step #3"));
    assert!(audit.contains("  step #2:"));
    assert!(audit.contains("  step #1:"));
    assert!(!audit.contains("  step #3:"));
    assert!(audit.contains("--revert"));

    let left = facts.of("leftover");
    assert_eq!(left.len(), 2);
    assert!(left.iter().all(|(d, _)| d == "warn"));
    let summary = facts.of("rollback.summary");
    assert_eq!(summary[0].0, "failure");
    assert_eq!(summary[0].1["failed_step"], 3);
}

#[test]
fn failed_inverse_of_first_step_leaves_no_older_steps() {
    let cloud = FakeCloud::zerto_pair();
    // Step 3 fails; inverses of 2 (call 4) and 1 (call 5), the latter failing.
    cloud.fail_mutation(3).fail_mutation(5);
    let (api, facts, audit) = api(&cloud);

    let report = api.run(&input(), RunMode::Apply, ApplyMode::Commit);

    assert_eq!(report.state, RunState::RollbackFailed);
    assert!(report.leftovers.is_empty());
    assert!(facts.of("leftover").is_empty());
    assert!(audit.contains("rollback stopped at step #1"));
    // The alternate NIC survives because its delete failed.
    assert!(cloud.nic_exists_at("10.0.0.9"));
}
