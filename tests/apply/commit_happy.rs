use crate::helpers::fake_cloud::Power;
use crate::helpers::{api, input, FakeCloud};
use log::Level;
use nicswap::types::{Action, ApplyMode, RunMode, RunState};

#[test]
fn apply_moves_both_addresses_and_records_every_step() {
    let cloud = FakeCloud::zerto_pair();
    let (api, facts, audit) = api(&cloud);

    let report = api.run(&input(), RunMode::Apply, ApplyMode::Commit);

    assert_eq!(report.state, RunState::Succeeded, "error: {:?}", report.error);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.ledger_len, 8);
    assert_eq!(report.executed.len(), 8);
    assert!(report.undone.is_empty());
    assert!(report.leftovers.is_empty());

    // ZCA answers on the alternate address; the appliance now holds the old ZCA address.
    assert_eq!(cloud.vm_holding("10.0.0.9").as_deref(), Some("zca-vm"));
    assert_eq!(cloud.vm_holding("10.0.0.4").as_deref(), Some("zvm-vm"));
    assert_eq!(cloud.vm_holding("10.0.0.5").as_deref(), Some("zvm-vm"));
    assert_eq!(cloud.power("zca-vm"), Some(Power::Running));
    assert_eq!(cloud.power("zvm-vm"), Some(Power::Running));

    assert!(facts.of("rollback").is_empty());
    assert!(facts.of("rollback.summary").is_empty());
    let results = facts.of("apply.result");
    assert_eq!(results.len(), 8);
    assert!(results.iter().all(|(d, _)| d == "success"));
    let summary = facts.of("run.summary");
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].0, "success");
    assert!(audit.contains("step 8/8"));
}

#[test]
fn step_lines_are_debug_and_outcome_lines_are_info() {
    let cloud = FakeCloud::zerto_pair();
    let (api, _, audit) = api(&cloud);

    let report = api.run(&input(), RunMode::Apply, ApplyMode::Commit);
    assert!(report.succeeded());

    assert_eq!(audit.level_of("step 1/8:"), Some(Level::Debug));
    assert_eq!(audit.level_of("step 8/8:"), Some(Level::Debug));
    assert_eq!(audit.level_of("apply: starting"), Some(Level::Info));
    assert_eq!(audit.level_of("apply: finished successfully"), Some(Level::Info));
}

#[test]
fn apply_step_order_hands_original_nic_to_appliance_at_step_five() {
    let cloud = FakeCloud::zerto_pair();
    let (api, _, _) = api(&cloud);

    let report = api.run(&input(), RunMode::Apply, ApplyMode::Commit);
    assert!(report.succeeded());

    let kinds: Vec<&str> = report.executed.iter().map(Action::kind).collect();
    assert_eq!(
        kinds,
        vec![
            "create_nic",
            "deallocate_vm",
            "deallocate_vm",
            "detach_nic",
            "attach_nic",
            "attach_nic",
            "start_vm",
            "start_vm",
        ]
    );
    match &report.executed[4] {
        Action::AttachNic { nic, vm, .. } => {
            assert_eq!(nic, "zca-nic");
            assert_eq!(vm, "zvm-vm");
        }
        other => panic!("unexpected step 5: {other:?}"),
    }
}

#[test]
fn apply_has_no_cleanup_and_no_warnings() {
    let cloud = FakeCloud::zerto_pair();
    let (api, facts, _) = api(&cloud);

    let report = api.run(&input(), RunMode::Apply, ApplyMode::Commit);
    assert!(report.succeeded());
    assert!(report.warnings.is_empty());
    assert!(facts.of("cleanup").is_empty());
    assert!(!cloud.mutations().iter().any(|c| c.op == "delete_nic"));
}

#[test]
fn every_fact_carries_the_envelope() {
    let cloud = FakeCloud::zerto_pair();
    let (api, facts, _) = api(&cloud);

    let report = api.run(&input(), RunMode::Apply, ApplyMode::Commit);
    assert!(report.succeeded());

    let events = facts.events.lock().unwrap();
    assert!(!events.is_empty());
    for (subsystem, _, _, fields) in events.iter() {
        assert_eq!(subsystem, "nicswap");
        assert_eq!(fields["schema_version"], 1);
        assert_eq!(fields["run_id"], report.run_id.as_str());
        assert_eq!(fields["mode"], "apply");
    }
}
