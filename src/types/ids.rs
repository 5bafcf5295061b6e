//! Deterministic UUIDv5 identifiers for plans and actions.
//!
//! The UUID namespace is derived from a stable tag (`NS_TAG`) so that
//! `plan_id` and `action_id` are reproducible across runs for the same
//! action sequence. Run IDs are random (v4).
use std::fmt::Write;
use uuid::Uuid;

use super::plan::{Action, Plan};
use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Serialize an action into a stable string used for UUIDv5 input.
fn serialize_action(a: &Action) -> String {
    format!("{}:{}", a.kind(), a.params().join("|"))
}

/// Compute a deterministic UUIDv5 for a plan by serializing its mode and
/// forward actions in order.
#[must_use]
pub fn plan_id(plan: &Plan) -> Uuid {
    let mut s = format!("{}\n", plan.mode);
    for step in &plan.steps {
        s.push_str(&serialize_action(&step.action));
        s.push('\n');
    }
    for a in &plan.cleanup {
        s.push_str("cleanup/");
        s.push_str(&serialize_action(a));
        s.push('\n');
    }
    Uuid::new_v5(&namespace(), s.as_bytes())
}

/// Compute a deterministic UUIDv5 for an action as a function of the plan ID,
/// the action's serialized form, and its position in the plan.
#[must_use]
pub fn action_id(plan_id: &Uuid, action: &Action, idx: usize) -> Uuid {
    let mut s = serialize_action(action);
    let _ = write!(s, "#{idx}");
    Uuid::new_v5(plan_id, s.as_bytes())
}

#[must_use]
pub fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}
