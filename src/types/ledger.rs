//! In-memory record of completed forward steps and how to undo them.
//!
//! Positions are 1-based from the ledger head so operators can refer to
//! "step #3" in the order the steps were performed.
use serde::Serialize;

use super::plan::Action;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Step {
    pub position: usize,
    pub action: Action,
    pub inverse: Action,
    /// Human description of the inverse.
    pub description: String,
}

#[derive(Clone, Debug, Default)]
pub struct Ledger {
    steps: Vec<Step>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the inverse of a forward action that just succeeded.
    pub fn record(&mut self, action: Action, inverse: Action) -> &Step {
        let position = self.steps.len() + 1;
        let description = inverse.describe();
        self.steps.push(Step {
            position,
            action,
            inverse,
            description,
        });
        &self.steps[position - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Tail-to-head iteration; the order inverses must run in.
    pub fn iter_rev(&self) -> impl Iterator<Item = &Step> + '_ {
        self.steps.iter().rev()
    }

    /// Steps strictly older than `position`, tail-to-head.
    pub fn before(&self, position: usize) -> impl Iterator<Item = &Step> + '_ {
        let end = position.saturating_sub(1).min(self.steps.len());
        self.steps[..end].iter().rev()
    }
}
