//! Unit propagation under a partial assignment, and the RUP admissibility decision.
use std::collections::HashSet;

use crate::{constraint::Constraint, database::ConstraintDatabase, literal::Literal};

/// The outcome of a reverse-unit-propagation attempt.
#[derive(Debug, Clone)]
pub enum RupOutcome {
    /// `¬candidate` plus the database propagated to a falsified constraint. The antecedents
    /// are every constraint id that fired (propagated or falsified) during the search, in
    /// the order they fired.
    Admitted { antecedents: Vec<u64> },
    /// Propagation saturated without falsifying anything.
    Failed,
}

/// Drives unit propagation and caches which constraints have ever been useful, so later RUP
/// calls try them first. The cache only affects search order, never soundness.
#[derive(Default)]
pub struct PropagationEngine {
    known_to_propagate: HashSet<u64>,
}

impl PropagationEngine {
    pub fn new() -> Self {
        PropagationEngine::default()
    }

    /// Decides whether `candidate` is admissible by reverse unit propagation against `db`.
    pub fn rup(&mut self, db: &ConstraintDatabase, candidate: &Constraint) -> RupOutcome {
        let negated = candidate.negate();
        let mut assignment: HashSet<Literal> = negated.propagate(&HashSet::new()).into_iter().collect();
        let mut fired = Vec::new();

        loop {
            if let Some(id) = self.find_falsified(db, &assignment) {
                fired.push(id);
                self.known_to_propagate.extend(fired.iter().copied());
                return RupOutcome::Admitted { antecedents: fired };
            }

            if let Some((id, forced)) = self.find_propagating_in_core(db, &assignment) {
                assignment.extend(forced);
                fired.push(id);
                continue;
            }

            if let Some((id, forced)) = self.find_propagating_full(db, &assignment) {
                assignment.extend(forced);
                fired.push(id);
                continue;
            }

            return RupOutcome::Failed;
        }
    }

    /// Propagates to a fixpoint from `assignment`, extending it in place with every literal
    /// forced by some live constraint. Unlike [`PropagationEngine::rup`] this never stops
    /// early on falsification and never consults `known_to_propagate`; used to complete a
    /// partial `v`-line witness rather than to decide RUP admissibility.
    pub fn saturate(&self, db: &ConstraintDatabase, assignment: &mut HashSet<Literal>) {
        loop {
            let mut progressed = false;
            for id in db.live_ids() {
                if let Some(constraint) = db.get(id) {
                    let forced = constraint.propagate(assignment);
                    if !forced.is_empty() {
                        assignment.extend(forced);
                        progressed = true;
                    }
                }
            }
            if !progressed {
                break;
            }
        }
    }

    fn find_falsified(&self, db: &ConstraintDatabase, assignment: &HashSet<Literal>) -> Option<u64> {
        db.live_ids()
            .into_iter()
            .find(|id| db.get(*id).is_some_and(|c| c.is_falsified(assignment)))
    }

    fn find_propagating_in_core(
        &self,
        db: &ConstraintDatabase,
        assignment: &HashSet<Literal>,
    ) -> Option<(u64, Vec<Literal>)> {
        let mut core_ids: Vec<u64> = self.known_to_propagate.iter().copied().collect();
        core_ids.sort_unstable();
        self.first_propagating(db, &core_ids, assignment)
    }

    fn find_propagating_full(
        &self,
        db: &ConstraintDatabase,
        assignment: &HashSet<Literal>,
    ) -> Option<(u64, Vec<Literal>)> {
        let remaining: Vec<u64> = db
            .live_ids()
            .into_iter()
            .filter(|id| !self.known_to_propagate.contains(id))
            .collect();
        self.first_propagating(db, &remaining, assignment)
    }

    fn first_propagating(
        &self,
        db: &ConstraintDatabase,
        candidates: &[u64],
        assignment: &HashSet<Literal>,
    ) -> Option<(u64, Vec<Literal>)> {
        for id in candidates {
            if let Some(constraint) = db.get(*id) {
                let forced = constraint.propagate(assignment);
                if !forced.is_empty() {
                    return Some((*id, forced));
                }
            }
        }
        None
    }
}
