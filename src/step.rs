//! Dispatches one parsed proof line against the live checker state.
use std::collections::HashSet;

use pbcheck_format::ProofStep;

use crate::{
    antecedents::AntecedentRecord,
    constraint::Constraint,
    database::ConstraintDatabase,
    error::CheckerError,
    literal::LiteralTable,
    options::CheckerOptions,
    polish,
    propagation::{PropagationEngine, RupOutcome},
};

/// What happened after applying a single proof line.
#[derive(Debug, Clone, Copy)]
pub enum StepEffect {
    Continue,
    /// A derived constraint at `step_id` was falsified by the empty assignment: a
    /// contradiction. Replay may continue (more wipeouts, comments) but this is the
    /// candidate terminal step for minimisation.
    ContradictionReached { step_id: u64 },
}

/// Owns no state itself; borrows every collaborator needed to admit one step.
pub struct StepInterpreter<'a> {
    pub db: &'a mut ConstraintDatabase,
    pub literals: &'a mut LiteralTable,
    pub propagation: &'a mut PropagationEngine,
    pub antecedents: &'a mut AntecedentRecord,
    pub level: u64,
    pub options: &'a CheckerOptions,
}

impl<'a> StepInterpreter<'a> {
    pub fn apply(&mut self, step: &ProofStep) -> Result<StepEffect, CheckerError> {
        match step {
            ProofStep::Header { .. } | ProofStep::Comment(_) => Ok(StepEffect::Continue),
            ProofStep::Axiom { count } => self.apply_axiom(*count),
            ProofStep::SetLevel { level } => {
                self.level = *level;
                Ok(StepEffect::Continue)
            }
            ProofStep::Wipeout { level } => {
                self.db.wipeout(*level);
                Ok(StepEffect::Continue)
            }
            ProofStep::Polish { tokens } => self.apply_polish(tokens),
            ProofStep::Rup { constraint } => self.apply_rup(constraint),
            ProofStep::Implied { cited, constraint } => self.apply_implied(*cited, constraint),
            ProofStep::Solution { literals } => self.apply_solution(literals),
            ProofStep::CheckContradiction { step } => self.apply_check_contradiction(*step),
        }
    }

    fn apply_axiom(&self, declared: u64) -> Result<StepEffect, CheckerError> {
        let actual = self.db.model_count();
        if declared != actual {
            return Err(CheckerError::CountMismatch { declared, actual });
        }
        Ok(StepEffect::Continue)
    }

    fn insert_and_maybe_terminate(&mut self, constraint: Constraint, antecedents: Vec<u64>) -> StepEffect {
        let id = self.db.insert_derived(constraint.clone(), self.level);
        self.antecedents.record(id, antecedents);
        if constraint.is_falsified(&HashSet::new()) {
            StepEffect::ContradictionReached { step_id: id }
        } else {
            StepEffect::Continue
        }
    }

    fn apply_polish(&mut self, tokens: &[pbcheck_format::PolishToken]) -> Result<StepEffect, CheckerError> {
        let prospective_id = self.db.next_derived_id();
        let (constraint, antecedents) = polish::evaluate(tokens, self.db, self.literals).map_err(|e| {
            CheckerError::MalformedPolish {
                step: prospective_id,
                reason: e.to_string(),
            }
        })?;
        Ok(self.insert_and_maybe_terminate(constraint, antecedents))
    }

    fn apply_rup(&mut self, opb: &pbcheck_format::OpbConstraint) -> Result<StepEffect, CheckerError> {
        let candidate = Constraint::from_opb(opb, self.literals)?;
        match self.propagation.rup(self.db, &candidate) {
            RupOutcome::Admitted { antecedents } => Ok(self.insert_and_maybe_terminate(candidate, antecedents)),
            RupOutcome::Failed => Err(CheckerError::RupFailure {
                step: self.db.next_derived_id(),
            }),
        }
    }

    fn apply_implied(
        &mut self,
        cited: u64,
        opb: &pbcheck_format::OpbConstraint,
    ) -> Result<StepEffect, CheckerError> {
        if !self.db.is_live(cited) {
            return Err(CheckerError::DanglingReference {
                step: self.db.next_derived_id(),
                referenced: cited,
            });
        }
        let constraint = Constraint::from_opb(opb, self.literals)?;
        Ok(self.insert_and_maybe_terminate(constraint, vec![cited]))
    }

    fn apply_solution(
        &mut self,
        literal_tokens: &[pbcheck_format::LiteralToken],
    ) -> Result<StepEffect, CheckerError> {
        let prospective_id = self.db.next_derived_id();
        let mut assignment: HashSet<crate::literal::Literal> = literal_tokens
            .iter()
            .map(|tok| self.literals.lookup(tok))
            .collect();
        // A `v` line may be a partial witness; propagate it to a fixpoint before judging
        // completeness, mirroring the reference checker's `is_solution`.
        self.propagation.saturate(self.db, &mut assignment);

        let total = self.literals.no_of_literals();
        let valid = assignment.len() == total
            && self
                .db
                .live_ids()
                .into_iter()
                .all(|id| !self.db.get(id).expect("live id must resolve").is_falsified(&assignment));
        if !valid {
            return Err(CheckerError::InvalidSolution { step: prospective_id });
        }
        let blocking: Vec<crate::literal::Literal> = assignment.iter().map(|lit| -lit).collect();
        let coefficients = vec![num_bigint::BigInt::from(1); blocking.len()];
        let blocking_clause = Constraint::new(&blocking, &coefficients, num_bigint::BigInt::from(1))?;
        Ok(self.insert_and_maybe_terminate(blocking_clause, vec![]))
    }

    fn apply_check_contradiction(&mut self, cited: u64) -> Result<StepEffect, CheckerError> {
        let prospective_id = self.db.next_derived_id();
        let constraint = self
            .db
            .get(cited)
            .ok_or(CheckerError::DanglingReference {
                step: prospective_id,
                referenced: cited,
            })?;
        if constraint.is_falsified(&HashSet::new()) {
            return Ok(StepEffect::ContradictionReached { step_id: cited });
        }
        if self.options.strict_contradiction_checks {
            return Err(CheckerError::ContradictionAbsent {
                step: prospective_id,
                cited,
            });
        }
        log::warn!("step {prospective_id}: `c {cited}` cites a non-falsified constraint");
        Ok(StepEffect::Continue)
    }
}
