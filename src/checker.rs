//! Top-level orchestration: load a model, replay a proof, and optionally minimise it.
use pbcheck_format::ProofStep;

use crate::{
    antecedents::AntecedentRecord,
    constraint::Constraint,
    database::ConstraintDatabase,
    error::CheckerError,
    literal::LiteralTable,
    minimiser,
    options::CheckerOptions,
    propagation::PropagationEngine,
    step::{StepEffect, StepInterpreter},
};

/// The full record of a completed replay, sufficient to drive minimisation.
pub struct CheckReport {
    pub axiom_count: u64,
    header: Option<String>,
    derived_steps: Vec<(u64, ProofStep)>,
    antecedents: AntecedentRecord,
    pub contradiction_step: Option<u64>,
}

/// A renumbered proof retaining only steps reachable from the contradiction.
pub struct MinimisedProof {
    pub text: String,
    pub kept: usize,
    pub original: usize,
}

impl CheckReport {
    pub fn antecedents(&self) -> &AntecedentRecord {
        &self.antecedents
    }

    /// Runs backward reachability from the contradiction step and renders the surviving
    /// steps back to VeriPB text. Returns `None` if replay never reached a contradiction.
    pub fn minimise(&self) -> Option<MinimisedProof> {
        let terminal = self.contradiction_step?;
        let result = minimiser::minimise(
            &self.antecedents,
            terminal,
            self.axiom_count,
            self.derived_steps.len(),
        );

        let mut lines = Vec::new();
        if let Some(header) = &self.header {
            lines.push(header.clone());
        }
        lines.push(format!("f {}", self.axiom_count));
        for (id, step) in &self.derived_steps {
            if result.retained.contains(id) {
                let remapped = pbcheck_format::remap_step(step, self.axiom_count, &result.mapping);
                lines.push(pbcheck_format::format_step(&remapped));
            }
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text.push_str(&pbcheck_format::format_minimisation_stats(
            result.original,
            result.kept,
        ));

        Some(MinimisedProof {
            text,
            kept: result.kept,
            original: result.original,
        })
    }
}

/// Replays an OPB model plus a VeriPB proof against a fresh constraint database.
pub struct Checker {
    db: ConstraintDatabase,
    literals: LiteralTable,
    propagation: PropagationEngine,
    options: CheckerOptions,
}

impl Checker {
    pub fn new(options: CheckerOptions) -> Self {
        Checker {
            db: ConstraintDatabase::new(),
            literals: LiteralTable::new(),
            propagation: PropagationEngine::new(),
            options,
        }
    }

    /// Parses and installs the model constraints. Must be called before [`Checker::check_proof`].
    pub fn load_model(&mut self, opb_text: &str) -> Result<(), CheckerError> {
        let model = pbcheck_format::parse_opb_model(opb_text)?;
        let mut constraints = Vec::with_capacity(model.constraints.len());
        for constraint in &model.constraints {
            constraints.push(Constraint::from_opb(constraint, &mut self.literals)?);
        }
        log::debug!("loaded {} model constraints", constraints.len());
        self.db.set_model(constraints);
        Ok(())
    }

    /// Replays every line of `proof_text` against the loaded model, in order.
    pub fn check_proof(&mut self, proof_text: &str) -> Result<CheckReport, CheckerError> {
        let mut antecedents = AntecedentRecord::new();
        let mut level = 0u64;
        let mut header = None;
        let mut derived_steps = Vec::new();
        let mut contradiction_step = None;

        for (idx, raw_line) in proof_text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw_line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let parsed = pbcheck_format::parse_proof_line(line_no, trimmed)?;
            if let ProofStep::Header { version } = &parsed {
                header = Some(version.clone());
            }

            let before_id = self.db.next_derived_id();
            let effect = {
                let mut interpreter = StepInterpreter {
                    db: &mut self.db,
                    literals: &mut self.literals,
                    propagation: &mut self.propagation,
                    antecedents: &mut antecedents,
                    level,
                    options: &self.options,
                };
                let effect = interpreter.apply(&parsed)?;
                level = interpreter.level;
                effect
            };
            let after_id = self.db.next_derived_id();
            if after_id > before_id {
                derived_steps.push((before_id, parsed));
            }

            if let StepEffect::ContradictionReached { step_id } = effect {
                log::debug!("contradiction reached at step {step_id}");
                contradiction_step = Some(step_id);
            }
        }

        Ok(CheckReport {
            axiom_count: self.db.model_count(),
            header,
            derived_steps,
            antecedents,
            contradiction_step,
        })
    }
}
