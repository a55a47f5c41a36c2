//! Evaluates a `p` step's polish (reverse-Polish) cutting-planes expression.
use pbcheck_format::PolishToken;

use crate::{
    constraint::{Constraint, ConstraintError},
    database::ConstraintDatabase,
    literal::{Literal, LiteralTable},
};

#[derive(Debug, thiserror::Error)]
pub enum PolishError {
    #[error("operand stack underflow")]
    StackUnderflow,
    #[error("reference to unknown or tombstoned constraint {0}")]
    DanglingReference(u64),
    #[error("expected a scalar, found a constraint or literal")]
    ExpectedScalar,
    #[error("expression left {0} values on the stack, expected exactly 1")]
    LeftoverStack(usize),
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

/// A tagged operand on the polish evaluation stack. Integers are kept ambiguous (they may
/// denote a step id or a scalar multiplier) until an operator resolves them.
enum StackEntry {
    Pending(i64),
    Literal(Literal),
    Constraint(Constraint),
}

struct Evaluator<'a> {
    db: &'a ConstraintDatabase,
    antecedents: Vec<u64>,
}

impl<'a> Evaluator<'a> {
    fn resolve_constraint(&mut self, entry: StackEntry) -> Result<Constraint, PolishError> {
        match entry {
            StackEntry::Constraint(c) => Ok(c),
            StackEntry::Literal(lit) => Ok(Constraint::unit(lit)),
            StackEntry::Pending(id) => {
                let id = u64::try_from(id).map_err(|_| PolishError::DanglingReference(0))?;
                let constraint = self
                    .db
                    .get(id)
                    .ok_or(PolishError::DanglingReference(id))?
                    .clone();
                if !self.antecedents.contains(&id) {
                    self.antecedents.push(id);
                }
                Ok(constraint)
            }
        }
    }

    fn resolve_scalar(&self, entry: StackEntry) -> Result<num_bigint::BigInt, PolishError> {
        match entry {
            StackEntry::Pending(v) => Ok(num_bigint::BigInt::from(v)),
            _ => Err(PolishError::ExpectedScalar),
        }
    }
}

/// Evaluates `tokens` against `db`, returning the resulting constraint and the antecedent
/// step ids consumed (the numeric step references encountered along the way).
pub fn evaluate(
    tokens: &[PolishToken],
    db: &ConstraintDatabase,
    literals: &mut LiteralTable,
) -> Result<(Constraint, Vec<u64>), PolishError> {
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut evaluator = Evaluator {
        db,
        antecedents: Vec::new(),
    };

    for token in tokens {
        match token {
            PolishToken::Int(value) => {
                let as_i64: i64 = value
                    .try_into()
                    .map_err(|_| PolishError::DanglingReference(0))?;
                stack.push(StackEntry::Pending(as_i64));
            }
            PolishToken::Literal(token) => {
                let lit = literals.lookup(token);
                stack.push(StackEntry::Literal(lit));
            }
            PolishToken::Add => {
                let b = stack.pop().ok_or(PolishError::StackUnderflow)?;
                let a = stack.pop().ok_or(PolishError::StackUnderflow)?;
                let b = evaluator.resolve_constraint(b)?;
                let a = evaluator.resolve_constraint(a)?;
                stack.push(StackEntry::Constraint(a.add(&b)));
            }
            PolishToken::Sub => {
                let b = stack.pop().ok_or(PolishError::StackUnderflow)?;
                let a = stack.pop().ok_or(PolishError::StackUnderflow)?;
                let b = evaluator.resolve_constraint(b)?;
                let a = evaluator.resolve_constraint(a)?;
                stack.push(StackEntry::Constraint(a.subtract(&b)));
            }
            PolishToken::Mul => {
                let scalar = stack.pop().ok_or(PolishError::StackUnderflow)?;
                let constraint = stack.pop().ok_or(PolishError::StackUnderflow)?;
                let scalar = evaluator.resolve_scalar(scalar)?;
                let constraint = evaluator.resolve_constraint(constraint)?;
                stack.push(StackEntry::Constraint(constraint.multiply(&scalar)?));
            }
            PolishToken::Div => {
                let scalar = stack.pop().ok_or(PolishError::StackUnderflow)?;
                let constraint = stack.pop().ok_or(PolishError::StackUnderflow)?;
                let scalar = evaluator.resolve_scalar(scalar)?;
                let constraint = evaluator.resolve_constraint(constraint)?;
                stack.push(StackEntry::Constraint(constraint.divide(&scalar)?));
            }
        }
    }

    if stack.len() != 1 {
        return Err(PolishError::LeftoverStack(stack.len()));
    }
    let result = evaluator.resolve_constraint(stack.pop().expect("length checked above"))?;
    Ok((result, evaluator.antecedents))
}
