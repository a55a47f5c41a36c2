//! The pseudo-Boolean constraint algebra: coefficient-normalised storage plus the
//! cutting-planes operators (addition, scalar multiplication, generalised division).
use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use thiserror::Error;

use crate::literal::{Literal, LiteralTable};

#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("mismatched literal/coefficient counts: {literals} literals, {coefficients} coefficients")]
    LengthMismatch { literals: usize, coefficients: usize },

    #[error("cutting-planes scalar must be a positive integer")]
    NonPositiveScalar,
}

/// A single PB inequality `Σ aᵢ·ℓᵢ ≥ d`, stored in coefficient-normalised form: every
/// coefficient is strictly positive and each underlying variable appears with at most one
/// polarity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    coefficients: HashMap<Literal, BigInt>,
    degree: BigInt,
}

fn ceil_div(numerator: &BigInt, denominator: &BigInt) -> BigInt {
    let (quotient, remainder) = numerator.div_rem(denominator);
    if remainder.is_zero() || numerator.is_negative() {
        quotient
    } else {
        quotient + BigInt::one()
    }
}

impl Constraint {
    /// Builds a constraint from parallel literal/coefficient slices, summing duplicate
    /// literals, then normalises it.
    pub fn new(
        literals: &[Literal],
        coefficients: &[BigInt],
        degree: BigInt,
    ) -> Result<Self, ConstraintError> {
        if literals.len() != coefficients.len() {
            return Err(ConstraintError::LengthMismatch {
                literals: literals.len(),
                coefficients: coefficients.len(),
            });
        }
        let mut map: HashMap<Literal, BigInt> = HashMap::new();
        for (literal, coefficient) in literals.iter().zip(coefficients) {
            *map.entry(*literal).or_insert_with(BigInt::zero) += coefficient;
        }
        let mut constraint = Constraint {
            coefficients: map,
            degree,
        };
        constraint.normalize_coefficients();
        Ok(constraint)
    }

    /// The unit constraint `1·ℓ ≥ 0` pushed onto the polish stack for a bare literal token.
    pub fn unit(literal: Literal) -> Constraint {
        let mut map = HashMap::new();
        let _ = map.insert(literal, BigInt::one());
        Constraint {
            coefficients: map,
            degree: BigInt::zero(),
        }
    }

    /// Builds a constraint from a parsed OPB term list, interning each literal token.
    pub fn from_opb(
        opb: &pbcheck_format::OpbConstraint,
        literals: &mut LiteralTable,
    ) -> Result<Constraint, ConstraintError> {
        let mut lits = Vec::with_capacity(opb.terms.len());
        let mut coefficients = Vec::with_capacity(opb.terms.len());
        for term in &opb.terms {
            lits.push(literals.lookup(&term.literal));
            coefficients.push(term.coefficient.clone());
        }
        Constraint::new(&lits, &coefficients, opb.degree.clone())
    }

    /// The empty, always-falsified constraint `0 ≥ 1`, the canonical contradiction.
    pub fn contradiction() -> Constraint {
        Constraint {
            coefficients: HashMap::new(),
            degree: BigInt::one(),
        }
    }

    pub fn degree(&self) -> &BigInt {
        &self.degree
    }

    pub fn coefficient_of(&self, literal: Literal) -> Option<&BigInt> {
        self.coefficients.get(&literal)
    }

    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.coefficients.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Rewrites `a·ℓ` as `-a·¬ℓ`, compensating the degree; a pure identity transform used by
    /// both normalisation directions.
    fn flip(&mut self, literal: Literal) {
        if let Some(coefficient) = self.coefficients.remove(&literal) {
            self.degree -= &coefficient;
            let entry = self.coefficients.entry(-literal).or_insert_with(BigInt::zero);
            *entry -= coefficient;
        }
    }

    fn normalize_coefficients(&mut self) {
        let negative: Vec<Literal> = self
            .coefficients
            .iter()
            .filter(|(_, coefficient)| coefficient.is_negative())
            .map(|(literal, _)| *literal)
            .collect();
        for literal in negative {
            self.flip(literal);
        }
        self.coefficients.retain(|_, coefficient| !coefficient.is_zero());
    }

    /// Returns a literal-normalised view: every key is a positive literal, coefficients may be
    /// negative. Used internally to align two constraints before summing.
    fn to_literal_normalized(&self) -> (HashMap<Literal, BigInt>, BigInt) {
        let mut map = self.coefficients.clone();
        let mut degree = self.degree.clone();
        let negative_literals: Vec<Literal> = map.keys().filter(|literal| **literal < 0).copied().collect();
        for literal in negative_literals {
            if let Some(coefficient) = map.remove(&literal) {
                degree -= &coefficient;
                let entry = map.entry(-literal).or_insert_with(BigInt::zero);
                *entry -= coefficient;
            }
        }
        (map, degree)
    }

    /// The slack of the constraint under `assignment`: the sum of coefficients of
    /// non-falsified literals, minus the degree. Negative slack means falsified.
    pub fn slack(&self, assignment: &HashSet<Literal>) -> BigInt {
        let mut total = BigInt::zero();
        for (literal, coefficient) in &self.coefficients {
            if !assignment.contains(&-literal) {
                total += coefficient;
            }
        }
        total - &self.degree
    }

    pub fn is_falsified(&self, assignment: &HashSet<Literal>) -> bool {
        self.slack(assignment) < BigInt::zero()
    }

    /// The free literals this constraint forces true under `assignment`.
    pub fn propagate(&self, assignment: &HashSet<Literal>) -> Vec<Literal> {
        let slack = self.slack(assignment);
        let mut forced: Vec<Literal> = self
            .coefficients
            .iter()
            .filter(|(literal, coefficient)| {
                !assignment.contains(*literal)
                    && !assignment.contains(&-**literal)
                    && slack < **coefficient
            })
            .map(|(literal, _)| *literal)
            .collect();
        forced.sort_by_key(|literal| literal.unsigned_abs());
        forced
    }

    /// `Σ aᵢ·ℓᵢ ≥ d` becomes `Σ aᵢ·¬ℓᵢ ≥ 1 − d`.
    pub fn negate(&self) -> Constraint {
        let mut map = HashMap::new();
        for (literal, coefficient) in &self.coefficients {
            let _ = map.insert(*literal, -coefficient.clone());
        }
        let mut constraint = Constraint {
            coefficients: map,
            degree: -self.degree.clone() + BigInt::one(),
        };
        constraint.normalize_coefficients();
        constraint
    }

    pub fn add(&self, other: &Constraint) -> Constraint {
        let (map_a, degree_a) = self.to_literal_normalized();
        let (map_b, degree_b) = other.to_literal_normalized();
        let mut sum = map_a;
        for (literal, coefficient) in map_b {
            *sum.entry(literal).or_insert_with(BigInt::zero) += coefficient;
        }
        let mut constraint = Constraint {
            coefficients: sum,
            degree: degree_a + degree_b,
        };
        constraint.normalize_coefficients();
        constraint
    }

    /// `self − other`, with `other` the top-of-stack subtrahend.
    pub fn subtract(&self, other: &Constraint) -> Constraint {
        let (map_a, degree_a) = self.to_literal_normalized();
        let (map_b, degree_b) = other.to_literal_normalized();
        let mut diff = map_a;
        for (literal, coefficient) in map_b {
            *diff.entry(literal).or_insert_with(BigInt::zero) -= coefficient;
        }
        let mut constraint = Constraint {
            coefficients: diff,
            degree: degree_a - degree_b,
        };
        constraint.normalize_coefficients();
        constraint
    }

    pub fn multiply(&self, scalar: &BigInt) -> Result<Constraint, ConstraintError> {
        if !scalar.is_positive() {
            return Err(ConstraintError::NonPositiveScalar);
        }
        let mut map = self.coefficients.clone();
        for coefficient in map.values_mut() {
            *coefficient *= scalar;
        }
        let mut constraint = Constraint {
            coefficients: map,
            degree: &self.degree * scalar,
        };
        constraint.normalize_coefficients();
        Ok(constraint)
    }

    /// Generalised (ceiling) division, sound only for positive `scalar`.
    pub fn divide(&self, scalar: &BigInt) -> Result<Constraint, ConstraintError> {
        if !scalar.is_positive() {
            return Err(ConstraintError::NonPositiveScalar);
        }
        let mut map = HashMap::new();
        for (literal, coefficient) in &self.coefficients {
            let _ = map.insert(*literal, ceil_div(coefficient, scalar));
        }
        let mut constraint = Constraint {
            coefficients: map,
            degree: ceil_div(&self.degree, scalar),
        };
        constraint.normalize_coefficients();
        Ok(constraint)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut literals: Vec<Literal> = self.coefficients.keys().copied().collect();
        literals.sort_by_key(|literal| literal.unsigned_abs());
        let terms: Vec<String> = literals
            .iter()
            .map(|literal| {
                let coefficient = &self.coefficients[literal];
                if *literal > 0 {
                    format!("{coefficient} x{literal}")
                } else {
                    format!("{coefficient} ~x{}", -literal)
                }
            })
            .collect();
        write!(f, "{} >= {}", terms.join(" "), self.degree)
    }
}
