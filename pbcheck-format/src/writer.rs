//! Serialising proof steps back to VeriPB text, with step-id renumbering support.
use std::collections::HashMap;

use crate::{
    opb::{OpbConstraint, OpbTerm},
    proof::{PolishToken, ProofStep},
    token::LiteralToken,
};

fn format_literal(lit: &LiteralToken) -> String {
    lit.to_string()
}

fn format_constraint(constraint: &OpbConstraint) -> String {
    let mut parts = Vec::with_capacity(constraint.terms.len() * 2 + 3);
    for OpbTerm { coefficient, literal } in &constraint.terms {
        parts.push(coefficient.to_string());
        parts.push(format_literal(literal));
    }
    parts.push(">=".to_string());
    parts.push(constraint.degree.to_string());
    parts.push(";".to_string());
    parts.join(" ")
}

fn format_polish_token(token: &PolishToken) -> String {
    match token {
        PolishToken::Int(v) => v.to_string(),
        PolishToken::Literal(lit) => format_literal(lit),
        PolishToken::Add => "+".to_string(),
        PolishToken::Sub => "-".to_string(),
        PolishToken::Mul => "*".to_string(),
        PolishToken::Div => "d".to_string(),
    }
}

/// Remaps the step-id references of a `p` or `j`/`c` step using `mapping`. Tokens valued at
/// most `axiom_count` are axiom references and are never remapped; `mapping` is otherwise
/// assumed total over every id a surviving step can reference.
pub fn remap_step(step: &ProofStep, axiom_count: u64, mapping: &HashMap<u64, u64>) -> ProofStep {
    let remap_id = |id: u64| -> u64 {
        if id <= axiom_count {
            id
        } else {
            *mapping.get(&id).unwrap_or(&id)
        }
    };
    match step {
        ProofStep::Polish { tokens } => {
            let remapped = tokens
                .iter()
                .map(|tok| match tok {
                    PolishToken::Int(v) => {
                        if let Some(id) = v.to_string().parse::<u64>().ok().filter(|id| *id > axiom_count) {
                            PolishToken::Int(remap_id(id).into())
                        } else {
                            tok.clone()
                        }
                    }
                    other => other.clone(),
                })
                .collect();
            ProofStep::Polish { tokens: remapped }
        }
        ProofStep::Implied { cited, constraint } => ProofStep::Implied {
            cited: remap_id(*cited),
            constraint: constraint.clone(),
        },
        ProofStep::CheckContradiction { step } => ProofStep::CheckContradiction {
            step: remap_id(*step),
        },
        other => other.clone(),
    }
}

/// Renders a single proof step back to its VeriPB textual form (without trailing newline).
pub fn format_step(step: &ProofStep) -> String {
    match step {
        ProofStep::Header { version } => version.clone(),
        ProofStep::Axiom { count } => format!("f {count}"),
        ProofStep::SetLevel { level } => format!("# {level}"),
        ProofStep::Polish { tokens } => {
            let body = tokens.iter().map(format_polish_token).collect::<Vec<_>>().join(" ");
            format!("p {body}")
        }
        ProofStep::Rup { constraint } => format!("u {}", format_constraint(constraint)),
        ProofStep::Implied { cited, constraint } => {
            format!("j {cited} {}", format_constraint(constraint))
        }
        ProofStep::Solution { literals } => {
            let body = literals.iter().map(format_literal).collect::<Vec<_>>().join(" ");
            format!("v {body}")
        }
        ProofStep::CheckContradiction { step } => format!("c {step}"),
        ProofStep::Wipeout { level } => format!("w {level}"),
        ProofStep::Comment(text) => text.clone(),
    }
}

/// Appends the trailing statistics comment VeriPB minimisers conventionally emit.
pub fn format_minimisation_stats(original: usize, kept: usize) -> String {
    let ratio = if original == 0 {
        0.0
    } else {
        kept as f64 / original as f64
    };
    format!(
        "* no of proof steps: {original}\n* no of short proof steps: {kept}\n* % of proof steps kept: {ratio}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn remaps_polish_step_references() {
        let step = ProofStep::Polish {
            tokens: vec![
                PolishToken::Int(BigInt::from(5)),
                PolishToken::Int(BigInt::from(7)),
                PolishToken::Add,
            ],
        };
        let mut mapping = HashMap::new();
        let _ = mapping.insert(5u64, 3u64);
        let _ = mapping.insert(7u64, 4u64);
        let remapped = remap_step(&step, 2, &mapping);
        match remapped {
            ProofStep::Polish { tokens } => {
                assert_eq!(tokens[0], PolishToken::Int(BigInt::from(3)));
                assert_eq!(tokens[1], PolishToken::Int(BigInt::from(4)));
            }
            other => panic!("expected polish step, got {other:?}"),
        }
    }

    #[test]
    fn leaves_axiom_references_untouched() {
        let step = ProofStep::Implied {
            cited: 1,
            constraint: OpbConstraint {
                terms: vec![],
                degree: BigInt::from(0),
            },
        };
        let mapping = HashMap::new();
        let remapped = remap_step(&step, 5, &mapping);
        assert_eq!(remapped, step);
    }

    #[test]
    fn formats_minimisation_stats() {
        let stats = format_minimisation_stats(10, 4);
        assert!(stats.contains("no of proof steps: 10"));
        assert!(stats.contains("no of short proof steps: 4"));
        assert!(stats.contains("% of proof steps kept: 0.4\n"));
    }
}
