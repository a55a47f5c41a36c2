//! Tokenising VeriPB cutting-planes proof lines.
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alphanumeric1, char, multispace0, multispace1},
    combinator::{map, not, opt},
    multi::{many0, many1},
    sequence::{preceded, terminated, tuple},
    IResult,
};
use num_bigint::BigInt;

use crate::{
    error::FormatError,
    opb::OpbConstraint,
    token::{parse_constraint_body, LiteralToken},
};

/// A single token of a `p` (polish / cutting-planes) expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolishToken {
    /// A bare decimal integer: either a step reference or a scalar, disambiguated by
    /// the operator that consumes it.
    Int(BigInt),
    Literal(LiteralToken),
    Add,
    Sub,
    Mul,
    Div,
}

/// One parsed line of a VeriPB proof file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofStep {
    Header { version: String },
    Axiom { count: u64 },
    SetLevel { level: u64 },
    Polish { tokens: Vec<PolishToken> },
    Rup { constraint: OpbConstraint },
    Implied { cited: u64, constraint: OpbConstraint },
    Solution { literals: Vec<LiteralToken> },
    CheckContradiction { step: u64 },
    Wipeout { level: u64 },
    Comment(String),
}

fn unsigned_u64(input: &str) -> IResult<&str, u64> {
    map(nom::character::complete::digit1, |s: &str| {
        s.parse::<u64>().expect("digit1 guarantees a parseable integer")
    })(input)
}

fn polish_int(input: &str) -> IResult<&str, PolishToken> {
    map(
        nom::combinator::recognize(tuple((opt(char('-')), nom::character::complete::digit1))),
        |s: &str| PolishToken::Int(s.parse::<BigInt>().expect("validated by recognize")),
    )(input)
}

fn polish_op(input: &str) -> IResult<&str, PolishToken> {
    alt((
        map(char('+'), |_| PolishToken::Add),
        map(char('-'), |_| PolishToken::Sub),
        map(char('*'), |_| PolishToken::Mul),
        // `d` alone is the division operator, but a literal name may also start with `d`
        // (e.g. `d1` or `d_aux`): require that no further identifier character follows.
        map(
            terminated(char('d'), not(alt((alphanumeric1, tag("_"))))),
            |_| PolishToken::Div,
        ),
    ))(input)
}

fn polish_literal(input: &str) -> IResult<&str, PolishToken> {
    map(crate::token::literal_token, PolishToken::Literal)(input)
}

fn polish_token(input: &str) -> IResult<&str, PolishToken> {
    nom::branch::alt((polish_op, polish_int, polish_literal))(input)
}

fn polish_expr(input: &str) -> IResult<&str, Vec<PolishToken>> {
    many1(preceded(multispace0, polish_token))(input)
}

fn literal_list(input: &str) -> IResult<&str, Vec<LiteralToken>> {
    many0(preceded(multispace0, crate::token::literal_token))(input)
}

/// Parses a single non-empty, non-comment-stripped proof line.
pub fn parse_proof_line(line_no: usize, raw: &str) -> Result<ProofStep, FormatError> {
    let line = raw.trim_end();
    if line.is_empty() {
        return Err(FormatError::UnexpectedEof { line: line_no });
    }
    if line.starts_with('*') {
        return Ok(ProofStep::Comment(line.to_string()));
    }
    if line.starts_with("pseudo") {
        return Ok(ProofStep::Header {
            version: line.to_string(),
        });
    }
    let mut chars = line.chars();
    let kind = chars.next().expect("line is non-empty");
    let rest = chars.as_str();
    match kind {
        'f' => parse_u64_arg(line_no, rest).map(|count| ProofStep::Axiom { count }),
        '#' => parse_u64_arg(line_no, rest).map(|level| ProofStep::SetLevel { level }),
        'w' => parse_u64_arg(line_no, rest).map(|level| ProofStep::Wipeout { level }),
        'c' => parse_u64_arg(line_no, rest).map(|step| ProofStep::CheckContradiction { step }),
        'p' => match polish_expr(rest.trim()) {
            Ok((leftover, tokens)) if leftover.trim().is_empty() => {
                Ok(ProofStep::Polish { tokens })
            }
            _ => Err(FormatError::MalformedPolish {
                line: line_no,
                text: line.to_string(),
            }),
        },
        'u' => {
            let constraint = parse_constraint_body(rest.trim()).map_err(|_| {
                FormatError::MalformedConstraint {
                    line: line_no,
                    text: line.to_string(),
                }
            })?;
            Ok(ProofStep::Rup { constraint })
        }
        'j' => parse_j_step(line_no, rest),
        'v' => match literal_list(rest) {
            Ok((leftover, literals)) if leftover.trim().is_empty() => {
                Ok(ProofStep::Solution { literals })
            }
            _ => Err(FormatError::MalformedConstraint {
                line: line_no,
                text: line.to_string(),
            }),
        },
        other => Err(FormatError::UnknownStepKind {
            line: line_no,
            kind: other,
        }),
    }
}

fn parse_u64_arg(line_no: usize, rest: &str) -> Result<u64, FormatError> {
    match preceded(multispace1, unsigned_u64)(rest) {
        Ok((_, value)) => Ok(value),
        Err(_) => Err(FormatError::ExpectedInteger {
            line: line_no,
            text: rest.trim().to_string(),
        }),
    }
}

fn parse_j_step(line_no: usize, rest: &str) -> Result<ProofStep, FormatError> {
    let parsed: IResult<&str, u64> = preceded(multispace1, unsigned_u64)(rest);
    let (after_cited, cited) = parsed.map_err(|_| FormatError::ExpectedInteger {
        line: line_no,
        text: rest.trim().to_string(),
    })?;
    let constraint = parse_constraint_body(after_cited.trim()).map_err(|_| {
        FormatError::MalformedConstraint {
            line: line_no,
            text: rest.trim().to_string(),
        }
    })?;
    Ok(ProofStep::Implied { cited, constraint })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_axiom_count() {
        assert_eq!(
            parse_proof_line(1, "f 3").unwrap(),
            ProofStep::Axiom { count: 3 }
        );
    }

    #[test]
    fn parses_level_set() {
        assert_eq!(
            parse_proof_line(1, "# 2").unwrap(),
            ProofStep::SetLevel { level: 2 }
        );
    }

    #[test]
    fn parses_wipeout() {
        assert_eq!(
            parse_proof_line(1, "w 2").unwrap(),
            ProofStep::Wipeout { level: 2 }
        );
    }

    #[test]
    fn parses_polish_expression() {
        let step = parse_proof_line(1, "p 2 3 + 2 *").unwrap();
        match step {
            ProofStep::Polish { tokens } => {
                assert_eq!(tokens.len(), 5);
                assert_eq!(tokens[0], PolishToken::Int(BigInt::from(2)));
                assert_eq!(tokens[2], PolishToken::Add);
            }
            other => panic!("expected polish step, got {other:?}"),
        }
    }

    #[test]
    fn polish_expression_treats_a_d_prefixed_literal_as_a_literal_not_division() {
        let step = parse_proof_line(1, "p d1 2 *").unwrap();
        match step {
            ProofStep::Polish { tokens } => {
                assert_eq!(
                    tokens[0],
                    PolishToken::Literal(LiteralToken::new("d1", false))
                );
                assert_eq!(tokens[1], PolishToken::Int(BigInt::from(2)));
                assert_eq!(tokens[2], PolishToken::Mul);
            }
            other => panic!("expected polish step, got {other:?}"),
        }
    }

    #[test]
    fn polish_expression_still_parses_bare_d_as_division() {
        let step = parse_proof_line(1, "p 4 2 d").unwrap();
        match step {
            ProofStep::Polish { tokens } => assert_eq!(tokens[2], PolishToken::Div),
            other => panic!("expected polish step, got {other:?}"),
        }
    }

    #[test]
    fn parses_rup_step() {
        let step = parse_proof_line(1, "u 1 x1 1 x2 >= 1 ;").unwrap();
        assert!(matches!(step, ProofStep::Rup { .. }));
    }

    #[test]
    fn parses_j_step() {
        let step = parse_proof_line(1, "j 4 1 x1 >= 1 ;").unwrap();
        match step {
            ProofStep::Implied { cited, .. } => assert_eq!(cited, 4),
            other => panic!("expected implied step, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = parse_proof_line(1, "z garbage").unwrap_err();
        assert!(matches!(err, FormatError::UnknownStepKind { .. }));
    }
}
