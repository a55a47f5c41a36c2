//! Tokenising the OPB 0/1 integer-linear model format.
use nom::{
    bytes::complete::tag,
    character::complete::{digit1, multispace0},
    combinator::{map, opt},
    sequence::{preceded, tuple},
    IResult,
};
use num_bigint::BigInt;

use crate::{error::FormatError, token::LiteralToken};

/// A single `coefficient literal` term of an OPB constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpbTerm {
    pub coefficient: BigInt,
    pub literal: LiteralToken,
}

/// One constraint line of an OPB file: `Σ coeff·lit >= degree;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpbConstraint {
    pub terms: Vec<OpbTerm>,
    pub degree: BigInt,
}

/// The parsed header plus constraint set of an OPB model.
#[derive(Debug, Clone, Default)]
pub struct OpbModel {
    pub no_of_variables: Option<u64>,
    pub no_of_constraints: Option<u64>,
    pub constraints: Vec<OpbConstraint>,
}

fn header_line(input: &str) -> IResult<&str, (Option<u64>, Option<u64>)> {
    let var_count = map(
        preceded(tag("#variable="), preceded(multispace0, digit1)),
        |s: &str| s.parse::<u64>().ok(),
    );
    let con_count = map(
        preceded(tag("#constraint="), preceded(multispace0, digit1)),
        |s: &str| s.parse::<u64>().ok(),
    );
    map(
        tuple((
            tag("*"),
            multispace0,
            opt(var_count),
            multispace0,
            opt(con_count),
        )),
        |(_, _, vars, _, cons)| (vars.flatten(), cons.flatten()),
    )(input)
}

/// Parses a full OPB model from its textual contents.
pub fn parse_opb_model(source: &str) -> Result<OpbModel, FormatError> {
    let mut model = OpbModel::default();
    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('*') {
            if let Ok((_, (vars, cons))) = header_line(line) {
                if vars.is_some() {
                    model.no_of_variables = vars;
                }
                if cons.is_some() {
                    model.no_of_constraints = cons;
                }
            }
            continue;
        }
        match crate::token::parse_constraint_body(line) {
            Ok(constraint) => model.constraints.push(constraint),
            Err(()) => {
                return Err(FormatError::MalformedConstraint {
                    line: line_no,
                    text: line.to_string(),
                })
            }
        }
    }
    Ok(model)
}
