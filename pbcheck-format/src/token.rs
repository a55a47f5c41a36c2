use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, multispace1},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::{pair, tuple},
    IResult,
};
use num_bigint::BigInt;

use crate::opb::{OpbConstraint, OpbTerm};

/// A textual literal token as it appears in an OPB or proof file, e.g. `x12` or `~x12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralToken {
    pub name: String,
    pub negated: bool,
}

impl LiteralToken {
    pub fn new(name: impl Into<String>, negated: bool) -> Self {
        LiteralToken {
            name: name.into(),
            negated,
        }
    }

    pub fn negate(&self) -> Self {
        LiteralToken {
            name: self.name.clone(),
            negated: !self.negated,
        }
    }
}

impl fmt::Display for LiteralToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "~{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

pub(crate) fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

pub(crate) fn signed_integer(input: &str) -> IResult<&str, BigInt> {
    map(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<BigInt>()
            .expect("digit1 guarantees a parseable integer")
    })(input)
}

pub(crate) fn literal_token(input: &str) -> IResult<&str, LiteralToken> {
    map(pair(opt(char('~')), identifier), |(neg, name)| {
        LiteralToken::new(name, neg.is_some())
    })(input)
}

fn term(input: &str) -> IResult<&str, OpbTerm> {
    map(
        nom::sequence::terminated(
            tuple((signed_integer, multispace1, literal_token)),
            multispace0,
        ),
        |(coefficient, _, literal)| OpbTerm { coefficient, literal },
    )(input)
}

fn relational_op(input: &str) -> IResult<&str, &str> {
    alt((tag(">="), tag("=")))(input)
}

/// Parses the `Σ coeff·lit >= degree ;` body shared by OPB lines and `u`/`j` proof steps.
/// A constraint with no terms is written with a placeholder `0`, e.g. the contradiction
/// `0 >= 1 ;`.
pub(crate) fn parse_constraint_body(input: &str) -> Result<OpbConstraint, ()> {
    let trimmed = input.trim_start();
    let terms_result: IResult<&str, Vec<OpbTerm>> = many0(term)(trimmed);
    let (rest, terms) = terms_result.map_err(|_| ())?;
    let rest = rest.trim_start();
    let rest = if terms.is_empty() {
        rest.strip_prefix('0').map(str::trim_start).unwrap_or(rest)
    } else {
        rest
    };
    let parsed: IResult<&str, (&str, (), BigInt, (), char)> = tuple((
        relational_op,
        map(multispace0, |_| ()),
        signed_integer,
        map(multispace0, |_| ()),
        char(';'),
    ))(rest);
    match parsed {
        Ok((leftover, (_op, _, degree, _, _))) if leftover.trim().is_empty() => {
            Ok(OpbConstraint { terms, degree })
        }
        _ => Err(()),
    }
}
