//! Interning textual variable names into signed integer literals.
use std::collections::HashMap;

use pbcheck_format::LiteralToken;

/// A signed integer literal: positive `v` asserts variable `v`, negative `-v` asserts its
/// negation. Zero is never a valid literal.
pub type Literal = i64;

/// Interns variable tokens encountered while parsing a model or proof into stable integer ids.
#[derive(Debug, Default)]
pub struct LiteralTable {
    name_to_id: HashMap<String, i64>,
    id_to_name: Vec<String>,
}

impl LiteralTable {
    pub fn new() -> Self {
        LiteralTable::default()
    }

    /// Number of distinct variables interned so far.
    pub fn no_of_literals(&self) -> usize {
        self.id_to_name.len()
    }

    fn intern(&mut self, name: &str) -> i64 {
        if let Some(id) = self.name_to_id.get(name) {
            return *id;
        }
        self.id_to_name.push(name.to_string());
        let id = self.id_to_name.len() as i64;
        let _ = self.name_to_id.insert(name.to_string(), id);
        id
    }

    /// Looks up (interning if necessary) the signed literal for a textual token.
    pub fn lookup(&mut self, token: &LiteralToken) -> Literal {
        let id = self.intern(&token.name);
        if token.negated {
            -id
        } else {
            id
        }
    }

    /// The textual name backing a literal's underlying variable, ignoring polarity.
    pub fn name_of(&self, literal: Literal) -> Option<&str> {
        self.id_to_name
            .get((literal.unsigned_abs() as usize).checked_sub(1)?)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_distinct_variables() {
        let mut table = LiteralTable::new();
        let x1 = table.lookup(&LiteralToken::new("x1", false));
        let x2 = table.lookup(&LiteralToken::new("x2", false));
        assert_ne!(x1, x2);
        assert_eq!(table.no_of_literals(), 2);
    }

    #[test]
    fn same_variable_both_polarities_share_id() {
        let mut table = LiteralTable::new();
        let pos = table.lookup(&LiteralToken::new("x1", false));
        let neg = table.lookup(&LiteralToken::new("x1", true));
        assert_eq!(pos, -neg);
        assert_eq!(table.no_of_literals(), 1);
    }

    #[test]
    fn name_of_ignores_polarity() {
        let mut table = LiteralTable::new();
        let lit = table.lookup(&LiteralToken::new("x7", true));
        assert_eq!(table.name_of(lit), Some("x7"));
        assert_eq!(table.name_of(-lit), Some("x7"));
    }
}
