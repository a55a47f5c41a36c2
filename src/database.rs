//! The constraint store: an immutable model partition plus a tombstoned derived partition.
use std::collections::HashMap;

use crate::{constraint::Constraint, error::CheckerError};

struct DerivedEntry {
    constraint: Constraint,
    level: u64,
    tombstoned: bool,
}

/// Holds every constraint seen during replay, indexed by step id. Ids `1..=model_count` are
/// the immutable axioms; ids above that are derived and may be tombstoned by a `w` step but
/// never renumbered or reused.
#[derive(Default)]
pub struct ConstraintDatabase {
    model: Vec<Constraint>,
    derived: HashMap<u64, DerivedEntry>,
    model_count: u64,
    next_derived_id: u64,
}

impl ConstraintDatabase {
    pub fn new() -> Self {
        ConstraintDatabase::default()
    }

    /// Inserts the model (axiom) constraints; must be called exactly once, before any
    /// derivation is added.
    pub fn set_model(&mut self, constraints: Vec<Constraint>) {
        self.model_count = constraints.len() as u64;
        self.model = constraints;
        self.next_derived_id = self.model_count + 1;
    }

    pub fn model_count(&self) -> u64 {
        self.model_count
    }

    /// Inserts a derived constraint at the current proof level, returning its assigned id.
    pub fn insert_derived(&mut self, constraint: Constraint, level: u64) -> u64 {
        let id = self.next_derived_id;
        self.next_derived_id += 1;
        let _ = self.derived.insert(
            id,
            DerivedEntry {
                constraint,
                level,
                tombstoned: false,
            },
        );
        id
    }

    /// Looks up a live constraint by id. Tombstoned or out-of-range ids return `None`.
    pub fn get(&self, id: u64) -> Option<&Constraint> {
        if id == 0 {
            return None;
        }
        if id <= self.model_count {
            return self.model.get((id - 1) as usize);
        }
        self.derived
            .get(&id)
            .filter(|entry| !entry.tombstoned)
            .map(|entry| &entry.constraint)
    }

    pub fn is_live(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    /// Tombstones every derived constraint created at a level `>= level`. Idempotent.
    pub fn wipeout(&mut self, level: u64) {
        for entry in self.derived.values_mut() {
            if entry.level >= level {
                entry.tombstoned = true;
            }
        }
    }

    /// Tombstones a single derived id. Fails if `id` names a model constraint.
    pub fn delete(&mut self, id: u64) -> Result<(), CheckerError> {
        if id <= self.model_count {
            return Err(CheckerError::IllegalDelete { id });
        }
        if let Some(entry) = self.derived.get_mut(&id) {
            entry.tombstoned = true;
        }
        Ok(())
    }

    /// All live ids in ascending order: axioms first, then non-tombstoned derived ids.
    pub fn live_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = (1..=self.model_count).collect();
        let mut derived_ids: Vec<u64> = self
            .derived
            .iter()
            .filter(|(_, entry)| !entry.tombstoned)
            .map(|(id, _)| *id)
            .collect();
        derived_ids.sort_unstable();
        ids.extend(derived_ids);
        ids
    }

    pub fn last_derived_id(&self) -> u64 {
        self.next_derived_id.saturating_sub(1)
    }

    /// The id that will be assigned to the next derived constraint inserted.
    pub fn next_derived_id(&self) -> u64 {
        self.next_derived_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn unit_constraint() -> Constraint {
        Constraint::new(&[1], &[BigInt::from(1)], BigInt::from(0)).unwrap()
    }

    #[test]
    fn model_ids_are_immutable() {
        let mut db = ConstraintDatabase::new();
        db.set_model(vec![unit_constraint()]);
        assert!(db.delete(1).is_err());
    }

    #[test]
    fn derived_ids_start_after_model() {
        let mut db = ConstraintDatabase::new();
        db.set_model(vec![unit_constraint(), unit_constraint()]);
        let id = db.insert_derived(unit_constraint(), 0);
        assert_eq!(id, 3);
    }

    #[test]
    fn wipeout_tombstones_by_level() {
        let mut db = ConstraintDatabase::new();
        db.set_model(vec![unit_constraint()]);
        let low = db.insert_derived(unit_constraint(), 1);
        let high = db.insert_derived(unit_constraint(), 2);
        db.wipeout(2);
        assert!(db.is_live(low));
        assert!(!db.is_live(high));
    }

    #[test]
    fn wipeout_of_empty_level_is_noop() {
        let mut db = ConstraintDatabase::new();
        db.set_model(vec![unit_constraint()]);
        let id = db.insert_derived(unit_constraint(), 0);
        db.wipeout(5);
        assert!(db.is_live(id));
    }
}
