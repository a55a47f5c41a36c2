//! End-to-end scenarios run through the public [`crate::Checker`] API, covering the shapes
//! described for the checker's external behaviour.
use crate::{checker::Checker, error::CheckerError, options::CheckerOptions};

const TWO_CLAUSE_OPB: &str = "* #variable= 2 #constraint= 2\n1 x 1 y >= 1;\n1 x 1 ~y >= 1;\n";

const FULL_RESOLUTION_OPB: &str =
    "* #variable= 2 #constraint= 4\n1 x 1 y >= 1;\n1 ~x 1 y >= 1;\n1 x 1 ~y >= 1;\n1 ~x 1 ~y >= 1;\n";

const IMPLICATION_OPB: &str = "* #variable= 2 #constraint= 1\n1 ~x 1 y >= 1;\n";

#[test]
fn s2_rup_admits_resolvent_of_two_clauses() {
    let mut checker = Checker::new(CheckerOptions::default());
    checker.load_model(TWO_CLAUSE_OPB).unwrap();
    let report = checker.check_proof("f 2\nu 1 x >= 1 ;\n").unwrap();
    assert_eq!(report.antecedents().get(3), Some(&[1u64, 2u64][..]));
}

#[test]
fn s5_minimised_proof_is_itself_accepted_by_a_fresh_checker() {
    let mut checker = Checker::new(CheckerOptions::default());
    checker.load_model(FULL_RESOLUTION_OPB).unwrap();
    let proof = "pseudo-Boolean proof version 1.0\nf 4\nu 1 y >= 1 ;\nu 1 ~y >= 1 ;\nu 0 >= 1 ;\n";
    let report = checker.check_proof(proof).unwrap();
    let minimised = report.minimise().expect("contradiction was reached");

    assert!(minimised.text.contains("f 4"));
    assert!(minimised.text.contains("no of proof steps: 3"));

    let mut replay_checker = Checker::new(CheckerOptions::default());
    replay_checker.load_model(FULL_RESOLUTION_OPB).unwrap();
    let replayed = replay_checker.check_proof(&minimised.text).unwrap();
    assert!(replayed.contradiction_step.is_some());
}

#[test]
fn s6_wipeout_tombstones_only_the_target_level() {
    let mut checker = Checker::new(CheckerOptions::default());
    checker.load_model(TWO_CLAUSE_OPB).unwrap();
    // Derive a constraint at level 1, wipe level 1, then try to cite it by id: the
    // reference must be rejected because wipeout removed it from the live database.
    let proof = "f 2\n# 1\nu 1 x >= 1 ;\nw 1\nj 3 1 x >= 1 ;\n";
    let outcome = checker.check_proof(proof);
    assert!(matches!(
        outcome,
        Err(CheckerError::DanglingReference { referenced: 3, .. })
    ));
}

#[test]
fn v_step_accepts_a_partial_witness_that_propagates_to_a_full_assignment() {
    let mut checker = Checker::new(CheckerOptions::default());
    checker.load_model(IMPLICATION_OPB).unwrap();
    // `x` alone doesn't mention `y`, but the axiom `~x + y >= 1` (x implies y) forces y
    // true once x is fixed, so this partial line must still be accepted as a full witness.
    let report = checker.check_proof("f 1\nv x\n");
    assert!(report.is_ok());
}

#[test]
fn v_step_rejects_a_witness_that_cannot_be_completed() {
    let mut checker = Checker::new(CheckerOptions::default());
    checker.load_model(TWO_CLAUSE_OPB).unwrap();
    // Neither clause mentions a third variable, so the checker can't complete this line
    // at all: the model only has two variables, and citing a literal outside it leaves
    // the assignment permanently short of `total`.
    let outcome = checker.check_proof("f 2\nv x\n");
    assert!(matches!(
        outcome,
        Err(CheckerError::InvalidSolution { .. })
    ));
}

#[test]
fn s6_wipeout_of_a_lower_level_is_unaffected() {
    let mut checker = Checker::new(CheckerOptions::default());
    checker.load_model(TWO_CLAUSE_OPB).unwrap();
    // The derivation at level 0 survives a wipeout of level 1.
    let proof = "f 2\nu 1 x >= 1 ;\n# 1\nw 1\nj 3 1 x >= 1 ;\n";
    let report = checker.check_proof(proof).unwrap();
    assert_eq!(report.antecedents().get(4), Some(&[3u64][..]));
}
