//! This crate contains abstractions for dealing with the OPB model format and the VeriPB
//! cutting-planes proof format. It can be used by pseudo-Boolean proof checkers to read a
//! model plus a proof script, and to write back a renumbered, minimised proof.
//!
//! To read a model, see [`parse_opb_model`]. To tokenise a proof line, see [`parse_proof_line`].
//! To write a (possibly renumbered) step back to text, see [`format_step`] and [`remap_step`].
mod error;
mod opb;
mod proof;
mod token;
mod writer;

pub use error::FormatError;
pub use opb::{parse_opb_model, OpbConstraint, OpbModel, OpbTerm};
pub use proof::{parse_proof_line, PolishToken, ProofStep};
pub use token::LiteralToken;
pub use writer::{format_minimisation_stats, format_step, remap_step};
