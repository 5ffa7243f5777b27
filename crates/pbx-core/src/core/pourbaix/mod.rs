//! # Pourbaix Module
//!
//! Native construction of Pourbaix diagrams and evaluation of decomposition
//! energies.
//!
//! ## Overview
//!
//! A diagram is built for one target composition from the entries of its
//! chemical system. Every combination of entries whose metal content adds up to
//! the target is a candidate mixture ([`multientry`]); at a given pH and
//! potential the mixture of lowest energy defines the hull, and an entry's
//! decomposition energy is its distance above that hull per atom ([`diagram`]).
//!
//! The calculation is reached through the [`DecompositionSolver`] trait so the
//! screening workflows do not depend on how the hull is found.

pub mod diagram;
pub mod multientry;

use crate::core::models::condition::ConditionPoint;
use crate::core::models::entry::PourbaixEntry;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DiagramError {
    #[error("Cannot build a diagram for a composition without non-H/O elements")]
    EmptyTarget,
    #[error("Entry '{0}' contains only hydrogen and oxygen")]
    SolventOnly(String),
    #[error("Composition of entry '{entry_id}' does not match the diagram composition")]
    CompositionMismatch { entry_id: String },
    #[error("Entry '{entry_id}' has non-integral amount {amount} of {symbol} in its reduced formula")]
    NonIntegralComposition {
        entry_id: String,
        symbol: String,
        amount: f64,
    },
}

/// Computes the decomposition energy of an entry at a condition point.
///
/// `Ok(None)` means the energy is undefined at that point (no stable mixture
/// reproduces the entry's composition).
pub trait DecompositionSolver {
    fn decomposition_energy(
        &self,
        entry: &PourbaixEntry,
        condition: ConditionPoint,
    ) -> Result<Option<f64>, DiagramError>;
}
