use super::multientry::{self, EntryKey, MultiEntry};
use super::{DecompositionSolver, DiagramError};
use crate::core::chemistry::composition::Composition;
use crate::core::chemistry::key::CompositionKey;
use crate::core::models::condition::ConditionPoint;
use crate::core::models::entry::PourbaixEntry;
use slotmap::SlotMap;
use std::collections::BTreeMap;
use tracing::{debug, trace};

const COMPOSITION_TOLERANCE: f64 = 1e-6;
const INTEGRAL_TOLERANCE: f64 = 1e-5;

/// Integral element amounts of an entry's reduced formula, restricted to the
/// symbols of `key`. This is the composition a diagram is built for, and two
/// entries with the same result share a diagram.
pub fn target_composition(
    entry: &PourbaixEntry,
    key: &CompositionKey,
) -> Result<BTreeMap<String, u64>, DiagramError> {
    let reduced = entry.composition.reduced();
    let restricted = reduced.restricted_to(key.symbols().iter().map(String::as_str));

    let mut amounts = BTreeMap::new();
    for (symbol, amount) in restricted.iter() {
        let rounded = amount.round();
        if (amount - rounded).abs() > INTEGRAL_TOLERANCE {
            return Err(DiagramError::NonIntegralComposition {
                entry_id: entry.entry_id.clone(),
                symbol: symbol.to_string(),
                amount,
            });
        }
        amounts.insert(symbol.to_string(), rounded as u64);
    }

    if amounts.is_empty() {
        return Err(DiagramError::EmptyTarget);
    }
    Ok(amounts)
}

/// A Pourbaix diagram for one target composition.
///
/// Holds every entry that can take part in a mixture of the target and the
/// precomputed multi-entries; the stable phase at any (pH, V) is the
/// multi-entry of lowest energy there.
#[derive(Debug, Clone)]
pub struct PourbaixDiagram {
    entries: SlotMap<EntryKey, PourbaixEntry>,
    target: Composition,
    multi_entries: Vec<MultiEntry>,
}

impl PourbaixDiagram {
    /// Builds the diagram for `composition` (any scale, non-H/O elements only)
    /// from the entries of its chemical system.
    pub fn new(entries: &[PourbaixEntry], composition: &Composition) -> Result<Self, DiagramError> {
        let target = composition.non_solvent().fractional();
        if target.is_empty() {
            return Err(DiagramError::EmptyTarget);
        }

        let mut stored = SlotMap::with_key();
        for entry in entries {
            let within_target = entry
                .composition
                .non_solvent()
                .elements()
                .all(|symbol| target.get(symbol) > 0.0);
            if entry.normalization_factor().is_some() && within_target {
                stored.insert(entry.clone());
            } else {
                trace!("Entry {} lies outside the target system", entry.entry_id);
            }
        }

        let max_size = target.elements().count();
        let multi_entries = multientry::generate(&stored, &target, max_size);
        debug!(
            "Constructed diagram with {} entries and {} multi-entries",
            stored.len(),
            multi_entries.len()
        );

        Ok(Self {
            entries: stored,
            target,
            multi_entries,
        })
    }

    /// Fractional non-H/O composition the diagram was built for.
    pub fn target(&self) -> &Composition {
        &self.target
    }

    pub fn multi_entries(&self) -> &[MultiEntry] {
        &self.multi_entries
    }

    pub fn entry(&self, key: EntryKey) -> Option<&PourbaixEntry> {
        self.entries.get(key)
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Energy per non-H/O atom of the most stable mixture at the given
    /// conditions, `None` if no mixture reproduces the target.
    pub fn hull_energy(&self, ph: f64, voltage: f64) -> Option<f64> {
        self.multi_entries
            .iter()
            .map(|m| m.energy_at(ph, voltage))
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}

impl DecompositionSolver for PourbaixDiagram {
    fn decomposition_energy(
        &self,
        entry: &PourbaixEntry,
        condition: ConditionPoint,
    ) -> Result<Option<f64>, DiagramError> {
        let factor = entry
            .normalization_factor()
            .ok_or_else(|| DiagramError::SolventOnly(entry.entry_id.clone()))?;

        let entry_target = entry.composition.non_solvent().fractional();
        if !entry_target.approx_eq(&self.target, COMPOSITION_TOLERANCE) {
            return Err(DiagramError::CompositionMismatch {
                entry_id: entry.entry_id.clone(),
            });
        }

        let Some(hull) = self.hull_energy(condition.ph, condition.voltage) else {
            return Ok(None);
        };

        let normalized = entry.energy_at(condition.ph, condition.voltage) * factor;
        let per_atom = (normalized - hull) / factor / entry.composition.num_atoms();
        Ok(Some(per_atom))
    }
}
