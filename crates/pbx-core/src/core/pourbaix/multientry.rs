use crate::core::chemistry::composition::Composition;
use crate::core::models::entry::{PREFAC, PourbaixEntry};
use crate::core::utils::combinations::for_each_combination;
use nalgebra::{DMatrix, DVector};
use slotmap::{SlotMap, new_key_type};
use std::collections::BTreeSet;

new_key_type! {
    pub struct EntryKey;
}

const WEIGHT_THRESHOLD: f64 = 1e-4;
const RESIDUAL_TOLERANCE: f64 = 1e-6;
const SINGULAR_EPSILON: f64 = 1e-12;

/// A weighted mixture of entries whose combined non-H/O composition equals a
/// diagram's target composition (one atom in total).
///
/// The mixture energy is linear in pH and potential, so it is stored as an
/// intercept and two slopes.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiEntry {
    pub members: Vec<(EntryKey, f64)>,
    intercept: f64,
    ph_slope: f64,
    voltage_slope: f64,
}

impl MultiEntry {
    fn from_members(members: Vec<(EntryKey, f64)>, entries: &SlotMap<EntryKey, PourbaixEntry>) -> Self {
        let mut intercept = 0.0;
        let mut ph_slope = 0.0;
        let mut voltage_slope = 0.0;
        for (key, weight) in &members {
            let entry = &entries[*key];
            intercept += weight * entry.reference_energy();
            ph_slope += weight * entry.n_ph() * PREFAC;
            voltage_slope += weight * entry.n_phi();
        }
        Self {
            members,
            intercept,
            ph_slope,
            voltage_slope,
        }
    }

    #[inline]
    pub fn energy_at(&self, ph: f64, voltage: f64) -> f64 {
        self.intercept + self.ph_slope * ph + self.voltage_slope * voltage
    }
}

/// Solves for the non-negative weights that combine `components` into
/// `target`. Returns `None` when no exact combination with every weight above
/// the threshold exists.
pub(crate) fn solve_weights(components: &[&Composition], target: &Composition) -> Option<Vec<f64>> {
    let elements: Vec<&str> = components
        .iter()
        .flat_map(|c| c.elements())
        .chain(target.elements())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let rows = elements.len();
    let cols = components.len();
    let a = DMatrix::from_fn(rows, cols, |r, c| components[c].get(elements[r]));
    let b = DVector::from_iterator(rows, elements.iter().map(|s| target.get(s)));

    let weights = a.clone().svd(true, true).solve(&b, SINGULAR_EPSILON).ok()?;
    if (&a * &weights - &b).norm() > RESIDUAL_TOLERANCE {
        return None;
    }
    if weights.iter().any(|w| *w <= WEIGHT_THRESHOLD) {
        return None;
    }
    Some(weights.iter().copied().collect())
}

/// Enumerates every combination of 1 to `max_size` entries that reproduces
/// `target`.
pub(crate) fn generate(
    entries: &SlotMap<EntryKey, PourbaixEntry>,
    target: &Composition,
    max_size: usize,
) -> Vec<MultiEntry> {
    let keys: Vec<EntryKey> = entries.keys().collect();
    let compositions: Vec<Composition> = keys
        .iter()
        .map(|k| entries[*k].composition.non_solvent())
        .collect();

    let mut multi_entries = Vec::new();
    for size in 1..=max_size.min(keys.len()) {
        for_each_combination(keys.len(), size, |indices| {
            let components: Vec<&Composition> = indices.iter().map(|i| &compositions[*i]).collect();
            if let Some(weights) = solve_weights(&components, target) {
                let members = indices
                    .iter()
                    .zip(weights)
                    .map(|(i, w)| (keys[*i], w))
                    .collect();
                multi_entries.push(MultiEntry::from_members(members, entries));
            }
        });
    }
    multi_entries
}
