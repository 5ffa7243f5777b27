use super::config::ConfigError;
use crate::core::chemistry::elements::{is_element, is_solvent_element};
use crate::core::chemistry::key::{CompositionKey, MAX_KEY_ELEMENTS};
use crate::core::utils::combinations::for_each_combination;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Distinct composition keys of a collection of materials, given as their
/// element lists. Hydrogen and oxygen are dropped, materials left without
/// elements or with more than three are skipped, and the result is sorted.
pub fn keys_from_element_sets<I, S>(element_sets: I) -> Vec<CompositionKey>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut keys = BTreeSet::new();
    let mut oversized = 0usize;

    for set in element_sets {
        let symbols: BTreeSet<String> = set
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !is_solvent_element(s))
            .collect();
        if symbols.is_empty() {
            continue;
        }
        if symbols.len() > MAX_KEY_ELEMENTS {
            debug!(
                "Skipping {}-element system {}",
                symbols.len(),
                symbols.iter().cloned().collect::<Vec<_>>().join("-")
            );
            oversized += 1;
            continue;
        }
        match CompositionKey::new(&symbols) {
            Ok(key) => {
                keys.insert(key);
            }
            Err(e) => warn!("Skipping material with invalid elements: {}", e),
        }
    }

    if oversized > 0 {
        info!(
            "Skipped {} material(s) with more than {} non-H/O elements",
            oversized, MAX_KEY_ELEMENTS
        );
    }
    keys.into_iter().collect()
}

/// Every key of one to `max_size` elements drawn from `elements`, sorted.
pub fn keys_from_elements<S: AsRef<str>>(
    elements: &[S],
    max_size: usize,
) -> Result<Vec<CompositionKey>, ConfigError> {
    if max_size == 0 || max_size > MAX_KEY_ELEMENTS {
        return Err(ConfigError::InvalidMaxSize {
            value: max_size,
            max: MAX_KEY_ELEMENTS,
        });
    }

    let mut pool = BTreeSet::new();
    for symbol in elements {
        let symbol = symbol.as_ref().trim();
        if !is_element(symbol) {
            return Err(ConfigError::UnknownElement(symbol.to_string()));
        }
        if is_solvent_element(symbol) {
            warn!("Ignoring {} in the element list; it is part of every system", symbol);
            continue;
        }
        pool.insert(symbol);
    }
    let pool: Vec<&str> = pool.into_iter().collect();

    let mut keys = BTreeSet::new();
    for size in 1..=max_size {
        for_each_combination(pool.len(), size, |indices| {
            let symbols = indices.iter().map(|i| pool[*i]);
            if let Ok(key) = CompositionKey::new(symbols) {
                keys.insert(key);
            }
        });
    }
    Ok(keys.into_iter().collect())
}
