use crate::core::chemistry::key::CompositionKey;
use crate::core::chemistry::tokens::contains_element_token;
use crate::core::models::records::DataRecord;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Whether an entry belongs to the composition key it was retrieved under.
///
/// Retrieving `Fe-Ni` also returns the entries of `Fe` and `Ni`, so every
/// entry appears under each key that contains its elements. Only the key whose
/// every symbol occurs as an element token of the entry name keeps it.
pub fn is_non_redundant(symbols: &CompositionKey, name: &str) -> bool {
    symbols
        .symbols()
        .iter()
        .all(|symbol| contains_element_token(name, symbol))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedundancyReport {
    pub input_rows: usize,
    pub redundant_rows: usize,
    pub duplicate_rows: usize,
    /// Rows dropped because the same entry and condition survive under a key
    /// that strictly contains theirs.
    pub subsumed_rows: usize,
    /// Rows left that share (name, entry_id, ph, voltage) with an earlier row
    /// under a different key. They are kept.
    pub residual_duplicates: usize,
}

type ConditionBits = (u64, u64);

fn condition_bits(row: &DataRecord) -> ConditionBits {
    (row.ph.to_bits(), row.voltage.to_bits())
}

/// Drops redundant rows, then exact repeats of (symbols, name, entry_id) at
/// the same condition point, then rows subsumed by a larger key for the same
/// entry and condition. First occurrences are kept in input order.
pub fn filter_redundant(rows: Vec<DataRecord>) -> (Vec<DataRecord>, RedundancyReport) {
    let mut report = RedundancyReport {
        input_rows: rows.len(),
        ..Default::default()
    };

    let mut seen: HashSet<(CompositionKey, String, String, ConditionBits)> = HashSet::new();
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if !is_non_redundant(&row.symbols, &row.name) {
            report.redundant_rows += 1;
            continue;
        }
        let key = (
            row.symbols.clone(),
            row.name.clone(),
            row.entry_id.clone(),
            condition_bits(&row),
        );
        if !seen.insert(key) {
            report.duplicate_rows += 1;
            continue;
        }
        kept.push(row);
    }

    let kept = drop_subsumed(kept, &mut report);
    report.residual_duplicates = count_residual_duplicates(&kept);
    if report.residual_duplicates > 0 {
        warn!(
            "{} row(s) share name, entry id and condition with another row under a different composition key",
            report.residual_duplicates
        );
    }
    info!(
        "Redundancy filter kept {} of {} row(s) ({} redundant, {} duplicate, {} subsumed)",
        kept.len(),
        report.input_rows,
        report.redundant_rows,
        report.duplicate_rows,
        report.subsumed_rows
    );
    (kept, report)
}

fn is_strict_subset(smaller: &CompositionKey, larger: &CompositionKey) -> bool {
    smaller.len() < larger.len() && smaller.symbols().iter().all(|s| larger.contains(s))
}

/// Removes rows whose key is a strict subset of another row's key for the same
/// (name, entry_id, ph, voltage): `Fe`/`Fe2O3` goes when `Fe-O`/`Fe2O3` exists.
fn drop_subsumed(rows: Vec<DataRecord>, report: &mut RedundancyReport) -> Vec<DataRecord> {
    let mut groups: HashMap<(&str, &str, ConditionBits), Vec<&CompositionKey>> = HashMap::new();
    for row in &rows {
        groups
            .entry((row.name.as_str(), row.entry_id.as_str(), condition_bits(row)))
            .or_default()
            .push(&row.symbols);
    }
    let subsumed: Vec<bool> = rows
        .iter()
        .map(|row| {
            groups[&(row.name.as_str(), row.entry_id.as_str(), condition_bits(row))]
                .iter()
                .any(|other| is_strict_subset(&row.symbols, other))
        })
        .collect();
    drop(groups);

    let mut kept = Vec::with_capacity(rows.len());
    for (row, subsumed) in rows.into_iter().zip(subsumed) {
        if subsumed {
            debug!("Dropping {} under {}: kept under a larger key", row.entry_id, row.symbols);
            report.subsumed_rows += 1;
        } else {
            kept.push(row);
        }
    }
    kept
}

fn count_residual_duplicates(rows: &[DataRecord]) -> usize {
    let mut groups: HashMap<(&str, &str, ConditionBits), Vec<&CompositionKey>> = HashMap::new();
    for row in rows {
        groups
            .entry((row.name.as_str(), row.entry_id.as_str(), condition_bits(row)))
            .or_default()
            .push(&row.symbols);
    }
    groups
        .into_iter()
        .filter(|(_, keys)| keys.len() > 1)
        .map(|((name, entry_id, _), keys)| {
            debug!(
                "Entry {} ({}) appears under {}",
                entry_id,
                name,
                keys.iter().map(|k| k.chemsys()).collect::<Vec<_>>().join(", ")
            );
            keys.len() - 1
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str) -> CompositionKey {
        text.parse().unwrap()
    }

    fn row(symbols: &str, name: &str, entry_id: &str, ph: f64) -> DataRecord {
        DataRecord {
            symbols: key(symbols),
            name: name.to_string(),
            entry_id: entry_id.to_string(),
            ph,
            voltage: 0.0,
            decomposition_energy: Some(0.1),
            decomposition_energy_lookup_time: 0.001,
            decomposition_energy_v0: None,
        }
    }

    #[test]
    fn keeps_entries_naming_every_symbol() {
        assert!(is_non_redundant(&key("Fe"), "Fe2O3(s)"));
        assert!(is_non_redundant(&key("Fe"), "Fe(s)"));
        assert!(is_non_redundant(&key("Fe-Ni"), "NiFe2O4(s)"));
        assert!(!is_non_redundant(&key("Fe-Ni"), "Fe2O3(s)"));
    }

    #[test]
    fn symbol_prefix_of_another_element_does_not_count() {
        assert!(!is_non_redundant(&key("Fe"), "Feo2"));
        assert!(!is_non_redundant(&key("O"), "Os(s)"));
        assert!(!is_non_redundant(&key("C"), "Co3O4(s)"));
        assert!(is_non_redundant(&key("Co"), "Co3O4(s)"));
    }

    #[test]
    fn filter_drops_redundant_rows_and_exact_repeats() {
        let rows = vec![
            row("Fe", "Fe2O3(s)", "mp-19770", 0.0),
            row("Fe-Ni", "Fe2O3(s)", "mp-19770", 0.0),
            row("Fe", "Fe2O3(s)", "mp-19770", 0.0),
            row("Fe", "Fe2O3(s)", "mp-19770", 7.0),
        ];
        let (kept, report) = filter_redundant(rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].ph, 7.0);
        assert_eq!(
            report,
            RedundancyReport {
                input_rows: 4,
                redundant_rows: 1,
                duplicate_rows: 1,
                subsumed_rows: 0,
                residual_duplicates: 0,
            }
        );
    }

    #[test]
    fn smaller_key_is_dropped_when_a_larger_key_keeps_the_entry() {
        let rows = vec![
            row("Fe", "Fe2O3", "mp-19770", 0.0),
            row("Fe-O", "Fe2O3", "mp-19770", 0.0),
        ];
        let (kept, report) = filter_redundant(rows);
        let keys: Vec<String> = kept.iter().map(|r| r.symbols.to_string()).collect();
        assert_eq!(keys, vec!["Fe-O"]);
        assert_eq!(report.subsumed_rows, 1);
        assert_eq!(report.residual_duplicates, 0);
    }

    #[test]
    fn single_symbol_named_entry_survives() {
        let (kept, report) = filter_redundant(vec![row("Fe", "Fe", "mp-13", 0.0)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(report.subsumed_rows, 0);
    }

    #[test]
    fn subsumption_is_per_condition_point() {
        let rows = vec![
            row("Fe", "Fe2O3", "mp-19770", 0.0),
            row("Fe-O", "Fe2O3", "mp-19770", 7.0),
        ];
        let (kept, _) = filter_redundant(rows);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn residual_duplicates_under_unrelated_keys_are_counted_but_kept() {
        let rows = vec![
            row("Fe-Ni", "NiFe2O4(s)", "mp-1", 0.0),
            row("Fe-O", "NiFe2O4(s)", "mp-1", 0.0),
        ];
        let (kept, report) = filter_redundant(rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(report.subsumed_rows, 0);
        assert_eq!(report.residual_duplicates, 1);
    }
}
