use super::error::EngineError;
use crate::core::chemistry::key::CompositionKey;
use crate::core::models::material::{MaterialId, MaterialRecord};
use crate::core::models::records::{AnnotatedRecord, DataRecord};
use crate::core::utils::identifiers::extract_material_id;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Rows whose entry id carries no recognizable material id.
    pub unmatched_prefix: usize,
    /// Rows dropped because their material is deprecated.
    pub deprecated: usize,
    pub joined: usize,
}

/// Material records by id, remembering how often each id occurs.
pub struct MaterialIndex<'a> {
    records: HashMap<&'a MaterialId, (&'a MaterialRecord, usize)>,
}

impl<'a> MaterialIndex<'a> {
    pub fn new(materials: &'a [MaterialRecord]) -> Self {
        let mut records: HashMap<&MaterialId, (&MaterialRecord, usize)> = HashMap::new();
        for material in materials {
            records
                .entry(&material.material_id)
                .and_modify(|(_, count)| *count += 1)
                .or_insert((material, 1));
        }
        Self { records }
    }

    /// The single record of `material_id`; none or several is an error.
    pub fn lookup(&self, material_id: &MaterialId, entry_id: &str) -> Result<&'a MaterialRecord, EngineError> {
        match self.records.get(material_id) {
            Some((record, 1)) => Ok(*record),
            Some((_, count)) => Err(EngineError::DuplicateMaterial {
                material_id: material_id.clone(),
                count: *count,
            }),
            None => Err(EngineError::UnmatchedMaterial {
                material_id: material_id.clone(),
                entry_id: entry_id.to_string(),
            }),
        }
    }
}

/// Joins every row to its material and drops deprecated materials.
///
/// Rows without a material id prefix are excluded and counted; a row whose
/// material is absent from, or repeated in, `materials` fails the join.
pub fn join_materials(
    rows: Vec<DataRecord>,
    materials: &[MaterialRecord],
) -> Result<(Vec<AnnotatedRecord>, JoinReport), EngineError> {
    let index = MaterialIndex::new(materials);
    let mut report = JoinReport::default();
    let mut joined = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(material_id) = extract_material_id(&row.entry_id) else {
            debug!("Entry id '{}' has no material id prefix", row.entry_id);
            report.unmatched_prefix += 1;
            continue;
        };
        let material = index.lookup(&material_id, &row.entry_id)?;
        if material.deprecated {
            report.deprecated += 1;
            continue;
        }
        joined.push(AnnotatedRecord::join(row, material));
    }
    report.joined = joined.len();

    if report.unmatched_prefix > 0 {
        warn!(
            "Excluded {} row(s) whose entry id has no material id prefix",
            report.unmatched_prefix
        );
    }
    info!(
        "Joined {} row(s) to material properties, dropped {} deprecated",
        report.joined, report.deprecated
    );
    Ok((joined, report))
}

type RowKey = (CompositionKey, String, String, u64, u64);

fn row_key(row: &DataRecord) -> RowKey {
    (
        row.symbols.clone(),
        row.name.clone(),
        row.entry_id.clone(),
        row.ph.to_bits(),
        row.voltage.to_bits(),
    )
}

/// Fills `decomposition_energy_v0` from the energies of an earlier run,
/// matching on key, name, entry id and condition point. Returns the number of
/// rows that found a baseline value.
pub fn attach_baseline(rows: &mut [DataRecord], baseline: &[DataRecord]) -> usize {
    let mut energies: HashMap<RowKey, Option<f64>> = HashMap::with_capacity(baseline.len());
    for previous in baseline {
        energies
            .entry(row_key(previous))
            .or_insert(previous.decomposition_energy);
    }

    let mut matched = 0;
    for row in rows.iter_mut() {
        if let Some(energy) = energies.get(&row_key(row)) {
            row.decomposition_energy_v0 = *energy;
            matched += 1;
        }
    }
    info!("Attached baseline energies to {} of {} row(s)", matched, rows.len());
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(id: &str, deprecated: bool) -> MaterialRecord {
        MaterialRecord {
            material_id: MaterialId::new(id),
            band_gap: Some(1.0),
            energy_above_hull: None,
            deprecated,
            theoretical: false,
        }
    }

    fn row(entry_id: &str, energy: Option<f64>) -> DataRecord {
        DataRecord {
            symbols: "Fe".parse().unwrap(),
            name: "Fe2O3(s)".to_string(),
            entry_id: entry_id.to_string(),
            ph: 0.0,
            voltage: 1.23,
            decomposition_energy: energy,
            decomposition_energy_lookup_time: 0.0,
            decomposition_energy_v0: None,
        }
    }

    #[test]
    fn joins_rows_and_drops_deprecated_materials() {
        let materials = vec![material("mp-19770", false), material("mp-13", true)];
        let rows = vec![
            row("mp-19770-Pourbaix-composition-1", Some(0.2)),
            row("mp-13", Some(0.0)),
            row("ion-42", None),
        ];
        let (joined, report) = join_materials(rows, &materials).unwrap();

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].material_id, MaterialId::new("mp-19770"));
        assert_eq!(joined[0].band_gap, Some(1.0));
        assert_eq!(joined[0].energy_above_hull, None);
        assert_eq!(
            report,
            JoinReport {
                unmatched_prefix: 1,
                deprecated: 1,
                joined: 1,
            }
        );
    }

    #[test]
    fn missing_material_is_an_integrity_error() {
        let materials = vec![material("mp-1", false)];
        let result = join_materials(vec![row("mp-2", None)], &materials);
        assert!(matches!(result, Err(EngineError::UnmatchedMaterial { .. })));
    }

    #[test]
    fn repeated_material_is_an_integrity_error() {
        let materials = vec![material("mp-1", false), material("mp-1", false)];
        match join_materials(vec![row("mp-1", None)], &materials) {
            Err(EngineError::DuplicateMaterial { count, .. }) => assert_eq!(count, 2),
            other => panic!("unexpected result: {:?}", other.map(|(_, r)| r)),
        }
    }

    #[test]
    fn baseline_fills_v0_for_matching_rows() {
        let mut rows = vec![row("mp-1", Some(0.3)), row("mp-2", Some(0.4))];
        let baseline = vec![row("mp-1", Some(0.25)), row("mp-9", Some(1.0))];
        assert_eq!(attach_baseline(&mut rows, &baseline), 1);
        assert_eq!(rows[0].decomposition_energy_v0, Some(0.25));
        assert_eq!(rows[1].decomposition_energy_v0, None);
    }
}
