use super::material::{MaterialId, MaterialRecord};
use crate::core::chemistry::key::CompositionKey;
use serde::{Deserialize, Serialize};

/// A row of `compositions.csv.gz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionRow {
    pub symbols: CompositionKey,
}

/// Outcome of downloading the entries of one composition key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub symbols: CompositionKey,
    pub n_entries: Option<usize>,
    pub download_time: Option<f64>,
    pub entries_outpath: Option<String>,
    pub error: Option<String>,
}

impl DownloadRecord {
    pub fn new(symbols: CompositionKey) -> Self {
        Self {
            symbols,
            n_entries: None,
            download_time: None,
            entries_outpath: None,
            error: None,
        }
    }
}

/// Decomposition energy of one entry at one condition point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    pub symbols: CompositionKey,
    pub name: String,
    pub entry_id: String,
    pub ph: f64,
    pub voltage: f64,
    pub decomposition_energy: Option<f64>,
    pub decomposition_energy_lookup_time: f64,
    #[serde(default)]
    pub decomposition_energy_v0: Option<f64>,
}

/// Construction time of one Pourbaix diagram, tagged with the entry that
/// triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramRecord {
    pub symbols: CompositionKey,
    pub name: String,
    pub entry_id: String,
    pub diagram_time: f64,
}

/// A data row joined with the properties of its material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    pub symbols: CompositionKey,
    pub name: String,
    pub entry_id: String,
    pub ph: f64,
    pub voltage: f64,
    pub decomposition_energy: Option<f64>,
    pub decomposition_energy_lookup_time: f64,
    pub decomposition_energy_v0: Option<f64>,
    pub material_id: MaterialId,
    pub band_gap: Option<f64>,
    pub energy_above_hull: Option<f64>,
    pub deprecated: bool,
    pub theoretical: bool,
}

impl AnnotatedRecord {
    pub fn join(data: DataRecord, material: &MaterialRecord) -> Self {
        Self {
            symbols: data.symbols,
            name: data.name,
            entry_id: data.entry_id,
            ph: data.ph,
            voltage: data.voltage,
            decomposition_energy: data.decomposition_energy,
            decomposition_energy_lookup_time: data.decomposition_energy_lookup_time,
            decomposition_energy_v0: data.decomposition_energy_v0,
            material_id: material.material_id.clone(),
            band_gap: material.band_gap,
            energy_above_hull: material.energy_above_hull,
            deprecated: material.deprecated,
            theoretical: material.theoretical,
        }
    }
}
