use super::config::ConfigError;
use super::error::EngineError;
use crate::core::io::table::{self, TableError};
use crate::core::models::condition::{ConditionPoint, MaterialCondition};
use crate::core::models::material::MaterialId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const GLOBAL_COLUMNS: &[&str] = &["ph", "voltage"];
const MATERIAL_COLUMNS: &[&str] = &["material_id", "ph", "voltage"];

/// Where the condition points of a decomposition run come from.
///
/// Any combination of sources may be given; their points are united per
/// material. `ph` and `voltage` are comma-separated lists combined as a
/// Cartesian product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSpec {
    pub global_path: Option<PathBuf>,
    pub material_path: Option<PathBuf>,
    pub ph: Option<String>,
    pub voltage: Option<String>,
}

impl ConditionSpec {
    /// Checks the sources without touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let direct = self.ph.is_some() && self.voltage.is_some();
        if self.global_path.is_none() && self.material_path.is_none() && !direct {
            return Err(ConfigError::NoConditionSource);
        }
        if self.ph.is_some() != self.voltage.is_some() {
            return Err(ConfigError::IncompleteDirectConditions);
        }
        self.direct_points()?;
        Ok(())
    }

    /// The explicit Cartesian product, pH-major.
    pub fn direct_points(&self) -> Result<Vec<ConditionPoint>, ConfigError> {
        let (Some(ph), Some(voltage)) = (&self.ph, &self.voltage) else {
            return Ok(Vec::new());
        };
        let ph_values = parse_value_list("pH", ph)?;
        let voltage_values = parse_value_list("voltage", voltage)?;
        Ok(ph_values
            .iter()
            .flat_map(|ph| {
                voltage_values
                    .iter()
                    .map(move |voltage| ConditionPoint::new(*ph, *voltage))
            })
            .collect())
    }

    /// Reads the condition files and combines every source.
    pub fn resolve(&self) -> Result<ConditionSet, EngineError> {
        self.validate()?;

        let mut global = Vec::new();
        if let Some(path) = &self.global_path {
            require_condition_columns(path, GLOBAL_COLUMNS)?;
            let points: Vec<ConditionPoint> = table::read_table(path)?;
            debug!("Read {} global condition(s) from {:?}", points.len(), path);
            global.extend(points);
        }
        global.extend(self.direct_points()?);

        let mut material: HashMap<MaterialId, Vec<ConditionPoint>> = HashMap::new();
        if let Some(path) = &self.material_path {
            require_condition_columns(path, MATERIAL_COLUMNS)?;
            let rows: Vec<MaterialCondition> = table::read_table(path)?;
            debug!("Read {} material condition(s) from {:?}", rows.len(), path);
            for row in rows {
                let point = row.point();
                material.entry(row.material_id).or_default().push(point);
            }
        }

        info!(
            "Resolved {} global condition(s) and conditions for {} material(s)",
            global.len(),
            material.len()
        );
        Ok(ConditionSet { global, material })
    }
}

fn parse_value_list(name: &'static str, text: &str) -> Result<Vec<f64>, ConfigError> {
    text.split(',')
        .map(|value| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidConditionValue {
                    name,
                    value: value.trim().to_string(),
                })
        })
        .collect()
}

fn require_condition_columns(path: &Path, required: &[&str]) -> Result<(), EngineError> {
    match table::require_columns(path, required) {
        Err(TableError::MissingColumns { path, missing }) => {
            Err(ConfigError::MissingConditionColumns { path, missing }.into())
        }
        other => other.map_err(EngineError::from),
    }
}

/// Resolved condition points: the ones applied to every material and the
/// material-specific additions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSet {
    global: Vec<ConditionPoint>,
    material: HashMap<MaterialId, Vec<ConditionPoint>>,
}

impl ConditionSet {
    pub fn global(&self) -> &[ConditionPoint] {
        &self.global
    }

    /// Points to evaluate for a material: the global points followed by its
    /// own, without exact repeats. `None` yields only the global points.
    pub fn for_material(&self, material_id: Option<&MaterialId>) -> Vec<ConditionPoint> {
        let specific = material_id
            .and_then(|id| self.material.get(id))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut points: Vec<ConditionPoint> = Vec::with_capacity(self.global.len() + specific.len());
        for point in self.global.iter().chain(specific) {
            if !points.iter().any(|p| p.same_as(point)) {
                points.push(*point);
            }
        }
        points
    }
}
