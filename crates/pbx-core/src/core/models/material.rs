use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a material record, e.g. `mp-149` or the legacy `mvc-12345`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(String);

impl MaterialId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MaterialId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Summary properties of one material, as stored in
/// `precomputed_properties.csv.gz`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub material_id: MaterialId,
    pub band_gap: Option<f64>,
    pub energy_above_hull: Option<f64>,
    #[serde(deserialize_with = "flexible_bool")]
    pub deprecated: bool,
    #[serde(deserialize_with = "flexible_bool")]
    pub theoretical: bool,
}

/// Accepts the boolean spellings produced by common dataframe writers. An
/// empty cell is an error, so a missing flag never reads as `false`.
pub fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "true" | "True" | "TRUE" | "1" => Ok(true),
        "false" | "False" | "FALSE" | "0" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean value '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv_text: &str) -> Result<Vec<MaterialRecord>, csv::Error> {
        csv::Reader::from_reader(csv_text.as_bytes())
            .deserialize()
            .collect()
    }

    #[test]
    fn deserializes_pandas_style_booleans() {
        let rows = parse(
            "material_id,band_gap,energy_above_hull,deprecated,theoretical\n\
             mp-1,0.0,0.1,True,False\n\
             mp-2,1.5,,false,1\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].deprecated);
        assert!(!rows[0].theoretical);
        assert_eq!(rows[1].energy_above_hull, None);
        assert!(rows[1].theoretical);
    }

    #[test]
    fn rejects_unrecognized_boolean_text() {
        let result = parse(
            "material_id,band_gap,energy_above_hull,deprecated,theoretical\n\
             mp-1,0.0,0.1,maybe,False\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_deprecated_cell_is_an_error() {
        let result = parse(
            "material_id,band_gap,energy_above_hull,deprecated,theoretical\n\
             mp-1,0.0,0.1,,False\n",
        );
        assert!(result.is_err());
    }
}
