use super::material::MaterialId;
use serde::{Deserialize, Serialize};

/// An electrochemical condition under which stability is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionPoint {
    pub ph: f64,
    pub voltage: f64,
}

impl ConditionPoint {
    pub fn new(ph: f64, voltage: f64) -> Self {
        Self { ph, voltage }
    }

    /// Exact bitwise identity, so `0.0` and `-0.0` or two NaNs are distinct.
    pub fn same_as(&self, other: &ConditionPoint) -> bool {
        self.ph.to_bits() == other.ph.to_bits() && self.voltage.to_bits() == other.voltage.to_bits()
    }
}

/// A row of a material-specific conditions table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCondition {
    pub material_id: MaterialId,
    pub ph: f64,
    pub voltage: f64,
}

impl MaterialCondition {
    pub fn point(&self) -> ConditionPoint {
        ConditionPoint::new(self.ph, self.voltage)
    }
}
