use crate::core::chemistry::composition::Composition;
use serde::{Deserialize, Serialize};

/// kT·ln(10)/e at 298.15 K, in volts per pH unit.
pub const PREFAC: f64 = 0.0591;
/// Chemical potential of liquid water, in eV.
pub const MU_H2O: f64 = -2.4583;

const DEFAULT_ION_CONCENTRATION: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseType {
    Solid,
    Ion,
}

/// One species of a Pourbaix system: a solid phase or an aqueous ion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PourbaixEntry {
    pub entry_id: String,
    pub name: String,
    pub phase_type: PhaseType,
    pub composition: Composition,
    /// Formation energy per formula unit before concentration and water terms.
    pub energy: f64,
    #[serde(default)]
    pub charge: f64,
    #[serde(default = "default_concentration")]
    pub concentration: f64,
}

fn default_concentration() -> f64 {
    DEFAULT_ION_CONCENTRATION
}

impl PourbaixEntry {
    pub fn is_solid(&self) -> bool {
        self.phase_type == PhaseType::Solid
    }

    pub fn n_h2o(&self) -> f64 {
        self.composition.get("O")
    }

    pub fn n_ph(&self) -> f64 {
        self.composition.get("H") - 2.0 * self.composition.get("O")
    }

    pub fn n_phi(&self) -> f64 {
        self.n_ph() - self.charge
    }

    pub fn conc_term(&self) -> f64 {
        match self.phase_type {
            PhaseType::Solid => 0.0,
            PhaseType::Ion => PREFAC * self.concentration.log10(),
        }
    }

    /// Energy referenced to water and corrected for ion concentration.
    pub fn reference_energy(&self) -> f64 {
        self.energy + self.conc_term() - MU_H2O * self.n_h2o()
    }

    pub fn energy_at(&self, ph: f64, voltage: f64) -> f64 {
        self.reference_energy() + self.n_ph() * PREFAC * ph + self.n_phi() * voltage
    }

    /// Per non-H/O atom scaling, `None` for species containing only H and O.
    pub fn normalization_factor(&self) -> Option<f64> {
        let atoms = self.composition.non_solvent_atoms();
        (atoms > 0.0).then(|| 1.0 / atoms)
    }

    pub fn normalized_energy_at(&self, ph: f64, voltage: f64) -> Option<f64> {
        self.normalization_factor()
            .map(|factor| self.energy_at(ph, voltage) * factor)
    }
}
