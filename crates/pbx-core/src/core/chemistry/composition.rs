use super::elements::is_solvent_element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const INTEGER_TOLERANCE: f64 = 1e-8;

/// Element amounts of a formula unit, keyed by element symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Composition {
    amounts: BTreeMap<String, f64>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut composition = Self::new();
        for (symbol, amount) in pairs {
            composition.add(symbol, amount);
        }
        composition
    }

    pub fn add(&mut self, symbol: impl Into<String>, amount: f64) {
        if amount.abs() < INTEGER_TOLERANCE {
            return;
        }
        *self.amounts.entry(symbol.into()).or_insert(0.0) += amount;
    }

    pub fn get(&self, symbol: &str) -> f64 {
        self.amounts.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.amounts.iter().map(|(s, a)| (s.as_str(), *a))
    }

    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.amounts.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn num_atoms(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// Atom count excluding hydrogen and oxygen.
    pub fn non_solvent_atoms(&self) -> f64 {
        self.iter()
            .filter(|(s, _)| !is_solvent_element(s))
            .map(|(_, a)| a)
            .sum()
    }

    pub fn non_solvent(&self) -> Composition {
        Composition {
            amounts: self
                .amounts
                .iter()
                .filter(|(s, _)| !is_solvent_element(s))
                .map(|(s, a)| (s.clone(), *a))
                .collect(),
        }
    }

    pub fn restricted_to<'a>(&self, symbols: impl IntoIterator<Item = &'a str>) -> Composition {
        let mut restricted = Composition::new();
        for symbol in symbols {
            let amount = self.get(symbol);
            if amount > 0.0 {
                restricted.add(symbol, amount);
            }
        }
        restricted
    }

    /// Amounts scaled to sum to one.
    pub fn fractional(&self) -> Composition {
        let total = self.num_atoms();
        if total <= 0.0 {
            return Composition::new();
        }
        Composition {
            amounts: self
                .amounts
                .iter()
                .map(|(s, a)| (s.clone(), a / total))
                .collect(),
        }
    }

    /// Divides all amounts by their greatest common divisor when every amount is
    /// integral; otherwise the composition is returned unchanged.
    pub fn reduced(&self) -> Composition {
        let integers: Option<Vec<u64>> = self
            .amounts
            .values()
            .map(|a| {
                let rounded = a.round();
                ((a - rounded).abs() < INTEGER_TOLERANCE && rounded >= 1.0)
                    .then_some(rounded as u64)
            })
            .collect();

        let divisor = match integers {
            Some(values) => values.into_iter().fold(0, gcd).max(1),
            None => 1,
        };

        Composition {
            amounts: self
                .amounts
                .iter()
                .map(|(s, a)| (s.clone(), a / divisor as f64))
                .collect(),
        }
    }

    pub fn approx_eq(&self, other: &Composition, tolerance: f64) -> bool {
        let symbols = self.elements().chain(other.elements());
        symbols
            .into_iter()
            .all(|s| (self.get(s) - other.get(s)).abs() <= tolerance)
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe2o3() -> Composition {
        Composition::from_pairs([("Fe", 2.0), ("O", 3.0)])
    }

    #[test]
    fn counts_atoms_with_and_without_solvent() {
        let comp = Composition::from_pairs([("Fe", 1.0), ("O", 2.0), ("H", 1.0)]);
        assert_eq!(comp.num_atoms(), 4.0);
        assert_eq!(comp.non_solvent_atoms(), 1.0);
        assert_eq!(comp.non_solvent(), Composition::from_pairs([("Fe", 1.0)]));
    }

    #[test]
    fn add_merges_repeated_symbols_and_ignores_zero() {
        let mut comp = Composition::new();
        comp.add("Fe", 1.0);
        comp.add("Fe", 2.0);
        comp.add("Ni", 0.0);
        assert_eq!(comp.get("Fe"), 3.0);
        assert_eq!(comp.elements().collect::<Vec<_>>(), vec!["Fe"]);
    }

    #[test]
    fn reduced_divides_by_gcd_of_integral_amounts() {
        let comp = Composition::from_pairs([("Fe", 4.0), ("O", 6.0)]);
        assert_eq!(comp.reduced(), fe2o3());
    }

    #[test]
    fn reduced_leaves_fractional_amounts_unchanged() {
        let comp = Composition::from_pairs([("Fe", 0.5), ("O", 1.0)]);
        assert_eq!(comp.reduced(), comp);
    }

    #[test]
    fn restricted_to_keeps_only_requested_symbols() {
        let comp = Composition::from_pairs([("Fe", 1.0), ("Ni", 2.0), ("O", 4.0)]);
        let restricted = comp.restricted_to(["Ni", "Co"]);
        assert_eq!(restricted, Composition::from_pairs([("Ni", 2.0)]));
    }

    #[test]
    fn fractional_sums_to_one() {
        let frac = fe2o3().fractional();
        assert!((frac.get("Fe") - 0.4).abs() < 1e-12);
        assert!((frac.num_atoms() - 1.0).abs() < 1e-12);
        assert!(Composition::new().fractional().is_empty());
    }

    #[test]
    fn deserializes_from_symbol_map() {
        let comp: Composition = serde_json::from_str(r#"{"Fe": 2, "O": 3}"#).unwrap();
        assert!(comp.approx_eq(&fe2o3(), 1e-12));
    }
}
