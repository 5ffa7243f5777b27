use super::elements::is_element;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MAX_KEY_ELEMENTS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum KeyError {
    #[error("Composition key must contain at least one element")]
    Empty,
    #[error("Composition key '{0}' has more than {MAX_KEY_ELEMENTS} elements")]
    TooManyElements(String),
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
}

/// A canonical set of element symbols used as the unit of entry retrieval.
///
/// Symbols are kept sorted and unique, so two keys built from the same
/// elements in any order compare equal. Keys order lexicographically by their
/// symbol tuple, which is the enumeration order sharding relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositionKey {
    symbols: Vec<String>,
}

impl CompositionKey {
    pub fn new<I, S>(symbols: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collected = Vec::new();
        for symbol in symbols {
            let symbol = symbol.as_ref().trim();
            if !is_element(symbol) {
                return Err(KeyError::UnknownElement(symbol.to_string()));
            }
            collected.push(symbol.to_string());
        }
        collected.sort();
        collected.dedup();

        if collected.is_empty() {
            return Err(KeyError::Empty);
        }
        if collected.len() > MAX_KEY_ELEMENTS {
            return Err(KeyError::TooManyElements(collected.join("-")));
        }
        Ok(Self { symbols: collected })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// The dash-joined chemical-system string, e.g. `Fe-Ni`.
    pub fn chemsys(&self) -> String {
        self.symbols.join("-")
    }
}

impl fmt::Display for CompositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chemsys())
    }
}

impl FromStr for CompositionKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split('-').filter(|part| !part.trim().is_empty()))
    }
}

impl Serialize for CompositionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.chemsys())
    }
}

impl<'de> Deserialize<'de> for CompositionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
