use crate::core::pourbaix::diagram::PourbaixDiagram;
use std::collections::{BTreeMap, HashMap};

/// Integral element amounts identifying a diagram target.
pub type TargetKey = BTreeMap<String, u64>;

/// Diagrams built for the entries of one composition key, by target.
///
/// A diagram depends on the entry set as well as on the target, so the cache
/// must be cleared whenever the processed key changes.
#[derive(Debug, Default)]
pub struct DiagramCache {
    diagrams: HashMap<TargetKey, PourbaixDiagram>,
}

impl DiagramCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, target: &TargetKey) -> bool {
        self.diagrams.contains_key(target)
    }

    pub fn get(&self, target: &TargetKey) -> Option<&PourbaixDiagram> {
        self.diagrams.get(target)
    }

    pub fn insert(&mut self, target: TargetKey, diagram: PourbaixDiagram) {
        self.diagrams.insert(target, diagram);
    }

    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }

    pub fn clear(&mut self) {
        self.diagrams.clear();
    }
}
