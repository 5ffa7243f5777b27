use crate::core::models::material::MaterialId;
use regex::Regex;
use std::sync::LazyLock;

static MATERIAL_ID_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(mp|mvc)-\d+").expect("material id pattern is valid"));

/// Extracts the material identifier that prefixes a Pourbaix entry identifier.
///
/// Returns `None` when the identifier does not start with a recognized
/// `mp-` or `mvc-` prefix; such entries must never be matched to a material.
pub fn extract_material_id(entry_id: &str) -> Option<MaterialId> {
    MATERIAL_ID_PREFIX
        .find(entry_id)
        .map(|m| MaterialId::new(m.as_str()))
}
