pub(crate) mod combinations;
pub mod identifiers;
