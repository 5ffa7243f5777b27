use thiserror::Error;

use super::config::ConfigError;
use crate::core::chemistry::key::KeyError;
use crate::core::io::entries::EntryFileError;
use crate::core::io::table::TableError;
use crate::core::models::material::MaterialId;
use crate::core::pourbaix::DiagramError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Table error: {source}")]
    Table {
        #[from]
        source: TableError,
    },

    #[error("Entry file error: {source}")]
    EntryFile {
        #[from]
        source: EntryFileError,
    },

    #[error("Invalid composition key: {source}")]
    Key {
        #[from]
        source: KeyError,
    },

    #[error("Pourbaix diagram error for {symbols}: {source}")]
    Diagram {
        symbols: String,
        source: DiagramError,
    },

    #[error("Material '{material_id}' appears {count} times in the property table")]
    DuplicateMaterial { material_id: MaterialId, count: usize },

    #[error("No property record for material '{material_id}' (entry '{entry_id}')")]
    UnmatchedMaterial {
        material_id: MaterialId,
        entry_id: String,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
