//! # Core Module
//!
//! Stateless building blocks of the screening pipeline: chemistry primitives,
//! table and entry-file I/O, data models and the Pourbaix diagram itself.
//!
//! ## Architecture
//!
//! - **Chemistry** ([`chemistry`]) - Element table, compositions, composition keys and
//!   element-token matching on formula names
//! - **Data Models** ([`models`]) - Material records, Pourbaix entries, condition points
//!   and the row types of every table the pipeline reads or writes
//! - **File I/O** ([`io`]) - CSV tables (gzip by extension) and serialized entry files
//! - **Diagrams** ([`pourbaix`]) - Multi-entry generation, hull energies and
//!   decomposition energies
//! - **Utilities** ([`utils`]) - Material identifier extraction
//!
//! ## Scientific Foundation
//!
//! Energies follow the usual aqueous reference: water and protons are free
//! reservoirs, so every species is described by its energy at pH 0 and 0 V
//! plus linear slopes in pH and potential.

pub mod chemistry;
pub mod io;
pub mod models;
pub mod pourbaix;
pub mod utils;
