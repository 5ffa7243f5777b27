//! # pbxscreen Core Library
//!
//! Screening of candidate catalyst materials by their aqueous stability: Pourbaix
//! decomposition energies under electrochemical conditions, joined with material
//! properties into an annotated table.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Composition`, `PourbaixEntry`,
//!   table rows), table I/O and the native Pourbaix diagram.
//!
//! - **[`engine`]: The Logic Core.** Deterministic sharding, composition enumeration,
//!   condition resolution, the redundancy filter and the material join, plus the
//!   configuration builders and progress reporting shared by the workflows.
//!
//! - **[`workflows`]: The Public API.** End-to-end stages (`decompose`, `annotate`) that
//!   read the input tables, run the engine and write their outputs.
//!
//! Network access lives in the command-line crate; nothing here performs I/O beyond
//! the local filesystem.

pub mod core;
pub mod engine;
pub mod workflows;
