//! # Engine Module
//!
//! The logic between the raw tables and the stage workflows.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Stage settings, builders and configuration errors
//! - **Sharding** ([`sharding`]) - Deterministic index-modulo partitioning of work lists
//! - **Enumeration** ([`enumeration`]) - Composition keys from materials or element lists
//! - **Conditions** ([`conditions`]) - Resolution of (pH, voltage) points from files and lists
//! - **Redundancy** ([`redundancy`]) - Element-token redundancy filter and duplicate removal
//! - **Join** ([`join`]) - Material join, deprecation filter and baseline attachment
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Engine error type wrapping every lower-level failure
//!
//! Every transformation here is a single pass over in-memory rows; file access
//! is limited to reading condition tables.

pub(crate) mod cache;
pub mod conditions;
pub mod config;
pub mod enumeration;
pub mod error;
pub mod join;
pub mod progress;
pub mod redundancy;
pub mod sharding;
