//! # Workflows Module
//!
//! End-to-end stages of the screening pipeline that run entirely on local files.
//!
//! - **Decomposition** ([`decompose`]) - Builds Pourbaix diagrams for the downloaded
//!   entries of each composition key assigned to this job and records decomposition
//!   energies at every condition point. Resumable and shard-aware.
//! - **Annotation** ([`annotate`]) - Removes redundant rows, joins the remaining rows to
//!   material properties and drops deprecated materials.
//!
//! Both stages report through [`ProgressReporter`](crate::engine::progress::ProgressReporter)
//! and return a summary of what they did.

pub mod annotate;
pub mod decompose;
