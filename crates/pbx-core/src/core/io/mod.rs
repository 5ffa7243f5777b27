//! Reading and writing the pipeline's files.
//!
//! Tables are CSV with a header row; entry files are JSON lists of
//! [`PourbaixEntry`](crate::core::models::entry::PourbaixEntry). A `.gz`
//! suffix selects gzip compression in both cases.

pub mod entries;
pub mod table;
