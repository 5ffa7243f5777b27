//! Record types flowing between the pipeline stages.
//!
//! Every table the pipeline reads or writes has a row type here; the field
//! order of each struct is the column order of its CSV file.

pub mod condition;
pub mod entry;
pub mod material;
pub mod records;
