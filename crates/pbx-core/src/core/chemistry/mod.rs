//! Element symbols, compositions and the canonical composition keys used to
//! address Pourbaix systems.

pub mod composition;
pub mod elements;
pub mod key;
pub mod tokens;
