//! Normalized faculty results
//!
//! Raw service records are turned into [`FacultyResult`]s here, with every
//! per-field fallback applied in one place.

mod normalize;
mod types;

pub use normalize::Normalizer;
pub use types::*;
