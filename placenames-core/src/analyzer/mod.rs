//! Text handling for names and prefixes.
//!
//! - **Normalizer**: code-point-wise case folding used for indexing and lookup
//! - **Casing**: cosmetic recasing of matched names to follow the query

pub mod casing;
pub mod normalizer;

pub use casing::apply_prefix_casing;
pub use normalizer::{CaseFolder, Folded};
