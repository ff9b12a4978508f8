//! Pure computation core: formula aggregation, RAG classification, hierarchy
//! rollup, matrix aggregation, and calculation breakdowns.
//!
//! Everything here is synchronous and side-effect free; missing data is a
//! value (`NotSet` / skipped cells), never an error.

pub mod breakdown;
pub mod formula;
pub mod matrix;
pub mod rag;
pub mod rollup;

pub use breakdown::*;
pub use formula::*;
pub use matrix::*;
pub use rag::*;
pub use rollup::*;
