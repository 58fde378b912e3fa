//! # Input/Output utilities for rohmap.
//!
//! Reading genotype tables into [rohmap_core::models::Sample]s, and writing
//! region lists back to disk as BED, coordinate strings, an id table or JSON.
//!
pub mod error;
pub mod genotypes;
pub mod regions;

// re-expose core functions
pub use error::*;
pub use genotypes::*;
pub use regions::*;
