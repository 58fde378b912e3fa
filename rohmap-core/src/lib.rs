//! Core data model for rohmap.
//!
//! This crate holds the pieces every other rohmap crate builds on:
//!
//! - [models::GenotypeCall] and [models::Genotype], one SNP observation
//! - [models::CallStore], a frozen, position-sorted run of calls for one chromosome
//! - [models::Sample], a named individual with one store per chromosome
//! - [models::Region], a run of homozygosity in genome coordinates
//! - [chrom_lengths], chromosome length lookup by genome build
//!
//! # Example
//!
//! ```
//! use rohmap_core::models::{CallStore, Genotype, GenotypeCall};
//!
//! let calls = vec![
//!     GenotypeCall::new("1", 300, "rs3", Genotype::HomozygousA),
//!     GenotypeCall::new("1", 100, "rs1", Genotype::HomozygousB),
//! ];
//! let store = CallStore::from_unsorted("1", calls).unwrap();
//! assert_eq!(store.range_query(50, 200).len(), 1);
//! ```

pub mod chrom_lengths;
pub mod errors;
pub mod models;
pub mod utils;
