//! Interval set algebra for runs of homozygosity.
//!
//! Region lists are kept sorted by chromosome then start, with no two entries
//! overlapping. On top of that invariant this crate provides:
//!
//! - binary search for overlapping regions ([search])
//! - intersection, subtraction, proximity join and merge ([RegionAlgebra])
//!
//! # Example
//!
//! ```
//! use rohmap_core::models::Region;
//! use rohmap_ranges::RegionAlgebra;
//!
//! let shared = vec![Region::new(100, 1000, "rs1", "rs10")];
//! let unaffected = Region::new(400, 600, "rs4", "rs6");
//!
//! let left = shared.subtract(&unaffected);
//! assert_eq!(left.len(), 2);
//! ```

pub mod algebra;
pub mod search;

// re-exports
pub use algebra::RegionAlgebra;
pub use search::{find_any_overlap, overlapping_range};
