//! Shared run-of-homozygosity detection.
//!
//! For every chromosome the finder:
//!
//! - scans each affected sample with a sliding window and refines the edges
//!   of every homozygous run ([scanner], [refine])
//! - intersects the runs across affected samples, optionally requiring their
//!   homozygous calls to agree ([concordance])
//! - subtracts runs that the unaffected samples share as well
//! - drops short or sparsely called regions
//!
//! Results from all chromosomes are sorted and nearby regions are joined.
//!
//! # Example
//!
//! ```
//! use rohmap_core::chrom_lengths::BuiltinChromLengths;
//! use rohmap_core::models::{CallStore, Genotype, GenotypeCall, Sample};
//! use rohmap_finder::{NoProgress, Parameters, RegionFinder};
//!
//! let calls: Vec<GenotypeCall> = (1..=10)
//!     .map(|i| GenotypeCall::new("1", i * 100, &format!("rs{}", i), Genotype::HomozygousA))
//!     .collect();
//! let store = CallStore::from_sorted("1", calls).unwrap();
//! let affected = vec![Sample::new("case", None, vec![store])];
//!
//! let params = Parameters::builder()
//!     .region_length_mb(0.0005)
//!     .min_report_length(500)
//!     .min_report_calls(5)
//!     .build_params()
//!     .unwrap();
//! let lengths = BuiltinChromLengths;
//! let regions = RegionFinder::new(params, &lengths)
//!     .unwrap()
//!     .find_regions(None, &affected, &[], &NoProgress)
//!     .unwrap();
//!
//! assert_eq!(regions[0].coordinate_string(), "1:100-1000");
//! ```

pub mod concordance;
pub mod errors;
pub mod finder;
pub mod params;
pub mod progress;
pub mod refine;
pub mod scanner;

// re-exports
pub use concordance::Concordance;
pub use errors::{RegionFinderError, RegionFinderResult};
pub use finder::{RegionFinder, RegionFinderTask, SENTINEL_CHROM_LENGTH};
pub use params::{Parameters, ParametersBuilder};
pub use progress::{CancellationToken, NoProgress, ProgressCallback, ProgressEvent, ProgressSink, RunState};
pub use refine::BoundaryRefiner;
pub use scanner::{HomozygosityScanner, SampleRegion};
