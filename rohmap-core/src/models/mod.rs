pub mod call_store;
pub mod genotype;
pub mod region;
pub mod sample;

// re-export for cleaner imports
pub use self::call_store::CallStore;
pub use self::genotype::{Genotype, GenotypeCall};
pub use self::region::Region;
pub use self::sample::{Sample, SampleStats};
