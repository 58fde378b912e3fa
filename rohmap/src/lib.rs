#[cfg(feature = "core")]
#[doc(inline)]
pub use rohmap_core as core;

#[cfg(feature = "io")]
#[doc(inline)]
pub use rohmap_io as io;

#[cfg(feature = "ranges")]
#[doc(inline)]
pub use rohmap_ranges as ranges;

#[cfg(feature = "finder")]
#[doc(inline)]
pub use rohmap_finder as finder;
