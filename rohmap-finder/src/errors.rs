use thiserror::Error;

use rohmap_core::errors::CallStoreError;

#[derive(Error, Debug)]
pub enum RegionFinderError {
    #[error("Region search was cancelled")]
    Cancelled,

    #[error("At least one affected sample is required")]
    NoAffectedSamples,

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Region search failed: {0}")]
    Failed(String),

    #[error(transparent)]
    CallStore(#[from] CallStoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type RegionFinderResult<T> = std::result::Result<T, RegionFinderError>;
