use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CallStoreError {
    #[error(
        "Calls on chromosome {chrom} are not strictly increasing: position {position} at index {index} follows {previous}"
    )]
    Unsorted {
        chrom: String,
        index: usize,
        previous: u32,
        position: u32,
    },

    #[error("Call {id} belongs to chromosome {found}, expected {expected}")]
    ChromosomeMismatch {
        expected: String,
        found: String,
        id: String,
    },

    #[error("Call store for chromosome {0} is empty")]
    EmptyStore(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChromLengthError {
    #[error("Build {0} not found")]
    UnknownBuild(String),

    #[error("Chromosome {chrom} not found for build {build}")]
    UnknownChromosome { build: String, chrom: String },
}

#[derive(Error, Debug)]
pub enum ChromSizesError {
    #[error("Malformed chrom sizes line {line}: {content}")]
    MalformedLine { line: usize, content: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
