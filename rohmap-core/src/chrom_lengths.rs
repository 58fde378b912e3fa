//! Chromosome length lookup by genome build.

use std::path::Path;

use fxhash::FxHashMap;

use crate::errors::{ChromLengthError, ChromSizesError};
use crate::utils::{get_chrom_sizes, strip_chr_prefix};

pub const DEFAULT_BUILD: &str = "hg19";

const HG19: [(&str, u32); 25] = [
    ("1", 249_250_621),
    ("2", 243_199_373),
    ("3", 198_022_430),
    ("4", 191_154_276),
    ("5", 180_915_260),
    ("6", 171_115_067),
    ("7", 159_138_663),
    ("8", 146_364_022),
    ("9", 141_213_431),
    ("10", 135_534_747),
    ("11", 135_006_516),
    ("12", 133_851_895),
    ("13", 115_169_878),
    ("14", 107_349_540),
    ("15", 102_531_392),
    ("16", 90_354_753),
    ("17", 81_195_210),
    ("18", 78_077_248),
    ("19", 59_128_983),
    ("20", 63_025_520),
    ("21", 48_129_895),
    ("22", 51_304_566),
    ("X", 155_270_560),
    ("Y", 59_373_566),
    ("MT", 16_571),
];

const HG18: [(&str, u32); 25] = [
    ("1", 247_249_719),
    ("2", 242_951_149),
    ("3", 199_501_827),
    ("4", 191_273_063),
    ("5", 180_857_866),
    ("6", 170_899_992),
    ("7", 158_821_424),
    ("8", 146_274_826),
    ("9", 140_273_252),
    ("10", 135_374_737),
    ("11", 134_452_384),
    ("12", 132_349_534),
    ("13", 114_142_980),
    ("14", 106_368_585),
    ("15", 100_338_915),
    ("16", 88_827_254),
    ("17", 78_774_742),
    ("18", 76_117_153),
    ("19", 63_811_651),
    ("20", 62_435_964),
    ("21", 46_944_323),
    ("22", 49_691_432),
    ("X", 154_913_754),
    ("Y", 57_772_954),
    ("MT", 16_571),
];

///
/// Lookup of a chromosome's total length in bp for a genome build.
///
pub trait ChromosomeLengths: Send + Sync {
    fn length(&self, build: &str, chrom: &str) -> Result<u32, ChromLengthError>;

    fn knows_build(&self, build: &str) -> bool;
}

/// The hg19/GRCh37 and hg18/NCBI36 tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinChromLengths;

impl BuiltinChromLengths {
    fn table(build: &str) -> Option<&'static [(&'static str, u32)]> {
        match build.to_lowercase().as_str() {
            "hg19" | "37" | "grch37" => Some(&HG19),
            "hg18" | "36" | "ncbi36" => Some(&HG18),
            _ => None,
        }
    }
}

impl ChromosomeLengths for BuiltinChromLengths {
    fn length(&self, build: &str, chrom: &str) -> Result<u32, ChromLengthError> {
        let table = BuiltinChromLengths::table(build)
            .ok_or_else(|| ChromLengthError::UnknownBuild(build.to_string()))?;

        let bare = strip_chr_prefix(chrom);
        let wanted = if bare.eq_ignore_ascii_case("M") { "MT" } else { bare };

        table
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
            .map(|(_, len)| *len)
            .ok_or_else(|| ChromLengthError::UnknownChromosome {
                build: build.to_string(),
                chrom: chrom.to_string(),
            })
    }

    fn knows_build(&self, build: &str) -> bool {
        BuiltinChromLengths::table(build).is_some()
    }
}

///
/// Lengths from a `chrom.sizes` file; answers for any build.
///
#[derive(Debug, Clone, Default)]
pub struct ChromSizesFile {
    sizes: FxHashMap<String, u32>,
}

impl ChromSizesFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ChromSizesError> {
        let sizes = get_chrom_sizes(path)?;
        Ok(ChromSizesFile {
            sizes: sizes.into_iter().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl ChromosomeLengths for ChromSizesFile {
    fn length(&self, build: &str, chrom: &str) -> Result<u32, ChromLengthError> {
        self.sizes
            .get(chrom)
            .or_else(|| self.sizes.get(strip_chr_prefix(chrom)))
            .or_else(|| self.sizes.get(&format!("chr{}", strip_chr_prefix(chrom))))
            .copied()
            .ok_or_else(|| ChromLengthError::UnknownChromosome {
                build: build.to_string(),
                chrom: chrom.to_string(),
            })
    }

    fn knows_build(&self, _build: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[rstest]
    #[case("hg19", "1", 249_250_621)]
    #[case("37", "chrX", 155_270_560)]
    #[case("hg18", "MT", 16_571)]
    #[case("36", "chrM", 16_571)]
    #[case("HG19", "y", 59_373_566)]
    fn test_builtin_lengths(#[case] build: &str, #[case] chrom: &str, #[case] expected: u32) {
        assert_eq!(BuiltinChromLengths.length(build, chrom).unwrap(), expected);
    }

    #[rstest]
    fn test_builtin_unknowns() {
        assert_eq!(
            BuiltinChromLengths.length("hg38", "1"),
            Err(ChromLengthError::UnknownBuild("hg38".to_string()))
        );
        assert!(matches!(
            BuiltinChromLengths.length("hg19", "23"),
            Err(ChromLengthError::UnknownChromosome { .. })
        ));
        assert!(BuiltinChromLengths.knows_build("hg18"));
        assert!(!BuiltinChromLengths.knows_build("mm10"));
    }

    #[rstest]
    fn test_chrom_sizes_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\t1000").unwrap();
        writeln!(file, "chr2\t2000").unwrap();

        let sizes = ChromSizesFile::from_path(file.path()).unwrap();
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes.length("anything", "1").unwrap(), 1000);
        assert_eq!(sizes.length("anything", "chr2").unwrap(), 2000);
        assert!(sizes.length("anything", "3").is_err());
    }
}
