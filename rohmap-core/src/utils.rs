use std::cmp::Ordering;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

use crate::errors::ChromSizesError;

/// Chromosome name without a leading `chr`, in any case.
pub fn strip_chr_prefix(chr: &str) -> &str {
    match chr.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") => &chr[3..],
        _ => chr,
    }
}

/// Returns a sort key that orders chromosome names karyotypically:
/// numeric (1, 2, …, 22) → X → Y → M/MT → everything else alphabetically.
pub fn chrom_karyotype_key(chr: &str) -> (u8, u32, String) {
    let bare = strip_chr_prefix(chr);
    match bare.to_uppercase().as_str() {
        "X" => (1, 0, String::new()),
        "Y" => (2, 0, String::new()),
        "M" | "MT" => (3, 0, String::new()),
        _ => match bare.parse::<u32>() {
            Ok(n) => (0, n, String::new()),
            Err(_) => (4, 0, bare.to_string()),
        },
    }
}

pub fn compare_chromosomes(a: &str, b: &str) -> Ordering {
    chrom_karyotype_key(a).cmp(&chrom_karyotype_key(b))
}

/// Purely numeric chromosome name, with or without a `chr` prefix.
pub fn is_autosome(chr: &str) -> bool {
    let bare = strip_chr_prefix(chr);
    !bare.is_empty() && bare.chars().all(|c| c.is_ascii_digit())
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Read a two column `chrom\tsize` file. Blank lines and `#` comments are skipped.
///
pub fn get_chrom_sizes<T: AsRef<Path>>(path: T) -> Result<HashMap<String, u32>, ChromSizesError> {
    let file_buf = BufReader::new(File::open(path.as_ref())?);
    let mut chrom_sizes: HashMap<String, u32> = HashMap::new();

    for (index, line) in file_buf.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let parsed = match (parts.next(), parts.next()) {
            (Some(chrom), Some(size)) => size.parse::<u32>().ok().map(|s| (chrom, s)),
            _ => None,
        };
        let (chrom, size) = parsed.ok_or_else(|| ChromSizesError::MalformedLine {
            line: index + 1,
            content: line.clone(),
        })?;

        chrom_sizes.insert(chrom.to_string(), size);
    }

    Ok(chrom_sizes)
}

///
/// File name without any extensions, `s1.txt.gz` -> `s1`.
///
pub fn remove_all_extensions(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name,
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
    fn test_karyotype_order() {
        let mut chroms = vec!["chrY", "MT", "10", "X", "2", "GL000192.1", "1"];
        chroms.sort_by(|a, b| compare_chromosomes(a, b));
        assert_eq!(chroms, vec!["1", "2", "10", "X", "chrY", "MT", "GL000192.1"]);
    }

    #[rstest]
    #[case("chr7", "7")]
    #[case("CHRX", "X")]
    #[case("ch", "ch")]
    #[case("MT", "MT")]
    fn test_strip_chr_prefix(#[case] chrom: &str, #[case] expected: &str) {
        assert_eq!(strip_chr_prefix(chrom), expected);
    }

    #[rstest]
    #[case("1", true)]
    #[case("chr22", true)]
    #[case("X", false)]
    #[case("chrMT", false)]
    #[case("", false)]
    fn test_is_autosome(#[case] chrom: &str, #[case] expected: bool) {
        assert_eq!(is_autosome(chrom), expected);
    }

    #[rstest]
    fn test_get_chrom_sizes_rejects_malformed_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\t100").unwrap();
        writeln!(file, "chr2").unwrap();
        let err = get_chrom_sizes(file.path()).unwrap_err();
        assert!(matches!(err, ChromSizesError::MalformedLine { line: 2, .. }));
    }

    #[rstest]
    #[case("data/s1.txt.gz", "s1")]
    #[case("s2.tsv", "s2")]
    #[case("plain", "plain")]
    fn test_remove_all_extensions(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(remove_all_extensions(Path::new(path)), expected);
    }
}
