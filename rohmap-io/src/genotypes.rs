use std::io::{self, BufRead};
use std::path::Path;

use fxhash::FxHashMap;
use log::{debug, info};
use rayon::prelude::*;

use rohmap_core::chrom_lengths::ChromosomeLengths;
use rohmap_core::models::{CallStore, Genotype, GenotypeCall, Sample};
use rohmap_core::utils::{get_dynamic_reader, remove_all_extensions};

use crate::error::{GenotypeReadError, Result};

const CHROMOSOME: &str = "chromosome";
const POSITION: &str = "chromosomal position";
const CALL: &str = "call codes";
const ID: &str = "dbsnp rs id";
const CONFIDENCE: &str = "confidence";

/// Chromosome value of rows that map nowhere.
const UNMAPPED_CHROM: &str = "---";

const BUILD_TAG: &str = "genome-version-";

#[derive(Debug, Clone, Copy, PartialEq)]
struct Columns {
    chrom: usize,
    position: usize,
    call: usize,
    id: usize,
    confidence: Option<usize>,
}

impl Columns {
    fn from_header(line: &str, file: &str) -> Result<Self> {
        let fields: Vec<String> = line
            .split('\t')
            .map(|f| normalise_header_field(f.trim()))
            .collect();

        let find = |name: &str| -> Result<usize> {
            fields
                .iter()
                .position(|f| f == name)
                .ok_or_else(|| GenotypeReadError::MissingColumn {
                    file: file.to_string(),
                    column: name.to_string(),
                })
        };

        Ok(Columns {
            chrom: find(CHROMOSOME)?,
            position: find(POSITION)?,
            call: find(CALL)?,
            id: find(ID)?,
            confidence: fields.iter().position(|f| f == CONFIDENCE),
        })
    }

    fn width(&self) -> usize {
        [self.chrom, self.position, self.call, self.id]
            .into_iter()
            .chain(self.confidence)
            .max()
            .map_or(0, |m| m + 1)
    }
}

fn normalise_header_field(field: &str) -> String {
    match field.to_lowercase().as_str() {
        "result_call" => CALL.to_string(),
        "physical position" => POSITION.to_string(),
        other => other.to_string(),
    }
}

///
/// Pull the build out of a `# ... genome-version-<word>=<build>` comment.
///
fn parse_build_comment(line: &str) -> Option<String> {
    let at = line.find(BUILD_TAG)?;
    let rest = &line[at + BUILD_TAG.len()..];
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';

    let (key, value) = rest.split_once('=')?;
    if key.is_empty() || !key.chars().all(is_word) {
        return None;
    }
    let build: String = value.chars().take_while(|c| is_word(*c)).collect();
    if build.is_empty() { None } else { Some(build) }
}

///
/// Reader for tab-delimited genotype tables, plain or gzipped.
///
/// The first non-comment line is the header. Rows are grouped per chromosome,
/// sorted, deduplicated and frozen into one [CallStore] each.
///
pub struct GenotypeTableReader<'a> {
    lengths: &'a dyn ChromosomeLengths,
    quality_filter: Option<f64>,
}

impl<'a> GenotypeTableReader<'a> {
    pub fn new(lengths: &'a dyn ChromosomeLengths) -> Self {
        GenotypeTableReader {
            lengths,
            quality_filter: None,
        }
    }

    /// Drop calls whose confidence value is above `filter`.
    pub fn with_quality_filter(mut self, filter: Option<f64>) -> Self {
        self.quality_filter = filter;
        self
    }

    ///
    /// Read one sample. The sample is named after the file, without extensions.
    ///
    /// # Arguments
    /// - path: path to a `.txt`, `.tsv` or gzipped genotype table
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Sample> {
        let path = path.as_ref();
        let reader =
            get_dynamic_reader(path).map_err(|e| GenotypeReadError::Io(io::Error::other(e)))?;
        let name = remove_all_extensions(path);

        let sample = self.read_from(&name, reader)?;
        info!(
            "Loaded {} calls on {} chromosomes for sample {}",
            sample.stats.total_calls,
            sample.chromosomes().len(),
            sample.name
        );
        Ok(sample)
    }

    ///
    /// Read several samples in parallel, keeping input order.
    ///
    pub fn read_all<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Result<Vec<Sample>> {
        paths.par_iter().map(|p| self.read(p)).collect()
    }

    pub fn read_from<R: BufRead>(&self, name: &str, reader: R) -> Result<Sample> {
        let mut build: Option<String> = None;
        let mut columns: Option<Columns> = None;
        let mut by_chrom: FxHashMap<String, Vec<GenotypeCall>> = FxHashMap::default();
        let mut filtered = 0usize;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;

            if line.starts_with('#') {
                if let Some(b) = parse_build_comment(&line) {
                    if !self.lengths.knows_build(&b) {
                        return Err(GenotypeReadError::UnknownBuild {
                            file: name.to_string(),
                            build: b,
                        });
                    }
                    build = Some(b);
                }
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let cols = match columns {
                Some(c) => c,
                None => {
                    columns = Some(Columns::from_header(&line, name)?);
                    continue;
                }
            };

            let Some(call) = parse_row(&line, &cols, name, line_no)? else {
                continue;
            };

            if let (Some(filter), Some(confidence)) = (self.quality_filter, call.confidence) {
                if confidence > filter {
                    filtered += 1;
                    continue;
                }
            }

            by_chrom.entry(call.chrom.clone()).or_default().push(call);
        }

        if columns.is_none() {
            return Err(GenotypeReadError::MissingHeader(name.to_string()));
        }
        if filtered > 0 {
            debug!("{}: {} calls removed by quality filter", name, filtered);
        }

        let stores = by_chrom
            .into_iter()
            .map(|(chrom, calls)| CallStore::from_unsorted(&chrom, calls))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Sample::new(name, build, stores))
    }
}

fn parse_row(line: &str, cols: &Columns, file: &str, line_no: usize) -> Result<Option<GenotypeCall>> {
    let fields: Vec<&str> = line.split('\t').map(|f| f.trim()).collect();

    if fields.get(cols.chrom) == Some(&UNMAPPED_CHROM) {
        return Ok(None);
    }
    if fields.len() < cols.width() {
        return Err(GenotypeReadError::ShortLine {
            file: file.to_string(),
            line: line_no,
            found: fields.len(),
            expected: cols.width(),
        });
    }

    let position_str = fields[cols.position];
    let position = position_str
        .parse::<u32>()
        .map_err(|_| GenotypeReadError::InvalidPosition {
            file: file.to_string(),
            line: line_no,
            value: position_str.to_string(),
        })?;

    let genotype = fields[cols.call]
        .parse::<Genotype>()
        .map_err(|message| GenotypeReadError::InvalidCall {
            file: file.to_string(),
            line: line_no,
            message,
        })?;

    let mut call = GenotypeCall::new(fields[cols.chrom], position, fields[cols.id], genotype);

    if let Some(ci) = cols.confidence {
        let value = fields[ci];
        if !value.is_empty() {
            let confidence =
                value
                    .parse::<f64>()
                    .map_err(|_| GenotypeReadError::InvalidConfidence {
                        file: file.to_string(),
                        line: line_no,
                        value: value.to_string(),
                    })?;
            call = call.with_confidence(confidence);
        }
    }

    Ok(Some(call))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use rohmap_core::chrom_lengths::BuiltinChromLengths;
    use rstest::*;

    const HEADER: &str = "Probe Set ID\tDbSNP RS ID\tChromosome\tChromosomal Position\tCall Codes\tConfidence";

    fn read(text: &str) -> Result<Sample> {
        GenotypeTableReader::new(&BuiltinChromLengths).read_from("s1", Cursor::new(text.to_string()))
    }

    #[rstest]
    #[case("#%genome-version-ncbi=37", Some("37"))]
    #[case("#%genome-version-ucsc=hg19", Some("hg19"))]
    #[case("# genome-version-ucsc=hg18 other", Some("hg18"))]
    #[case("#%chip_type=GenomeWideEx_6", None)]
    fn test_parse_build_comment(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_build_comment(line).as_deref(), expected);
    }

    #[rstest]
    fn test_header_aliases() {
        let cols = Columns::from_header(
            "dbSNP RS ID\tCHROMOSOME\tPhysical Position\tresult_call",
            "s1",
        )
        .unwrap();
        assert_eq!(cols.id, 0);
        assert_eq!(cols.position, 2);
        assert_eq!(cols.call, 3);
        assert_eq!(cols.confidence, None);
        assert_eq!(cols.width(), 4);
    }

    #[rstest]
    fn test_header_missing_column() {
        let err = Columns::from_header("Chromosome\tChromosomal Position", "s1").unwrap_err();
        assert!(matches!(err, GenotypeReadError::MissingColumn { ref column, .. } if column == CALL));
    }

    #[rstest]
    fn test_read_groups_sorts_and_skips_unmapped() {
        let text = format!(
            "#%genome-version-ucsc=hg19\n{}\n\
             p1\trs2\t1\t200\tAB\t0.01\n\
             p2\trs1\t1\t100\tAA\t0.02\n\
             p3\trs9\t---\t0\tAA\t0.02\n\
             p4\trs3\t2\t50\tNoCall\t\n",
            HEADER
        );
        let sample = read(&text).unwrap();
        assert_eq!(sample.build.as_deref(), Some("hg19"));
        assert_eq!(sample.chromosomes(), vec!["1", "2"]);

        let chr1 = sample.store("1").unwrap();
        let ids: Vec<&str> = chr1.calls().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["rs1", "rs2"]);
        assert_eq!(sample.stats.total_calls, 3);
        assert_eq!(sample.stats.no_calls, 1);
    }

    #[rstest]
    fn test_quality_filter_drops_worse_calls() {
        let text = format!(
            "{}\np1\trs1\t1\t100\tAA\t0.5\np2\trs2\t1\t200\tBB\t0.01\np3\trs3\t1\t300\tBB\t\n",
            HEADER
        );
        let sample = GenotypeTableReader::new(&BuiltinChromLengths)
            .with_quality_filter(Some(0.1))
            .read_from("s1", Cursor::new(text))
            .unwrap();
        let ids: Vec<&str> = sample
            .store("1")
            .unwrap()
            .calls()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["rs2", "rs3"]);
    }

    #[rstest]
    fn test_unknown_build_is_rejected() {
        let text = format!("#%genome-version-ucsc=mm10\n{}\n", HEADER);
        assert!(matches!(read(&text), Err(GenotypeReadError::UnknownBuild { .. })));
    }

    #[rstest]
    #[case("p1\trs1\t1\tabc\tAA\t0.1", "position")]
    #[case("p1\trs1\t1\t100\tAC\t0.1", "call")]
    #[case("p1\trs1\t1\t100\tAA\thigh", "confidence")]
    #[case("p1\trs1\t1", "short")]
    fn test_bad_rows(#[case] row: &str, #[case] kind: &str) {
        let err = read(&format!("{}\n{}\n", HEADER, row)).unwrap_err();
        let matched = match kind {
            "position" => matches!(err, GenotypeReadError::InvalidPosition { line: 2, .. }),
            "call" => matches!(err, GenotypeReadError::InvalidCall { line: 2, .. }),
            "confidence" => matches!(err, GenotypeReadError::InvalidConfidence { line: 2, .. }),
            _ => matches!(err, GenotypeReadError::ShortLine { line: 2, .. }),
        };
        assert!(matched, "unexpected error: {}", err);
    }

    #[rstest]
    fn test_missing_header() {
        assert!(matches!(
            read("# only a comment\n"),
            Err(GenotypeReadError::MissingHeader(_))
        ));
    }
}
