use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::Serialize;

use rohmap_core::chrom_lengths::{BuiltinChromLengths, ChromSizesFile, ChromosomeLengths};
use rohmap_core::models::{Sample, SampleStats};
use rohmap_io::GenotypeTableReader;

#[derive(Serialize)]
struct SampleSummary<'a> {
    name: &'a str,
    build: Option<&'a str>,
    chromosomes: Vec<&'a str>,
    no_call_percent: f64,
    #[serde(flatten)]
    stats: &'a SampleStats,
}

impl<'a> From<&'a Sample> for SampleSummary<'a> {
    fn from(sample: &'a Sample) -> Self {
        SampleSummary {
            name: &sample.name,
            build: sample.build.as_deref(),
            chromosomes: sample.chromosomes(),
            no_call_percent: sample.stats.no_call_percent(),
            stats: &sample.stats,
        }
    }
}

fn write_table<W: Write>(mut writer: W, summaries: &[SampleSummary]) -> Result<()> {
    writeln!(
        writer,
        "sample\tbuild\tcalls\tchromosomes\tno_call_percent\tmean_confidence"
    )?;
    for s in summaries {
        let confidence = s
            .stats
            .mean_confidence
            .map(|c| format!("{:.5}", c))
            .unwrap_or_else(|| "NA".to_string());
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{:.2}\t{}",
            s.name,
            s.build.unwrap_or("NA"),
            s.stats.total_calls,
            s.chromosomes.len(),
            s.no_call_percent,
            confidence
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run_stats(matches: &ArgMatches) -> Result<()> {
    let lengths: Box<dyn ChromosomeLengths> = match matches.get_one::<String>("chrom-sizes") {
        Some(path) => Box::new(
            ChromSizesFile::from_path(path)
                .with_context(|| format!("Failed to read chrom sizes from {}", path))?,
        ),
        None => Box::new(BuiltinChromLengths),
    };

    let paths: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|files| files.collect())
        .unwrap_or_default();

    let samples = GenotypeTableReader::new(lengths.as_ref())
        .with_quality_filter(matches.get_one::<f64>("quality-filter").copied())
        .read_all(&paths)
        .context("Failed to read genotype tables")?;
    let summaries: Vec<SampleSummary> = samples.iter().map(SampleSummary::from).collect();

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if matches.get_flag("json") {
        serde_json::to_writer_pretty(&mut writer, &summaries)?;
        writeln!(writer)?;
        writer.flush()?;
    } else {
        write_table(writer, &summaries)?;
    }

    Ok(())
}
