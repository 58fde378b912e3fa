use std::io::{self, BufWriter};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use crossbeam_channel::bounded;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use rohmap_core::chrom_lengths::{BuiltinChromLengths, ChromSizesFile, ChromosomeLengths};
use rohmap_core::models::Sample;
use rohmap_finder::{Parameters, ParametersBuilder, ProgressEvent, RegionFinderTask, RunState};
use rohmap_io::{GenotypeTableReader, RegionFormat, RegionWrite};

/// Start from the config file when given, then apply every flag that was set.
fn build_params(matches: &ArgMatches) -> Result<Parameters> {
    let mut builder = match matches.get_one::<String>("config") {
        Some(path) => ParametersBuilder::from(
            Parameters::try_from(Path::new(path))
                .with_context(|| format!("Failed to load parameters from {}", path))?,
        ),
        None => Parameters::builder(),
    };

    if let Some(chromosomes) = matches.get_many::<String>("chromosomes") {
        builder = builder.chromosomes(chromosomes.cloned().collect());
    }
    if matches.get_flag("autosomes-only") {
        builder = builder.autosomes_only(true);
    }
    if let Some(window) = matches.get_one::<usize>("window") {
        builder = builder.window_size(*window);
    }
    if let Some(mb) = matches.get_one::<f64>("region-length") {
        builder = builder.region_length_mb(*mb);
    }
    if let Some(cutoff) = matches.get_one::<f64>("het-cutoff") {
        builder = builder.het_cutoff(*cutoff);
    }
    if let Some(cutoff) = matches.get_one::<f64>("discordance-cutoff") {
        builder = builder.discordance_cutoff(*cutoff);
    }
    if let Some(window) = matches.get_one::<usize>("refine-window") {
        builder = builder.refine_window(*window);
    }
    if let Some(cutoff) = matches.get_one::<f64>("refine-cutoff") {
        builder = builder.refine_cutoff(*cutoff);
    }
    if let Some(bp) = matches.get_one::<u32>("min-report-length") {
        builder = builder.min_report_length(*bp);
    }
    if let Some(calls) = matches.get_one::<usize>("min-report-calls") {
        builder = builder.min_report_calls(*calls);
    }
    if matches.get_flag("no-concordance") {
        builder = builder.check_concordance(false);
    }
    if let Some(build) = matches.get_one::<String>("build") {
        builder = builder.build(build);
    }
    if matches.get_flag("extend-to-chrom-end") {
        builder = builder.extend_to_chromosome_end(true);
    }

    builder.build_params().context("Invalid search parameters")
}

fn load_lengths(matches: &ArgMatches) -> Result<Arc<dyn ChromosomeLengths>> {
    match matches.get_one::<String>("chrom-sizes") {
        Some(path) => {
            let sizes = ChromSizesFile::from_path(path)
                .with_context(|| format!("Failed to read chrom sizes from {}", path))?;
            info!("Loaded {} chromosome lengths from {}", sizes.len(), path);
            Ok(Arc::new(sizes))
        }
        None => Ok(Arc::new(BuiltinChromLengths)),
    }
}

fn read_samples(reader: &GenotypeTableReader<'_>, matches: &ArgMatches, id: &str) -> Result<Vec<Sample>> {
    let paths: Vec<&String> = match matches.get_many::<String>(id) {
        Some(paths) => paths.collect(),
        None => return Ok(Vec::new()),
    };
    reader
        .read_all(&paths)
        .with_context(|| format!("Failed to read {} samples", id))
}

fn progress_bar() -> Result<ProgressBar> {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );
    Ok(bar)
}

pub fn run_find(matches: &ArgMatches) -> Result<()> {
    let params = build_params(matches)?;
    let lengths = load_lengths(matches)?;

    let (affected, unaffected) = {
        let quality_filter = matches.get_one::<f64>("quality-filter").copied();
        let reader = GenotypeTableReader::new(lengths.as_ref()).with_quality_filter(quality_filter);
        (
            read_samples(&reader, matches, "affected")?,
            read_samples(&reader, matches, "unaffected")?,
        )
    };
    info!(
        "Searching {} affected and {} unaffected samples",
        affected.len(),
        unaffected.len()
    );

    let format = match matches.get_one::<String>("format") {
        Some(f) => f.parse::<RegionFormat>().map_err(|e| anyhow!(e))?,
        None => RegionFormat::default(),
    };

    let (tx, rx) = bounded(1024);
    let task = RegionFinderTask::spawn(
        params,
        lengths,
        None,
        Arc::new(affected),
        Arc::new(unaffected),
        tx,
    )?;

    let bar = progress_bar()?;
    for event in rx.iter() {
        match event {
            ProgressEvent::Progress { done, total } => {
                bar.set_length(total);
                bar.set_position(done);
            }
            ProgressEvent::State(RunState::Running { chromosome }) => {
                bar.set_message(format!("chromosome {}", chromosome));
            }
            ProgressEvent::State(_) => {}
        }
    }
    bar.finish_and_clear();

    let regions = task.join()?;
    info!("Found {} shared regions", regions.len());

    match matches.get_one::<String>("output") {
        Some(path) => regions
            .write_file(path, format)
            .with_context(|| format!("Failed to write regions to {}", path))?,
        None => {
            let stdout = io::stdout();
            regions.write_to(BufWriter::new(stdout.lock()), format)?;
        }
    }

    Ok(())
}
