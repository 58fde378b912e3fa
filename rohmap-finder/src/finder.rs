use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use log::{debug, info, warn};

use rohmap_core::chrom_lengths::ChromosomeLengths;
use rohmap_core::models::{CallStore, GenotypeCall, Region, Sample};
use rohmap_core::utils::{compare_chromosomes, is_autosome};
use rohmap_ranges::RegionAlgebra;

use crate::concordance::is_concordant;
use crate::errors::{RegionFinderError, RegionFinderResult};
use crate::params::Parameters;
use crate::progress::{CancellationToken, ProgressCounter, ProgressEvent, ProgressSink, RunState};
use crate::refine::BoundaryRefiner;
use crate::scanner::HomozygosityScanner;

/// Stand-in chromosome length when the lookup has no answer.
pub const SENTINEL_CHROM_LENGTH: u32 = 999_999_999;

///
/// Finds runs of homozygosity shared by every affected sample and not
/// explained by the unaffected samples.
///
/// A finder holds one immutable [Parameters] set for its whole run. Call
/// [RegionFinder::with_cancellation] to poll a token shared with another
/// thread.
///
pub struct RegionFinder<'a> {
    params: Parameters,
    lengths: &'a dyn ChromosomeLengths,
    cancel: CancellationToken,
}

impl<'a> RegionFinder<'a> {
    /// Fails with [RegionFinderError::InvalidParameters] when `params` do not validate.
    pub fn new(params: Parameters, lengths: &'a dyn ChromosomeLengths) -> RegionFinderResult<Self> {
        Ok(RegionFinder {
            params: params.validate()?,
            lengths,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    ///
    /// Run the search over `chromosomes`, or over the configured set when
    /// `None`, or over every chromosome the affected samples carry when
    /// neither is given.
    ///
    /// The returned regions are tagged with their chromosome, sorted in
    /// karyotype order and joined across gaps of at most half the region
    /// length. A cancelled or failed run returns no partial result.
    ///
    pub fn find_regions(
        &self,
        chromosomes: Option<&[String]>,
        affected: &[Sample],
        unaffected: &[Sample],
        progress: &dyn ProgressSink,
    ) -> RegionFinderResult<Vec<Region>> {
        let result = self.run(chromosomes, affected, unaffected, progress);
        let state = match &result {
            Ok(regions) => {
                info!("Found {} shared regions", regions.len());
                RunState::Succeeded
            }
            Err(RegionFinderError::Cancelled) => {
                info!("Region search cancelled");
                RunState::Cancelled
            }
            Err(e) => RunState::Failed(e.to_string()),
        };
        progress.report(ProgressEvent::State(state));
        result
    }

    fn run(
        &self,
        chromosomes: Option<&[String]>,
        affected: &[Sample],
        unaffected: &[Sample],
        progress: &dyn ProgressSink,
    ) -> RegionFinderResult<Vec<Region>> {
        if affected.is_empty() {
            return Err(RegionFinderError::NoAffectedSamples);
        }

        let chromosomes = self.select_chromosomes(chromosomes, affected);
        let per_chromosome = (2 * affected.len() - 1 + unaffected.len()) as u64;
        let mut counter = ProgressCounter::new(per_chromosome * chromosomes.len() as u64, progress);

        let mut found = Vec::new();
        for (i, chrom) in chromosomes.iter().enumerate() {
            self.cancel.check()?;
            counter.state(RunState::Running {
                chromosome: chrom.clone(),
            });
            info!("Processing chromosome {}", chrom);

            let regions = self.find_on_chromosome(chrom, affected, unaffected, &mut counter)?;
            debug!("{} regions kept on chromosome {}", regions.len(), chrom);
            found.extend(regions);
            counter.advance_to(per_chromosome * (i as u64 + 1));
        }

        found.sort();
        let joined = found.join_close(self.params.region_length_bp() / 2);

        if let Some(bad) = joined.iter().find(|r| r.start > r.end) {
            return Err(RegionFinderError::Failed(format!(
                "region {} has its start past its end",
                bad
            )));
        }
        Ok(joined)
    }

    fn select_chromosomes(&self, requested: Option<&[String]>, affected: &[Sample]) -> Vec<String> {
        let mut chromosomes: Vec<String> = match requested.or(self.params.chromosomes()) {
            Some(chroms) => chroms.to_vec(),
            None => affected
                .iter()
                .flat_map(|s| s.chromosomes())
                .map(|c| c.to_string())
                .collect(),
        };

        if self.params.autosomes_only() {
            chromosomes.retain(|c| is_autosome(c));
        }
        chromosomes.sort_by(|a, b| compare_chromosomes(a, b));
        chromosomes.dedup();
        chromosomes
    }

    fn chromosome_length(&self, build: &str, chrom: &str) -> u32 {
        match self.lengths.length(build, chrom) {
            Ok(length) => length,
            Err(e) => {
                warn!("{}, using {} as the chromosome end", e, SENTINEL_CHROM_LENGTH);
                SENTINEL_CHROM_LENGTH
            }
        }
    }

    /// Scan, refine and merge one sample's calls into chromosome-tagged regions.
    fn candidates(&self, chrom: &str, calls: &[GenotypeCall], chromosome_end: Option<u32>) -> Vec<Region> {
        let scanner = HomozygosityScanner::new(self.params.window_size(), self.params.het_cutoff());
        let refiner = BoundaryRefiner::new(self.params.refine_window(), self.params.refine_cutoff())
            .with_chromosome_end(chromosome_end);

        let refined: Vec<Region> = scanner
            .scan(calls)
            .iter()
            .filter_map(|candidate| refiner.refine(candidate, calls))
            .map(|r| r.into_region().with_chrom(chrom))
            .collect();
        refined.merge_by_position()
    }

    fn concordant(&self, a: &CallStore, b: &CallStore, region: &Region) -> Option<bool> {
        let a = a.range_query(region.start, region.end);
        let b = b.range_query(region.start, region.end);
        if a.is_empty() || b.is_empty() {
            None
        } else {
            Some(is_concordant(a, b, self.params.discordance_cutoff()))
        }
    }

    fn find_on_chromosome(
        &self,
        chrom: &str,
        affected: &[Sample],
        unaffected: &[Sample],
        counter: &mut ProgressCounter<'_>,
    ) -> RegionFinderResult<Vec<Region>> {
        let Some(stores) = affected
            .iter()
            .map(|s| s.store(chrom))
            .collect::<Option<Vec<&CallStore>>>()
        else {
            warn!("Not every affected sample has chromosome {}, skipping it", chrom);
            return Ok(Vec::new());
        };

        let chromosome_end = if self.params.extend_to_chromosome_end() {
            let build = affected[0].build.as_deref().unwrap_or(self.params.build());
            Some(self.chromosome_length(build, chrom))
        } else {
            None
        };

        let min_length = self.params.region_length_bp();
        let mut per_sample = Vec::with_capacity(stores.len());
        for store in &stores {
            self.cancel.check()?;
            let regions: Vec<Region> = self
                .candidates(chrom, store.calls(), chromosome_end)
                .into_iter()
                .filter(|r| r.length() >= min_length)
                .collect();
            per_sample.push(regions);
            counter.advance(1);
        }

        let first = stores[0];
        let mut shared = per_sample[0].clone();
        for (store, regions) in stores.iter().zip(&per_sample).skip(1) {
            self.cancel.check()?;
            if shared.is_empty() {
                break;
            }
            shared = shared.intersect(regions);

            if self.params.check_concordance() {
                let mut kept = Vec::with_capacity(shared.len());
                for region in shared {
                    self.cancel.check()?;
                    if self.concordant(first, store, &region) == Some(true) {
                        kept.push(region);
                    }
                }
                shared = kept;
            }
            counter.advance(1);
        }

        if shared.is_empty() {
            debug!("No shared regions on chromosome {}", chrom);
            return Ok(shared);
        }

        for sample in unaffected {
            self.cancel.check()?;
            let Some(store) = sample.store(chrom) else {
                debug!("Unaffected sample {} has no chromosome {}", sample.name, chrom);
                counter.advance(1);
                continue;
            };

            let overlaps = shared.intersect(&self.candidates(chrom, store.calls(), chromosome_end));
            let mut removed = Vec::with_capacity(overlaps.len());
            for overlap in overlaps {
                self.cancel.check()?;
                if !self.params.check_concordance()
                    || self.concordant(first, store, &overlap) == Some(true)
                {
                    removed.push(overlap);
                }
            }
            if !removed.is_empty() {
                debug!(
                    "Removing {} regions shared with unaffected sample {}",
                    removed.len(),
                    sample.name
                );
            }
            shared = shared.subtract_all(&removed);
            counter.advance(1);
        }

        let min_report_length = self.params.min_report_length();
        let min_report_calls = self.params.min_report_calls();
        Ok(shared
            .into_iter()
            .filter(|r| r.length() >= min_report_length)
            .filter(|r| {
                let most_calls = stores
                    .iter()
                    .map(|s| s.called_count(r.start, r.end))
                    .max()
                    .unwrap_or(0);
                most_calls >= min_report_calls
            })
            .collect())
    }
}

///
/// A region search running on its own thread, reporting over a channel.
///
pub struct RegionFinderTask {
    cancel: CancellationToken,
    handle: JoinHandle<RegionFinderResult<Vec<Region>>>,
}

impl RegionFinderTask {
    pub fn spawn(
        params: Parameters,
        lengths: Arc<dyn ChromosomeLengths>,
        chromosomes: Option<Vec<String>>,
        affected: Arc<Vec<Sample>>,
        unaffected: Arc<Vec<Sample>>,
        events: Sender<ProgressEvent>,
    ) -> RegionFinderResult<Self> {
        let params = params.validate()?;
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = thread::Builder::new()
            .name("region-finder".to_string())
            .spawn(move || {
                RegionFinder::new(params, lengths.as_ref())?
                    .with_cancellation(token)
                    .find_regions(chromosomes.as_deref(), &affected, &unaffected, &events)
            })?;

        Ok(RegionFinderTask { cancel, handle })
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the worker. A panic on the worker comes back as [RegionFinderError::Failed].
    pub fn join(self) -> RegionFinderResult<Vec<Region>> {
        self.handle
            .join()
            .unwrap_or_else(|_| Err(RegionFinderError::Failed("worker thread panicked".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rohmap_core::chrom_lengths::BuiltinChromLengths;
    use rohmap_core::models::Genotype;
    use rstest::*;

    fn sample(name: &str, chroms: &[&str]) -> Sample {
        let stores = chroms
            .iter()
            .map(|c| {
                let calls = (1..=20)
                    .map(|i| GenotypeCall::new(c, i * 100, &format!("rs{}", i), Genotype::HomozygousA))
                    .collect();
                CallStore::from_sorted(c, calls).unwrap()
            })
            .collect();
        Sample::new(name, None, stores)
    }

    #[rstest]
    #[case(None, false, vec!["1", "2", "10", "X"])]
    #[case(None, true, vec!["1", "2", "10"])]
    #[case(Some(vec!["X".to_string(), "2".to_string(), "2".to_string()]), false, vec!["2", "X"])]
    fn test_select_chromosomes(
        #[case] requested: Option<Vec<String>>,
        #[case] autosomes_only: bool,
        #[case] expected: Vec<&str>,
    ) {
        let params = Parameters::builder()
            .autosomes_only(autosomes_only)
            .build_params()
            .unwrap();
        let lengths = BuiltinChromLengths;
        let finder = RegionFinder::new(params, &lengths).unwrap();
        let affected = vec![sample("a", &["X", "2", "1"]), sample("b", &["10", "1"])];
        assert_eq!(finder.select_chromosomes(requested.as_deref(), &affected), expected);
    }

    #[rstest]
    fn test_chromosome_length_falls_back_to_sentinel() {
        let lengths = BuiltinChromLengths;
        let finder = RegionFinder::new(Parameters::default(), &lengths).unwrap();
        assert_eq!(finder.chromosome_length("hg19", "1"), 249_250_621);
        assert_eq!(finder.chromosome_length("hg19", "scaffold_7"), SENTINEL_CHROM_LENGTH);
        assert_eq!(finder.chromosome_length("mm10", "1"), SENTINEL_CHROM_LENGTH);
    }

    #[rstest]
    fn test_candidates_extend_to_chromosome_end() {
        let lengths = BuiltinChromLengths;
        let finder = RegionFinder::new(Parameters::default(), &lengths).unwrap();
        let affected = sample("a", &["1"]);
        let calls = affected.store("1").unwrap().calls();

        let plain = finder.candidates("1", calls, None);
        assert_eq!(plain, vec![Region::new(100, 2000, "rs1", "rs20").with_chrom("1")]);

        let extended = finder.candidates("1", calls, Some(5_000));
        assert_eq!(extended[0].end, 5_000);
    }
}
