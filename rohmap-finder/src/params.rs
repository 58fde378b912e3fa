use std::fs::read_to_string;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use rohmap_core::chrom_lengths::DEFAULT_BUILD;

use crate::errors::{RegionFinderError, RegionFinderResult};

pub const MIN_WINDOW_SIZE: usize = 10;

///
/// Settings for one region search. Fixed for the whole run.
///
/// Any subset of fields may be given in a TOML file; the rest keep their
/// defaults. Use [ParametersBuilder] to change values in code.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    window_size: usize,
    region_length_mb: f64,
    het_cutoff: f64,
    discordance_cutoff: f64,
    refine_window: Option<usize>,
    refine_cutoff: f64,
    min_report_length: u32,
    min_report_calls: usize,
    check_concordance: bool,
    chromosomes: Option<Vec<String>>,
    autosomes_only: bool,
    build: String,
    extend_to_chromosome_end: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            window_size: 100,
            region_length_mb: 1.0,
            het_cutoff: 0.05,
            discordance_cutoff: 0.01,
            refine_window: None,
            refine_cutoff: 0.1,
            min_report_length: 10_000,
            min_report_calls: 25,
            check_concordance: true,
            chromosomes: None,
            autosomes_only: false,
            build: DEFAULT_BUILD.to_string(),
            extend_to_chromosome_end: false,
        }
    }
}

fn check_fraction(name: &str, value: f64) -> RegionFinderResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RegionFinderError::InvalidParameters(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )))
    }
}

impl Parameters {
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::default()
    }

    ///
    /// Check ranges, clamping the window size up to [MIN_WINDOW_SIZE].
    ///
    pub fn validate(mut self) -> RegionFinderResult<Self> {
        if self.window_size < MIN_WINDOW_SIZE {
            warn!(
                "Window size {} is below the minimum, using {}",
                self.window_size, MIN_WINDOW_SIZE
            );
            self.window_size = MIN_WINDOW_SIZE;
        }

        check_fraction("het_cutoff", self.het_cutoff)?;
        check_fraction("discordance_cutoff", self.discordance_cutoff)?;
        check_fraction("refine_cutoff", self.refine_cutoff)?;

        if self.refine_window == Some(0) {
            return Err(RegionFinderError::InvalidParameters(
                "refine_window must be at least 1".to_string(),
            ));
        }

        let max_mb = f64::from(u32::MAX) / 1e6;
        if !(0.0..=max_mb).contains(&self.region_length_mb) {
            return Err(RegionFinderError::InvalidParameters(format!(
                "region_length_mb must be between 0 and {:.0}, got {}",
                max_mb, self.region_length_mb
            )));
        }

        Ok(self)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Candidate threshold in bp, the Mb setting rounded to the nearest base.
    pub fn region_length_bp(&self) -> u32 {
        (self.region_length_mb * 1e6).round() as u32
    }

    pub fn het_cutoff(&self) -> f64 {
        self.het_cutoff
    }

    pub fn discordance_cutoff(&self) -> f64 {
        self.discordance_cutoff
    }

    /// Explicit refine window, or a tenth of the scan window (at least 1).
    pub fn refine_window(&self) -> usize {
        self.refine_window
            .unwrap_or_else(|| (self.window_size / 10).max(1))
    }

    pub fn refine_cutoff(&self) -> f64 {
        self.refine_cutoff
    }

    pub fn min_report_length(&self) -> u32 {
        self.min_report_length
    }

    pub fn min_report_calls(&self) -> usize {
        self.min_report_calls
    }

    pub fn check_concordance(&self) -> bool {
        self.check_concordance
    }

    pub fn chromosomes(&self) -> Option<&[String]> {
        self.chromosomes.as_deref()
    }

    pub fn autosomes_only(&self) -> bool {
        self.autosomes_only
    }

    pub fn build(&self) -> &str {
        &self.build
    }

    pub fn extend_to_chromosome_end(&self) -> bool {
        self.extend_to_chromosome_end
    }
}

impl TryFrom<&Path> for Parameters {
    type Error = RegionFinderError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let params: Parameters = toml::from_str(&toml_str)?;
        params.validate()
    }
}

///
/// Builder for [Parameters], starting from the defaults or an existing set.
///
#[derive(Debug, Clone, Default)]
pub struct ParametersBuilder {
    params: Parameters,
}

impl From<Parameters> for ParametersBuilder {
    fn from(params: Parameters) -> Self {
        ParametersBuilder { params }
    }
}

impl ParametersBuilder {
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.params.window_size = window_size;
        self
    }

    pub fn region_length_mb(mut self, mb: f64) -> Self {
        self.params.region_length_mb = mb;
        self
    }

    pub fn het_cutoff(mut self, cutoff: f64) -> Self {
        self.params.het_cutoff = cutoff;
        self
    }

    pub fn discordance_cutoff(mut self, cutoff: f64) -> Self {
        self.params.discordance_cutoff = cutoff;
        self
    }

    pub fn refine_window(mut self, window: usize) -> Self {
        self.params.refine_window = Some(window);
        self
    }

    pub fn refine_cutoff(mut self, cutoff: f64) -> Self {
        self.params.refine_cutoff = cutoff;
        self
    }

    pub fn min_report_length(mut self, bp: u32) -> Self {
        self.params.min_report_length = bp;
        self
    }

    pub fn min_report_calls(mut self, calls: usize) -> Self {
        self.params.min_report_calls = calls;
        self
    }

    pub fn check_concordance(mut self, check: bool) -> Self {
        self.params.check_concordance = check;
        self
    }

    pub fn chromosomes(mut self, chromosomes: Vec<String>) -> Self {
        self.params.chromosomes = Some(chromosomes);
        self
    }

    pub fn autosomes_only(mut self, autosomes_only: bool) -> Self {
        self.params.autosomes_only = autosomes_only;
        self
    }

    pub fn build(mut self, build: &str) -> Self {
        self.params.build = build.to_string();
        self
    }

    pub fn extend_to_chromosome_end(mut self, extend: bool) -> Self {
        self.params.extend_to_chromosome_end = extend;
        self
    }

    pub fn build_params(self) -> RegionFinderResult<Parameters> {
        self.params.validate()
    }
}
