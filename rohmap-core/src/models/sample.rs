use fxhash::FxHashMap;

use crate::models::CallStore;
use crate::utils::compare_chromosomes;

///
/// Summary numbers over every call loaded for a sample.
///
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleStats {
    pub total_calls: usize,
    pub no_calls: usize,
    pub mean_confidence: Option<f64>,
}

impl SampleStats {
    pub fn no_call_percent(&self) -> f64 {
        if self.total_calls == 0 {
            return 0.0;
        }
        self.no_calls as f64 / self.total_calls as f64 * 100.0
    }

    /// Compute stats from the frozen stores. The mean confidence covers called genotypes only.
    pub fn from_stores<'a, I>(stores: I) -> Self
    where
        I: IntoIterator<Item = &'a CallStore>,
    {
        let mut stats = SampleStats::default();
        let mut confidence_sum = 0.0;
        let mut confidence_count = 0usize;

        for store in stores {
            for call in store.calls() {
                stats.total_calls += 1;
                if !call.is_called() {
                    stats.no_calls += 1;
                    continue;
                }
                if let Some(confidence) = call.confidence {
                    confidence_sum += confidence;
                    confidence_count += 1;
                }
            }
        }

        if confidence_count > 0 {
            stats.mean_confidence = Some(confidence_sum / confidence_count as f64);
        }
        stats
    }
}

///
/// Sample struct, one genotyped individual.
///
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: String,
    pub build: Option<String>,
    pub stats: SampleStats,
    stores: FxHashMap<String, CallStore>,
}

impl Sample {
    pub fn new(name: &str, build: Option<String>, stores: Vec<CallStore>) -> Self {
        let stats = SampleStats::from_stores(stores.iter());
        let stores = stores
            .into_iter()
            .map(|s| (s.chrom().to_string(), s))
            .collect();
        Sample {
            name: name.to_string(),
            build,
            stats,
            stores,
        }
    }

    pub fn store(&self, chrom: &str) -> Option<&CallStore> {
        self.stores.get(chrom)
    }

    pub fn has_chromosome(&self, chrom: &str) -> bool {
        self.stores.contains_key(chrom)
    }

    ///
    /// Chromosomes with data, in karyotype order.
    ///
    pub fn chromosomes(&self) -> Vec<&str> {
        let mut chroms: Vec<&str> = self.stores.keys().map(|k| k.as_str()).collect();
        chroms.sort_by(|a, b| compare_chromosomes(a, b));
        chroms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Genotype, GenotypeCall};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn store(chrom: &str, genotypes: &[Genotype]) -> CallStore {
        let calls = genotypes
            .iter()
            .enumerate()
            .map(|(i, g)| {
                GenotypeCall::new(chrom, (i as u32 + 1) * 100, &format!("rs{}", i), *g)
                    .with_confidence(0.01 * (i as f64 + 1.0))
            })
            .collect();
        CallStore::from_sorted(chrom, calls).unwrap()
    }

    #[rstest]
    fn test_sample_stats() {
        let sample = Sample::new(
            "s1",
            Some("hg19".to_string()),
            vec![
                store("1", &[Genotype::HomozygousA, Genotype::NoCall]),
                store("2", &[Genotype::Heterozygous, Genotype::NoCall]),
            ],
        );
        assert_eq!(sample.stats.total_calls, 4);
        assert_eq!(sample.stats.no_calls, 2);
        assert_eq!(sample.stats.no_call_percent(), 50.0);
        let mean = sample.stats.mean_confidence.unwrap();
        // no-calls do not contribute to the mean
        assert!((mean - 0.01).abs() < 1e-12);
    }

    #[rstest]
    fn test_chromosomes_in_karyotype_order() {
        let sample = Sample::new(
            "s1",
            None,
            vec![
                store("X", &[Genotype::HomozygousA]),
                store("10", &[Genotype::HomozygousA]),
                store("2", &[Genotype::HomozygousA]),
            ],
        );
        assert_eq!(sample.chromosomes(), vec!["2", "10", "X"]);
        assert!(sample.has_chromosome("10"));
        assert!(sample.store("3").is_none());
    }
}
