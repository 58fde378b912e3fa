//! Pairwise genotype agreement between two samples over the same interval.

use rohmap_core::models::GenotypeCall;

/// Homozygous calls shared by two samples, and how many of them disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Concordance {
    pub matching: usize,
    pub discordant: usize,
}

impl Concordance {
    ///
    /// Walk two position-sorted call slices once, never rewinding `b`.
    ///
    /// A pair counts when both calls sit at the same position with the same
    /// id (case-insensitive) and both are homozygous. Heterozygous and
    /// no-call entries are skipped rather than counted as disagreement.
    ///
    pub fn compare_calls(a: &[GenotypeCall], b: &[GenotypeCall]) -> Self {
        let mut result = Concordance::default();
        let mut j = 0;

        for call in a {
            while j < b.len() && b[j].position < call.position {
                j += 1;
            }
            if j == b.len() {
                break;
            }

            let other = &b[j];
            if other.position != call.position || !other.id.eq_ignore_ascii_case(&call.id) {
                continue;
            }
            if call.is_homozygous() && other.is_homozygous() {
                result.matching += 1;
                if call.genotype != other.genotype {
                    result.discordant += 1;
                }
            }
        }
        result
    }

    pub fn discordant_fraction(&self) -> Option<f64> {
        if self.matching == 0 {
            None
        } else {
            Some(self.discordant as f64 / self.matching as f64)
        }
    }

    /// Concordant only with at least one match and a discordant fraction strictly below `cutoff`.
    pub fn is_concordant(&self, cutoff: f64) -> bool {
        self.discordant_fraction().is_some_and(|f| f < cutoff)
    }
}

/// Shorthand for [Concordance::compare_calls] followed by [Concordance::is_concordant].
pub fn is_concordant(a: &[GenotypeCall], b: &[GenotypeCall], cutoff: f64) -> bool {
    !b.is_empty() && Concordance::compare_calls(a, b).is_concordant(cutoff)
}
