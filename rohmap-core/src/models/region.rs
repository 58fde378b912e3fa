use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::utils::compare_chromosomes;

///
/// Region struct, a shared run of homozygosity in genome coordinates.
///
/// Regions that leave a single sample's context carry no call-store
/// indices, only positions and the ids of the calls at either bound.
/// `chrom` is `None` until the region is tagged with its chromosome.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub chrom: Option<String>,
    pub start: u32,
    pub end: u32,
    pub start_id: String,
    pub end_id: String,
}

impl Region {
    pub fn new(start: u32, end: u32, start_id: &str, end_id: &str) -> Self {
        Region {
            chrom: None,
            start,
            end,
            start_id: start_id.to_string(),
            end_id: end_id.to_string(),
        }
    }

    pub fn with_chrom(mut self, chrom: &str) -> Self {
        self.chrom = Some(chrom.to_string());
        self
    }

    ///
    /// Get length of the region, `end - start`
    ///
    pub fn length(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// The sentinel region with every coordinate at zero.
    pub fn is_empty(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    fn chrom_str(&self) -> &str {
        self.chrom.as_deref().unwrap_or("")
    }

    ///
    /// Get region as `chr:start-end`
    ///
    pub fn coordinate_string(&self) -> String {
        format!("{}:{}-{}", self.chrom_str(), self.start, self.end)
    }

    ///
    /// Get region as a BED line, `chr\tstart\tend`
    ///
    pub fn bed_line(&self) -> String {
        format!("{}\t{}\t{}", self.chrom_str(), self.start, self.end)
    }

    pub fn id_line(&self) -> String {
        format!("{};{}", self.start_id, self.end_id)
    }

    /// Inclusive overlap test on `[start, end]`, chromosome-aware.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.same_chrom(other) && self.start <= other.end && self.end >= other.start
    }

    ///
    /// Whether two regions may lie on the same chromosome. A region without a
    /// chromosome matches any other.
    ///
    pub fn same_chrom(&self, other: &Region) -> bool {
        match (&self.chrom, &other.chrom) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => true,
        }
    }
}

impl Ord for Region {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_chrom = match (&self.chrom, &other.chrom) {
            (Some(a), Some(b)) => compare_chromosomes(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_chrom
            .then(self.start.cmp(&other.start))
            .then(self.end.cmp(&other.end))
            .then_with(|| self.start_id.cmp(&other.start_id))
            .then_with(|| self.end_id.cmp(&other.end_id))
    }
}

impl PartialOrd for Region {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate_string())
    }
}
