//! Sliding-window homozygosity scan over one sample's calls on one chromosome.

use std::ops::Range;

use rohmap_core::models::{GenotypeCall, Region};

///
/// A candidate run inside one sample's call store. Unlike [Region] it keeps
/// the store indices of both bounds, which only mean something for the calls
/// the region was found in.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRegion {
    pub start_index: usize,
    pub end_index: usize,
    pub start: u32,
    pub end: u32,
    pub start_id: String,
    pub end_id: String,
}

impl SampleRegion {
    pub fn from_indices(calls: &[GenotypeCall], start_index: usize, end_index: usize) -> Self {
        SampleRegion {
            start_index,
            end_index,
            start: calls[start_index].position,
            end: calls[end_index].position,
            start_id: calls[start_index].id.clone(),
            end_id: calls[end_index].id.clone(),
        }
    }

    pub fn length(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Drop the store indices.
    pub fn into_region(self) -> Region {
        Region {
            chrom: None,
            start: self.start,
            end: self.end,
            start_id: self.start_id,
            end_id: self.end_id,
        }
    }
}

/// Which side of a window no-call replacements are taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Pull calls that follow the window.
    Forward,
    /// Pull calls that precede the window.
    Backward,
}

///
/// Widen `window` until it holds as many called genotypes as its nominal
/// length, or the calls run out in `direction`. No-calls stay in the range
/// as padding.
///
pub fn padded_range(calls: &[GenotypeCall], window: Range<usize>, direction: Direction) -> Range<usize> {
    let wanted = window.len();
    let mut called = calls[window.clone()].iter().filter(|c| c.is_called()).count();
    let Range { mut start, mut end } = window;

    match direction {
        Direction::Forward => {
            while called < wanted && end < calls.len() {
                if calls[end].is_called() {
                    called += 1;
                }
                end += 1;
            }
        }
        Direction::Backward => {
            while called < wanted && start > 0 {
                start -= 1;
                if calls[start].is_called() {
                    called += 1;
                }
            }
        }
    }
    start..end
}

/// Fraction of heterozygous calls among called genotypes, `None` when nothing was called.
pub fn het_fraction(calls: &[GenotypeCall]) -> Option<f64> {
    let (hets, called) = calls.iter().fold((0usize, 0usize), |(h, c), call| {
        (h + call.is_heterozygous() as usize, c + call.is_called() as usize)
    });
    if called == 0 {
        None
    } else {
        Some(hets as f64 / called as f64)
    }
}

/// A window is homozygous when its het fraction is strictly below `het_cutoff`.
pub fn is_homozygous(calls: &[GenotypeCall], het_cutoff: f64) -> bool {
    het_fraction(calls).is_some_and(|f| f < het_cutoff)
}

///
/// Merge scan-ordered candidates whose index ranges overlap or touch.
///
pub fn merge_sample_regions(regions: Vec<SampleRegion>) -> Vec<SampleRegion> {
    let mut merged: Vec<SampleRegion> = Vec::with_capacity(regions.len());
    for region in regions {
        match merged.last_mut() {
            Some(prev) if prev.end_index >= region.start_index => {
                if region.end_index > prev.end_index {
                    prev.end_index = region.end_index;
                    prev.end = region.end;
                    prev.end_id = region.end_id;
                }
            }
            _ => merged.push(region),
        }
    }
    merged
}

#[derive(Debug, Clone, Copy)]
pub struct HomozygosityScanner {
    window: usize,
    het_cutoff: f64,
}

impl HomozygosityScanner {
    pub fn new(window: usize, het_cutoff: f64) -> Self {
        HomozygosityScanner {
            window: window.max(1),
            het_cutoff,
        }
    }

    fn step(&self) -> usize {
        (self.window / 2).max(1)
    }

    ///
    /// Scan `calls` and return merged homozygous candidates in index order.
    ///
    /// Windows advance by half their length. No-calls inside a window are
    /// compensated with the calls that follow it, and the cursor skips the
    /// calls pulled in that way.
    pub fn scan(&self, calls: &[GenotypeCall]) -> Vec<SampleRegion> {
        let mut candidates = Vec::new();
        let mut cursor = 0;

        while cursor < calls.len() {
            let nominal_end = (cursor + self.window).min(calls.len());
            let range = padded_range(calls, cursor..nominal_end, Direction::Forward);
            let window = &calls[range.clone()];

            if is_homozygous(window, self.het_cutoff) {
                let first = window.iter().position(|c| c.is_called());
                let last = window.iter().rposition(|c| c.is_called());
                if let (Some(first), Some(last)) = (first, last) {
                    candidates.push(SampleRegion::from_indices(
                        calls,
                        range.start + first,
                        range.start + last,
                    ));
                }
            }

            if range.end >= calls.len() {
                break;
            }
            let replacements = range.end - nominal_end;
            cursor += self.step() + replacements;
        }

        merge_sample_regions(candidates)
    }
}
