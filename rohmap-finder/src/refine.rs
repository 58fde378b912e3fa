use log::debug;

use rohmap_core::models::GenotypeCall;

use crate::scanner::{Direction, SampleRegion, het_fraction, padded_range};

///
/// Moves the edges of a candidate to the nearest clear heterozygous run.
///
/// Each edge is walked one call at a time with a window of `window` calls;
/// the first window whose het fraction exceeds `cutoff` pins the edge to the
/// het call nearest the run. Edges that never trigger go to the outermost
/// call, or to `chromosome_end` for the end edge when one is set.
///
#[derive(Debug, Clone, Copy)]
pub struct BoundaryRefiner {
    window: usize,
    cutoff: f64,
    chromosome_end: Option<u32>,
}

impl BoundaryRefiner {
    pub fn new(window: usize, cutoff: f64) -> Self {
        BoundaryRefiner {
            window: window.max(1),
            cutoff,
            chromosome_end: None,
        }
    }

    pub fn with_chromosome_end(mut self, chromosome_end: Option<u32>) -> Self {
        self.chromosome_end = chromosome_end;
        self
    }

    fn triggers(&self, window: &[GenotypeCall]) -> bool {
        het_fraction(window).is_some_and(|f| f > self.cutoff)
    }

    ///
    /// Refine both edges of `region`, found in `calls`.
    ///
    /// Returns `None` if the refined start lands past the refined end.
    pub fn refine(&self, region: &SampleRegion, calls: &[GenotypeCall]) -> Option<SampleRegion> {
        if calls.is_empty() {
            return None;
        }
        let last = calls.len() - 1;

        let start_index = self.refine_start(region, calls).unwrap_or(0);
        let (end_index, end) = match self.refine_end(region, calls) {
            Some(index) => (index, calls[index].position),
            None => {
                let last_position = calls[last].position;
                let end = self
                    .chromosome_end
                    .map_or(last_position, |len| len.max(last_position));
                (last, end)
            }
        };

        let start = calls[start_index].position;
        if start > end {
            debug!(
                "Dropping region {}-{}: refined start {} is past refined end {}",
                region.start, region.end, start, end
            );
            return None;
        }

        Some(SampleRegion {
            start_index,
            end_index,
            start,
            end,
            start_id: calls[start_index].id.clone(),
            end_id: calls[end_index].id.clone(),
        })
    }

    /// Index of the last het in the first triggering window walking backward.
    fn refine_start(&self, region: &SampleRegion, calls: &[GenotypeCall]) -> Option<usize> {
        let mut index = (region.start_index + self.window).min(calls.len() - 1);
        loop {
            let nominal_end = (index + self.window).min(calls.len());
            let range = padded_range(calls, index..nominal_end, Direction::Backward);
            let window = &calls[range.clone()];
            if self.triggers(window) {
                return window
                    .iter()
                    .rposition(|c| c.is_heterozygous())
                    .map(|i| range.start + i);
            }
            if index == 0 {
                return None;
            }
            index -= 1;
        }
    }

    /// Index of the first het in the first triggering window walking forward.
    fn refine_end(&self, region: &SampleRegion, calls: &[GenotypeCall]) -> Option<usize> {
        let mut index = region.end_index.saturating_sub(self.window);
        while index < calls.len() {
            let nominal_end = (index + self.window).min(calls.len());
            let range = padded_range(calls, index..nominal_end, Direction::Forward);
            let window = &calls[range.clone()];
            if self.triggers(window) {
                return window
                    .iter()
                    .position(|c| c.is_heterozygous())
                    .map(|i| range.start + i);
            }
            index += 1;
        }
        None
    }
}
