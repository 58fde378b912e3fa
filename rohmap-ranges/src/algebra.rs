//! Interval set algebra over region lists.
//!
//! Every operation returns a new, sorted `Vec<Region>` and leaves its input
//! untouched. Overlap search uses the inclusive test on `[start, end]`, but
//! an intersection is only produced where the overlap has positive width
//! (`max(start) < min(end)`), so remainders left by [RegionAlgebra::subtract]
//! never intersect the interval that was removed.

use log::trace;

use rohmap_core::models::Region;

use crate::search::overlapping_range;

pub trait RegionAlgebra {
    /// Clone and sort by chromosome, start, then end.
    fn sorted(&self) -> Vec<Region>;

    /// Intersect with another sorted, non-overlapping region list.
    ///
    /// Each overlapping pair yields one region spanning
    /// `[max(start), min(end)]`. The id of each bound comes from the region
    /// that supplied it, `self` winning ties.
    ///
    /// # Example
    /// ```text
    /// A: 100–500 (a1;a2), 700–900 (a3;a4)
    /// B: 300–800 (b1;b2)
    /// intersect(A, B): 300–500 (b1;a2), 700–800 (a3;b2)
    /// ```
    fn intersect(&self, other: &[Region]) -> Vec<Region>;

    /// Remove interval `x` from a sorted, non-overlapping list.
    ///
    /// Regions overlapping `x` are replaced by their uncovered remainders:
    /// `[start, x.start]` carrying ids `(start_id, x.start_id)` and
    /// `[x.end, end]` carrying ids `(x.end_id, end_id)`.
    fn subtract(&self, x: &Region) -> Vec<Region>;

    /// [RegionAlgebra::subtract] applied for every interval in `xs`, in order.
    fn subtract_all(&self, xs: &[Region]) -> Vec<Region>;

    /// Single left-to-right pass over a sorted list joining neighbours on the
    /// same chromosome whose gap `next.start - prev.end` is at most `max_gap`.
    fn join_close(&self, max_gap: u32) -> Vec<Region>;

    /// Sort, then merge regions on the same chromosome whose intervals overlap.
    fn merge_by_position(&self) -> Vec<Region>;
}

fn positive_overlap(a: &Region, b: &Region) -> Option<Region> {
    if !a.same_chrom(b) {
        return None;
    }

    let (start, start_id) = if a.start >= b.start {
        (a.start, &a.start_id)
    } else {
        (b.start, &b.start_id)
    };
    let (end, end_id) = if a.end <= b.end {
        (a.end, &a.end_id)
    } else {
        (b.end, &b.end_id)
    };

    if start >= end {
        return None;
    }

    Some(Region {
        chrom: a.chrom.clone().or_else(|| b.chrom.clone()),
        start,
        end,
        start_id: start_id.clone(),
        end_id: end_id.clone(),
    })
}

fn remainders(region: &Region, x: &Region) -> Vec<Region> {
    if positive_overlap(region, x).is_none() {
        return vec![region.clone()];
    }

    let mut out = Vec::with_capacity(2);
    if region.start < x.start {
        out.push(Region {
            chrom: region.chrom.clone(),
            start: region.start,
            end: x.start,
            start_id: region.start_id.clone(),
            end_id: x.start_id.clone(),
        });
    }
    if x.end < region.end {
        out.push(Region {
            chrom: region.chrom.clone(),
            start: x.end,
            end: region.end,
            start_id: x.end_id.clone(),
            end_id: region.end_id.clone(),
        });
    }
    out
}

/// Extend `current` to cover `next`, keeping the end id of whichever end is kept.
fn absorb(current: &mut Region, next: &Region) {
    if next.end > current.end {
        current.end = next.end;
        current.end_id = next.end_id.clone();
    }
}

impl RegionAlgebra for [Region] {
    fn sorted(&self) -> Vec<Region> {
        let mut regions = self.to_vec();
        regions.sort();
        regions
    }

    fn intersect(&self, other: &[Region]) -> Vec<Region> {
        let mut overlaps: Vec<Region> = self
            .iter()
            .flat_map(|r| {
                other[overlapping_range(other, r)]
                    .iter()
                    .filter_map(move |o| positive_overlap(r, o))
            })
            .collect();
        overlaps.sort();
        overlaps
    }

    fn subtract(&self, x: &Region) -> Vec<Region> {
        let hit = overlapping_range(self, x);
        if hit.is_empty() {
            return self.sorted();
        }
        trace!("subtracting {} from {} regions", x, hit.len());

        let mut regions: Vec<Region> = self[..hit.start].to_vec();
        regions.extend(self[hit.clone()].iter().flat_map(|r| remainders(r, x)));
        regions.extend_from_slice(&self[hit.end..]);
        regions.sort();
        regions
    }

    fn subtract_all(&self, xs: &[Region]) -> Vec<Region> {
        xs.iter()
            .fold(self.sorted(), |regions, x| regions.subtract(x))
    }

    fn join_close(&self, max_gap: u32) -> Vec<Region> {
        let mut joined: Vec<Region> = Vec::with_capacity(self.len());
        for region in self {
            match joined.last_mut() {
                Some(prev)
                    if prev.same_chrom(region)
                        && i64::from(region.start) - i64::from(prev.end)
                            <= i64::from(max_gap) =>
                {
                    absorb(prev, region);
                }
                _ => joined.push(region.clone()),
            }
        }
        joined
    }

    fn merge_by_position(&self) -> Vec<Region> {
        let mut merged: Vec<Region> = Vec::with_capacity(self.len());
        for region in self.sorted() {
            match merged.last_mut() {
                Some(prev) if prev.same_chrom(&region) && region.start <= prev.end => {
                    absorb(prev, &region);
                }
                _ => merged.push(region),
            }
        }
        merged
    }
}
