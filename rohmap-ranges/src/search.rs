use std::cmp::Ordering;
use std::ops::Range;

use rohmap_core::models::Region;
use rohmap_core::utils::compare_chromosomes;

fn chrom_order(a: &Region, b: &Region) -> Ordering {
    match (&a.chrom, &b.chrom) {
        (Some(x), Some(y)) => compare_chromosomes(x, y),
        _ => Ordering::Equal,
    }
}

///
/// Where `candidate` sits relative to the inclusive interval of `target`:
/// `Less` if wholly before, `Greater` if wholly after, `Equal` on any overlap.
///
fn locate(candidate: &Region, target: &Region) -> Ordering {
    chrom_order(candidate, target).then_with(|| {
        if candidate.end < target.start {
            Ordering::Less
        } else if candidate.start > target.end {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

///
/// Binary search for any region intersecting `target`, using the inclusive
/// test `start <= target.end && end >= target.start`.
///
/// `regions` must be sorted and hold no overlapping entries.
pub fn find_any_overlap(regions: &[Region], target: &Region) -> Option<usize> {
    regions
        .binary_search_by(|candidate| locate(candidate, target))
        .ok()
}

///
/// All regions intersecting `target`, as a contiguous index range.
///
/// Finds one hit by binary search, then scans the neighbours on either side
/// while they still intersect.
pub fn overlapping_range(regions: &[Region], target: &Region) -> Range<usize> {
    let Some(hit) = find_any_overlap(regions, target) else {
        return 0..0;
    };

    let mut lower = hit;
    while lower > 0 && regions[lower - 1].overlaps(target) {
        lower -= 1;
    }
    let mut upper = hit + 1;
    while upper < regions.len() && regions[upper].overlaps(target) {
        upper += 1;
    }
    lower..upper
}
