use std::ops::Range;

use log::debug;

use crate::errors::CallStoreError;
use crate::models::GenotypeCall;

///
/// CallStore struct, the calls of one sample on one chromosome.
///
/// Positions are unique and strictly increasing. The store is frozen once
/// built, so every lookup is a binary search over `calls`.
///
#[derive(Clone, Debug, PartialEq)]
pub struct CallStore {
    chrom: String,
    calls: Vec<GenotypeCall>,
}

impl CallStore {
    ///
    /// Build a store from calls that are already sorted and deduplicated.
    ///
    /// # Arguments
    /// - chrom: chromosome every call must belong to
    /// - calls: calls ordered by strictly increasing position
    pub fn from_sorted(chrom: &str, calls: Vec<GenotypeCall>) -> Result<Self, CallStoreError> {
        for (index, call) in calls.iter().enumerate() {
            if call.chrom != chrom {
                return Err(CallStoreError::ChromosomeMismatch {
                    expected: chrom.to_string(),
                    found: call.chrom.clone(),
                    id: call.id.clone(),
                });
            }
            if index > 0 && calls[index - 1].position >= call.position {
                return Err(CallStoreError::Unsorted {
                    chrom: chrom.to_string(),
                    index,
                    previous: calls[index - 1].position,
                    position: call.position,
                });
            }
        }

        Ok(CallStore {
            chrom: chrom.to_string(),
            calls,
        })
    }

    ///
    /// Sort calls by position, collapse duplicate positions and build a store.
    ///
    /// When two calls share a position the one with the lower confidence
    /// value wins if both carry one; otherwise the earlier call is kept.
    pub fn from_unsorted(
        chrom: &str,
        mut calls: Vec<GenotypeCall>,
    ) -> Result<Self, CallStoreError> {
        // stable, so duplicates keep their input order
        calls.sort_by_key(|c| c.position);
        let before = calls.len();
        let calls = dedup_positions(calls);
        if calls.len() < before {
            debug!(
                "Collapsed {} duplicate positions on chromosome {}",
                before - calls.len(),
                chrom
            );
        }
        CallStore::from_sorted(chrom, calls)
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn calls(&self) -> &[GenotypeCall] {
        &self.calls
    }

    pub fn get(&self, index: usize) -> Option<&GenotypeCall> {
        self.calls.get(index)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn first_position(&self) -> Option<u32> {
        self.calls.first().map(|c| c.position)
    }

    pub fn last_position(&self) -> Option<u32> {
        self.calls.last().map(|c| c.position)
    }

    /// Index range of calls with `start <= position <= end`.
    pub fn index_range(&self, start: u32, end: u32) -> Range<usize> {
        if start > end {
            return 0..0;
        }
        let lower = self.calls.partition_point(|c| c.position < start);
        let upper = self.calls.partition_point(|c| c.position <= end);
        lower..upper.max(lower)
    }

    ///
    /// Get the calls with `start <= position <= end`, in order.
    ///
    pub fn range_query(&self, start: u32, end: u32) -> &[GenotypeCall] {
        &self.calls[self.index_range(start, end)]
    }

    ///
    /// Same as [CallStore::range_query] but extended by up to `flank` calls on
    /// each side, clamped to the store bounds.
    ///
    pub fn range_query_with_flank(&self, start: u32, end: u32, flank: usize) -> &[GenotypeCall] {
        if start > end {
            return &[];
        }
        let range = self.index_range(start, end);
        let lower = range.start.saturating_sub(flank);
        let upper = range.end.saturating_add(flank).min(self.calls.len());
        &self.calls[lower..upper]
    }

    ///
    /// Locate the index of coordinate `c`.
    ///
    /// An exact match wins. Otherwise with `look_back` the greatest index whose
    /// position is below `c` (or 0), without it the least index whose position
    /// is above `c` (or the last index). Returns `None` for an empty store.
    pub fn nearest_coordinate(&self, c: u32, look_back: bool) -> Option<usize> {
        if self.calls.is_empty() {
            return None;
        }
        match self.calls.binary_search_by_key(&c, |call| call.position) {
            Ok(index) => Some(index),
            Err(insert_at) => {
                if look_back {
                    Some(insert_at.saturating_sub(1))
                } else {
                    Some(insert_at.min(self.calls.len() - 1))
                }
            }
        }
    }

    /// Number of calls in `[start, end]` that are not no-calls.
    pub fn called_count(&self, start: u32, end: u32) -> usize {
        self.range_query(start, end)
            .iter()
            .filter(|c| c.is_called())
            .count()
    }
}

fn dedup_positions(calls: Vec<GenotypeCall>) -> Vec<GenotypeCall> {
    let mut kept: Vec<GenotypeCall> = Vec::with_capacity(calls.len());
    for call in calls {
        match kept.last_mut() {
            Some(previous) if previous.position == call.position => {
                if let (Some(new), Some(old)) = (call.confidence, previous.confidence) {
                    if new < old {
                        *previous = call;
                    }
                }
            }
            _ => kept.push(call),
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genotype;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn call(position: u32, genotype: Genotype) -> GenotypeCall {
        GenotypeCall::new("1", position, &format!("rs{}", position), genotype)
    }

    #[fixture]
    fn store() -> CallStore {
        let calls = [100, 200, 300, 400, 500]
            .into_iter()
            .map(|p| call(p, Genotype::HomozygousA))
            .collect();
        CallStore::from_sorted("1", calls).unwrap()
    }

    #[rstest]
    fn test_rejects_unsorted_input() {
        let calls = vec![call(200, Genotype::HomozygousA), call(100, Genotype::HomozygousB)];
        let err = CallStore::from_sorted("1", calls).unwrap_err();
        assert!(matches!(err, CallStoreError::Unsorted { index: 1, .. }));
    }

    #[rstest]
    fn test_rejects_duplicate_positions_when_sorted() {
        let calls = vec![call(100, Genotype::HomozygousA), call(100, Genotype::HomozygousB)];
        assert!(CallStore::from_sorted("1", calls).is_err());
    }

    #[rstest]
    fn test_rejects_other_chromosome() {
        let calls = vec![GenotypeCall::new("2", 100, "rs1", Genotype::HomozygousA)];
        let err = CallStore::from_sorted("1", calls).unwrap_err();
        assert!(matches!(err, CallStoreError::ChromosomeMismatch { .. }));
    }

    #[rstest]
    fn test_from_unsorted_sorts_strictly() {
        let calls = vec![
            call(300, Genotype::HomozygousA),
            call(100, Genotype::HomozygousA),
            call(200, Genotype::Heterozygous),
            call(100, Genotype::HomozygousB),
        ];
        let store = CallStore::from_unsorted("1", calls).unwrap();
        let positions: Vec<u32> = store.calls().iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![100, 200, 300]);
        assert!(store.calls().windows(2).all(|w| w[0].position < w[1].position));
        // no confidence on either duplicate: earlier call kept
        assert_eq!(store.calls()[0].genotype, Genotype::HomozygousA);
    }

    #[rstest]
    fn test_duplicate_keeps_lower_confidence() {
        let calls = vec![
            call(100, Genotype::HomozygousA).with_confidence(0.02),
            call(100, Genotype::HomozygousB).with_confidence(0.001),
            call(200, Genotype::HomozygousA).with_confidence(0.001),
            call(200, Genotype::HomozygousB).with_confidence(0.5),
        ];
        let store = CallStore::from_unsorted("1", calls).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.calls()[0].genotype, Genotype::HomozygousB);
        assert_eq!(store.calls()[1].genotype, Genotype::HomozygousA);
    }

    #[rstest]
    fn test_duplicate_with_one_confidence_keeps_earlier() {
        let calls = vec![
            call(100, Genotype::HomozygousA),
            call(100, Genotype::HomozygousB).with_confidence(0.001),
        ];
        let store = CallStore::from_unsorted("1", calls).unwrap();
        assert_eq!(store.calls()[0].genotype, Genotype::HomozygousA);
    }

    #[rstest]
    #[case(200, 400, vec![200, 300, 400])]
    #[case(150, 450, vec![200, 300, 400])]
    #[case(0, 100, vec![100])]
    #[case(501, 900, vec![])]
    #[case(210, 290, vec![])]
    #[case(400, 200, vec![])]
    fn test_range_query(
        store: CallStore,
        #[case] start: u32,
        #[case] end: u32,
        #[case] expected: Vec<u32>,
    ) {
        let positions: Vec<u32> = store
            .range_query(start, end)
            .iter()
            .map(|c| c.position)
            .collect();
        assert_eq!(positions, expected);
    }

    #[rstest]
    #[case(300, 300, 1, vec![200, 300, 400])]
    #[case(100, 200, 2, vec![100, 200, 300, 400])]
    #[case(450, 500, 10, vec![100, 200, 300, 400, 500])]
    fn test_range_query_with_flank(
        store: CallStore,
        #[case] start: u32,
        #[case] end: u32,
        #[case] flank: usize,
        #[case] expected: Vec<u32>,
    ) {
        let positions: Vec<u32> = store
            .range_query_with_flank(start, end, flank)
            .iter()
            .map(|c| c.position)
            .collect();
        assert_eq!(positions, expected);
    }

    #[rstest]
    #[case(300, true, 2)]
    #[case(300, false, 2)]
    #[case(250, true, 1)]
    #[case(250, false, 2)]
    #[case(50, true, 0)]
    #[case(50, false, 0)]
    #[case(900, true, 4)]
    #[case(900, false, 4)]
    fn test_nearest_coordinate(
        store: CallStore,
        #[case] c: u32,
        #[case] look_back: bool,
        #[case] expected: usize,
    ) {
        assert_eq!(store.nearest_coordinate(c, look_back), Some(expected));
    }

    #[rstest]
    fn test_nearest_coordinate_empty_store() {
        let store = CallStore::from_sorted("1", vec![]).unwrap();
        assert_eq!(store.nearest_coordinate(100, true), None);
    }

    #[rstest]
    fn test_called_count_skips_no_calls() {
        let calls = vec![
            call(100, Genotype::HomozygousA),
            call(200, Genotype::NoCall),
            call(300, Genotype::Heterozygous),
        ];
        let store = CallStore::from_sorted("1", calls).unwrap();
        assert_eq!(store.called_count(100, 300), 2);
    }
}
