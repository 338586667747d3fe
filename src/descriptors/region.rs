//! Valid-region bookkeeping and gap computation.
//!
//! Acquisition devices report where data *exists*. Consumers need the
//! opposite as well: an explicit marker for every stretch of sample indices
//! with no data behind it. [`RegionSet`] keeps the reported regions of one
//! channel ordered, and [`RegionSet::invalid_regions`] walks their complement.

use alloc::vec::Vec;

/// Closed interval of sample indices `[begin, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub begin: u64,
    pub end: u64,
}

impl Region {
    pub fn new(begin: u64, end: u64) -> Self {
        Self { begin, end }
    }

    /// Returns true if the two intervals share at least one index.
    #[inline]
    pub fn overlaps(&self, other: &Region) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }

    /// Returns true if `index` lies inside the interval.
    #[inline]
    pub fn contains(&self, index: u64) -> bool {
        self.begin <= index && index <= self.end
    }
}

/// A region of valid samples reported for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataRegion {
    pub channel_id: u64,
    pub region: Region,
}

impl DataRegion {
    pub fn new(channel_id: u64, begin: u64, end: u64) -> Self {
        Self {
            channel_id,
            region: Region::new(begin, end),
        }
    }
}

/// Valid regions of one channel, ordered by `(begin, end)`.
///
/// Regions are kept exactly as supplied: duplicates and overlapping entries
/// are not merged on insertion. Gap computation treats them as their union.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSet {
    regions: Vec<Region>,
    /// Largest `end` of all stored regions
    max_end: Option<u64>,
}

impl RegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a region at its sorted position.
    ///
    /// Returns true if the region overlaps one that was already present.
    /// Regions arriving in order are appended without scanning the set.
    pub fn insert(&mut self, region: Region) -> bool {
        let idx = self.regions.partition_point(|r| *r <= region);
        // Earlier regions all begin at or before `region`.
        let overlaps_prev = if idx == self.regions.len() {
            self.max_end.is_some_and(|end| end >= region.begin)
        } else {
            self.regions[..idx].iter().any(|r| r.end >= region.begin)
        };
        let overlaps_next = self
            .regions
            .get(idx)
            .is_some_and(|next| next.overlaps(&region));
        self.regions.insert(idx, region);
        self.max_end = Some(self.max_end.map_or(region.end, |end| end.max(region.end)));
        overlaps_prev || overlaps_next
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Returns true if some region covers `index`.
    pub fn contains(&self, index: u64) -> bool {
        self.regions.iter().any(|r| r.contains(index))
    }

    /// Walk the complement of the valid regions.
    ///
    /// The sample-index space starts out invalid. Every stretch before,
    /// between and after the valid regions is yielded as a gap; the last gap
    /// is open-ended and runs to `u64::MAX - 1`. An empty set yields nothing,
    /// meaning the channel is considered valid everywhere.
    pub fn invalid_regions(&self) -> InvalidRegions<'_> {
        InvalidRegions {
            regions: self.regions.iter(),
            cursor: if self.regions.is_empty() { None } else { Some(0) },
        }
    }
}

impl<'s> IntoIterator for &'s RegionSet {
    type Item = &'s Region;
    type IntoIter = core::slice::Iter<'s, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

/// Iterator over the gaps between the regions of a [`RegionSet`].
#[derive(Debug, Clone)]
pub struct InvalidRegions<'s> {
    regions: core::slice::Iter<'s, Region>,
    /// First index not yet known to be valid; `None` once the space is exhausted.
    cursor: Option<u64>,
}

impl Iterator for InvalidRegions<'_> {
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        let mut start = self.cursor?;

        for valid in self.regions.by_ref() {
            if valid.begin > start {
                self.cursor = valid.end.checked_add(1);
                return Some(Region::new(start, valid.begin - 1));
            }
            // Region starts inside already-valid space; extend the union.
            match valid.end.checked_add(1) {
                Some(next) => start = start.max(next),
                None => {
                    self.cursor = None;
                    return None;
                }
            }
        }

        self.cursor = None;
        (start < u64::MAX).then(|| Region::new(start, u64::MAX - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaps(set: &RegionSet) -> Vec<(u64, u64)> {
        set.invalid_regions().map(|r| (r.begin, r.end)).collect()
    }

    #[test]
    fn test_empty_set_has_no_gaps() {
        assert!(gaps(&RegionSet::new()).is_empty());
    }

    #[test]
    fn test_two_regions_three_gaps() {
        let mut set = RegionSet::new();
        set.insert(Region::new(10, 20));
        set.insert(Region::new(30, 40));
        assert_eq!(gaps(&set), vec![(0, 9), (21, 29), (41, u64::MAX - 1)]);
    }

    #[test]
    fn test_region_at_zero_has_no_leading_gap() {
        let mut set = RegionSet::new();
        set.insert(Region::new(0, 99));
        assert_eq!(gaps(&set), vec![(100, u64::MAX - 1)]);
    }

    #[test]
    fn test_adjacent_regions_have_no_gap() {
        let mut set = RegionSet::new();
        set.insert(Region::new(0, 9));
        set.insert(Region::new(10, 19));
        assert_eq!(gaps(&set), vec![(20, u64::MAX - 1)]);
    }

    #[test]
    fn test_unsorted_insertion_is_ordered() {
        let mut set = RegionSet::new();
        set.insert(Region::new(30, 40));
        set.insert(Region::new(10, 20));
        let begins: Vec<u64> = set.iter().map(|r| r.begin).collect();
        assert_eq!(begins, vec![10, 30]);
        assert_eq!(gaps(&set), vec![(0, 9), (21, 29), (41, u64::MAX - 1)]);
    }

    #[test]
    fn test_overlapping_regions_use_union() {
        let mut set = RegionSet::new();
        assert!(!set.insert(Region::new(10, 50)));
        assert!(set.insert(Region::new(20, 30)));
        assert!(!set.insert(Region::new(60, 70)));
        assert_eq!(set.len(), 3);
        assert_eq!(gaps(&set), vec![(0, 9), (51, 59), (71, u64::MAX - 1)]);
    }

    #[test]
    fn test_overlap_with_distant_predecessor() {
        let mut set = RegionSet::new();
        set.insert(Region::new(0, 100));
        set.insert(Region::new(10, 20));
        assert!(set.insert(Region::new(50, 60)));
        assert_eq!(gaps(&set), vec![(101, u64::MAX - 1)]);
    }

    #[test]
    fn test_in_order_overlap_against_earlier_long_region() {
        let mut set = RegionSet::new();
        assert!(!set.insert(Region::new(0, 1_000)));
        assert!(set.insert(Region::new(10, 20)));
        // Appended after (10, 20) but still inside (0, 1000)
        assert!(set.insert(Region::new(500, 600)));
        assert!(!set.insert(Region::new(1_001, 1_100)));
        assert_eq!(set.len(), 4);
        assert_eq!(gaps(&set), vec![(1_101, u64::MAX - 1)]);
    }

    #[test]
    fn test_many_in_order_regions() {
        let mut set = RegionSet::new();
        for i in 0..10_000u64 {
            assert!(!set.insert(Region::new(i * 10, i * 10 + 4)));
        }
        assert_eq!(set.len(), 10_000);
        assert_eq!(set.invalid_regions().count(), 10_000);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut set = RegionSet::new();
        set.insert(Region::new(5, 6));
        assert!(set.insert(Region::new(5, 6)));
        assert_eq!(set.len(), 2);
        assert_eq!(gaps(&set), vec![(0, 4), (7, u64::MAX - 1)]);
    }

    #[test]
    fn test_region_reaching_max_ends_gaps() {
        let mut set = RegionSet::new();
        set.insert(Region::new(100, u64::MAX));
        set.insert(Region::new(200, 300));
        assert_eq!(gaps(&set), vec![(0, 99)]);
    }

    #[test]
    fn test_region_ending_before_max_leaves_no_trailing_gap() {
        let mut set = RegionSet::new();
        set.insert(Region::new(0, u64::MAX - 1));
        assert!(gaps(&set).is_empty());
    }

    #[test]
    fn test_contains() {
        let mut set = RegionSet::new();
        set.insert(Region::new(10, 20));
        assert!(set.contains(10));
        assert!(set.contains(20));
        assert!(!set.contains(21));
    }
}
