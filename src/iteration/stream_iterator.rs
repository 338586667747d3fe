use crate::iteration::{RangeKind, Sample, SampleCursor};
use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Reverse;

/// Summary of one range held by a [`StreamIterator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeInfo {
    pub kind: RangeKind,
    /// Timestamp of the first sample
    pub begin: u64,
    /// Timestamp of the last sample
    pub end: u64,
    /// Number of samples in the range
    pub sample_count: u64,
}

/// One run of samples bounded by two inclusive cursors.
#[derive(Debug, Clone)]
struct CursorRange<'a> {
    begin: SampleCursor<'a>,
    end: SampleCursor<'a>,
    current: SampleCursor<'a>,
    remaining: u64,
    sample_count: u64,
    kind: RangeKind,
}

impl<'a> CursorRange<'a> {
    fn sample(&self) -> Sample<'a> {
        Sample {
            timestamp: self.current.timestamp(),
            kind: self.kind,
            data: match self.kind {
                RangeKind::Data => self.current.data(),
                RangeKind::Invalid => None,
            },
        }
    }

    fn info(&self) -> RangeInfo {
        RangeInfo {
            kind: self.kind,
            begin: self.begin.timestamp(),
            end: self.end.timestamp(),
            sample_count: self.sample_count,
        }
    }
}

/// Time-ordered traversal over the data and gap ranges of one channel.
///
/// Ranges are collected with [`add_range`](Self::add_range) and prepared by
/// [`init`](Self::init), which stable-sorts them by the timestamp of their
/// first sample. Iteration then merges all ranges: every step yields the
/// pending sample with the smallest timestamp, ties going to the range that
/// comes first after sorting (data ranges before gaps when both start at the
/// same index, since the reader adds data ranges first).
///
/// Traversal is forward only. The usual way to start over is
/// [`crate::StreamReader::update_stream_iterator`], which refills the
/// iterator in place and keeps its allocations.
///
/// Gap ranges are open-ended, so a channel with declared regions yields a
/// practically endless tail of invalid markers; bound the traversal by
/// timestamp or count.
#[derive(Debug, Clone, Default)]
pub struct StreamIterator<'a> {
    ranges: Vec<CursorRange<'a>>,
    pending: BinaryHeap<Reverse<(u64, usize)>>,
    initialized: bool,
}

impl<'a> StreamIterator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all ranges. Capacity is kept for reuse.
    pub fn clear_ranges(&mut self) {
        self.ranges.clear();
        self.pending.clear();
        self.initialized = false;
    }

    /// Append the range `[begin, end]`.
    ///
    /// The sample count is derived from the distance between the cursors.
    /// Returns false, and leaves the iterator unchanged, if `end` is not
    /// reachable from `begin` in whole strides. Call [`init`](Self::init)
    /// before iterating.
    pub fn add_range(
        &mut self,
        begin: SampleCursor<'a>,
        end: SampleCursor<'a>,
        kind: RangeKind,
    ) -> bool {
        let Some(sample_count) = begin.steps_to(&end) else {
            tracing::warn!(
                begin = begin.position(),
                end = end.position(),
                "ignoring range with unreachable end cursor"
            );
            return false;
        };
        self.push_range(begin, end, sample_count, kind);
        true
    }

    /// Append a range holding exactly `sample_count` samples starting at
    /// `begin`; `end` only describes the last sample.
    ///
    /// Used for block placements, where the count is known and a zero stride
    /// puts every sample at the same position.
    pub(crate) fn add_counted_range(
        &mut self,
        begin: SampleCursor<'a>,
        end: SampleCursor<'a>,
        sample_count: u64,
        kind: RangeKind,
    ) {
        self.push_range(begin, end, sample_count, kind);
    }

    fn push_range(
        &mut self,
        begin: SampleCursor<'a>,
        end: SampleCursor<'a>,
        sample_count: u64,
        kind: RangeKind,
    ) {
        self.ranges.push(CursorRange {
            begin,
            end,
            current: begin,
            remaining: sample_count,
            sample_count,
            kind,
        });
        self.initialized = false;
    }

    /// Order the ranges and position the iterator at the earliest sample.
    pub fn init(&mut self) {
        self.ranges.sort_by_key(|range| range.begin.timestamp());
        self.pending.clear();
        for (idx, range) in self.ranges.iter().enumerate() {
            if range.remaining > 0 {
                self.pending.push(Reverse((range.current.timestamp(), idx)));
            }
        }
        self.initialized = true;
    }

    /// Returns true while samples remain.
    pub fn is_valid(&self) -> bool {
        if self.initialized {
            !self.pending.is_empty()
        } else {
            self.ranges.iter().any(|range| range.remaining > 0)
        }
    }

    /// Timestamp of the next sample without consuming it.
    pub fn peek_timestamp(&mut self) -> Option<u64> {
        if !self.initialized {
            self.init();
        }
        self.pending.peek().map(|Reverse((timestamp, _))| *timestamp)
    }

    /// Number of ranges held.
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Describe the ranges in traversal order (after [`init`](Self::init)).
    pub fn ranges(&self) -> impl Iterator<Item = RangeInfo> + '_ {
        self.ranges.iter().map(CursorRange::info)
    }

    /// Samples not yet yielded, saturating at `u64::MAX`.
    pub fn remaining(&self) -> u64 {
        self.ranges
            .iter()
            .fold(0u64, |acc, range| acc.saturating_add(range.remaining))
    }
}

impl<'a> Iterator for StreamIterator<'a> {
    type Item = Sample<'a>;

    fn next(&mut self) -> Option<Sample<'a>> {
        if !self.initialized {
            self.init();
        }

        let Reverse((_, idx)) = self.pending.pop()?;
        let range = &mut self.ranges[idx];
        let sample = range.sample();

        range.remaining -= 1;
        if range.remaining > 0 {
            range.current.advance();
            self.pending.push(Reverse((range.current.timestamp(), idx)));
        }

        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        match usize::try_from(remaining) {
            Ok(n) if remaining < u64::MAX => (n, Some(n)),
            _ => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn implicit_range<'a>(
        data: &'a [u8],
        stride: u64,
        first: u64,
        count: u64,
    ) -> (SampleCursor<'a>, SampleCursor<'a>) {
        let begin = SampleCursor::implicit(data, 0, stride, first);
        let end = SampleCursor::implicit(data, stride * (count - 1), stride, first + count - 1);
        (begin, end)
    }

    #[test]
    fn test_empty_iterator() {
        let mut it = StreamIterator::new();
        it.init();
        assert!(!it.is_valid());
        assert_eq!(it.next(), None);
        assert_eq!(it.range_count(), 0);
    }

    #[test]
    fn test_single_range() {
        let data: Vec<u8> = (0u8..8).collect();
        let (begin, end) = implicit_range(&data, 2, 10, 4);

        let mut it = StreamIterator::new();
        it.add_range(begin, end, RangeKind::Data);
        it.init();
        assert_eq!(it.remaining(), 4);

        let samples: Vec<_> = it.collect();
        assert_eq!(samples.len(), 4);
        let timestamps: Vec<u64> = samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![10, 11, 12, 13]);
        assert_eq!(samples[2].data, Some(&data[4..6]));
    }

    #[test]
    fn test_ranges_sorted_by_start() {
        let data = [0u8; 16];
        let (late_begin, late_end) = implicit_range(&data, 4, 100, 2);
        let (early_begin, early_end) = implicit_range(&data, 4, 5, 2);

        let mut it = StreamIterator::new();
        it.add_range(late_begin, late_end, RangeKind::Data);
        it.add_range(early_begin, early_end, RangeKind::Data);
        it.init();

        let begins: Vec<u64> = it.ranges().map(|r| r.begin).collect();
        assert_eq!(begins, vec![5, 100]);
        let timestamps: Vec<u64> = it.map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![5, 6, 100, 101]);
    }

    #[test]
    fn test_merge_interleaves_gaps_and_data() {
        let data = [0u8; 8];
        let (begin, end) = implicit_range(&data, 1, 3, 3);

        let mut it = StreamIterator::new();
        it.add_range(begin, end, RangeKind::Data);
        it.add_range(SampleCursor::gap(0), SampleCursor::gap(2), RangeKind::Invalid);
        it.add_range(
            SampleCursor::gap(6),
            SampleCursor::gap(u64::MAX - 1),
            RangeKind::Invalid,
        );
        it.init();

        let head: Vec<(u64, RangeKind)> = it
            .by_ref()
            .take(8)
            .map(|s| (s.timestamp, s.kind))
            .collect();
        assert_eq!(
            head,
            vec![
                (0, RangeKind::Invalid),
                (1, RangeKind::Invalid),
                (2, RangeKind::Invalid),
                (3, RangeKind::Data),
                (4, RangeKind::Data),
                (5, RangeKind::Data),
                (6, RangeKind::Invalid),
                (7, RangeKind::Invalid),
            ]
        );
        assert!(it.is_valid());
        assert_eq!(it.size_hint().1, None);
    }

    #[test]
    fn test_tie_prefers_first_added() {
        let data = [0u8; 4];
        let (begin, end) = implicit_range(&data, 1, 0, 1);

        let mut it = StreamIterator::new();
        it.add_range(begin, end, RangeKind::Data);
        it.add_range(SampleCursor::gap(0), SampleCursor::gap(0), RangeKind::Invalid);
        it.init();

        let kinds: Vec<RangeKind> = it.map(|s| s.kind).collect();
        assert_eq!(kinds, vec![RangeKind::Data, RangeKind::Invalid]);
    }

    #[test]
    fn test_unreachable_range_is_ignored() {
        let data = [0u8; 16];
        let begin = SampleCursor::implicit(&data, 8, 4, 0);
        let end = SampleCursor::implicit(&data, 0, 4, 0);

        let mut it = StreamIterator::new();
        assert!(!it.add_range(begin, end, RangeKind::Data));
        assert_eq!(it.range_count(), 0);
        assert!(it.add_range(end, begin, RangeKind::Data));
        assert_eq!(it.range_count(), 1);
    }

    #[test]
    fn test_counted_range_with_zero_stride() {
        let data = [7u8, 0, 0, 0];
        let begin = SampleCursor::implicit(&data, 0, 0, 10);
        let end = SampleCursor::implicit(&data, 0, 0, 12);

        let mut it = StreamIterator::new();
        it.add_counted_range(begin, end, 3, RangeKind::Data);
        it.init();
        assert_eq!(it.remaining(), 3);
        assert_eq!(it.ranges().next().map(|r| (r.begin, r.end)), Some((10, 12)));

        let samples: Vec<_> = it.collect();
        let timestamps: Vec<u64> = samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![10, 11, 12]);
        assert!(samples.iter().all(|s| s.data == Some(&data[..])));
    }

    #[test]
    fn test_clear_ranges() {
        let data = [0u8; 4];
        let (begin, end) = implicit_range(&data, 1, 0, 4);

        let mut it = StreamIterator::new();
        it.add_range(begin, end, RangeKind::Data);
        assert_eq!(it.peek_timestamp(), Some(0));
        it.clear_ranges();
        assert!(!it.is_valid());
        assert_eq!(it.next(), None);
    }
}
