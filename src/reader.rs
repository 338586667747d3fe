//! Block and region index of one acquisition stream.
//!
//! The [`StreamReader`] accumulates raw blocks and valid regions as the
//! acquisition layer delivers them, and builds [`StreamIterator`]s that walk
//! one channel across all of them in time order.
//!
//! ```
//! use daqstream_rs::{
//!     BlockChannelDescriptor, BlockDescriptor, ChannelDescriptor, StreamDescriptor,
//!     StreamReader,
//! };
//!
//! # fn main() -> daqstream_rs::Result<()> {
//! // Four u32 samples of channel 1
//! let raw: Vec<u8> = [10u32, 20, 30, 40].iter().flat_map(|v| v.to_le_bytes()).collect();
//!
//! let mut reader = StreamReader::with_descriptor(
//!     StreamDescriptor::new(0).with_channel(ChannelDescriptor::new(1, 32)),
//! );
//! reader.add_data_block(
//!     BlockDescriptor::new(0).with_channel(BlockChannelDescriptor::new(1, 0, 4, 100)),
//!     &raw,
//! );
//!
//! let (samples, count) = reader.create_channel_iterator_with_count(1)?;
//! assert_eq!(count, 4);
//! let values: Vec<(u64, u32)> = samples
//!     .map(|s| (s.timestamp, s.value::<u32>().unwrap_or_default()))
//!     .collect();
//! assert_eq!(values, vec![(100, 10), (101, 20), (102, 30), (103, 40)]);
//! # Ok(())
//! # }
//! ```

use crate::{
    Error, Result,
    descriptors::{
        BlockChannelDescriptor, BlockDescriptor, ChannelDescriptor, DataRegion, RegionSet,
        StreamDescriptor,
    },
    iteration::{RangeKind, SampleCursor, StreamIterator},
};
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// A raw block together with the descriptor that explains its layout.
#[derive(Debug, Clone)]
struct IndexedBlock<'a> {
    descriptor: BlockDescriptor,
    data: &'a [u8],
}

/// Per-session index of blocks and valid regions for one stream.
///
/// Block memory is borrowed for `'a`: every iterator built by the reader reads
/// the buffers live, so they must stay alive and unmodified while the iterator
/// is in use, which the borrow checker enforces.
///
/// The reader is a single-owner object; mutation requires `&mut self`.
#[derive(Debug, Clone, Default)]
pub struct StreamReader<'a> {
    stream_descriptor: StreamDescriptor,
    blocks: BTreeMap<u64, Vec<IndexedBlock<'a>>>,
    data_regions: BTreeMap<u64, RegionSet>,
}

impl<'a> StreamReader<'a> {
    /// Create a reader with an empty stream descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader bound to `stream_descriptor`.
    pub fn with_descriptor(stream_descriptor: StreamDescriptor) -> Self {
        Self {
            stream_descriptor,
            ..Self::default()
        }
    }

    /// Replace the stream descriptor.
    ///
    /// Indexed blocks and regions are kept.
    pub fn set_stream_descriptor(&mut self, stream_descriptor: StreamDescriptor) {
        tracing::debug!(
            stream_id = stream_descriptor.stream_id,
            channels = stream_descriptor.channel_descriptors.len(),
            "stream descriptor replaced"
        );
        self.stream_descriptor = stream_descriptor;
    }

    pub fn stream_descriptor(&self) -> &StreamDescriptor {
        &self.stream_descriptor
    }

    /// Index a raw block under the stream id its descriptor declares.
    ///
    /// Blocks may arrive in any order and for any stream; only blocks of the
    /// current descriptor's stream are considered when iterators are built.
    pub fn add_data_block(&mut self, block_descriptor: BlockDescriptor, data: &'a [u8]) {
        tracing::trace!(
            stream_id = block_descriptor.stream_id,
            placements = block_descriptor.block_channels.len(),
            bytes = data.len(),
            "indexing data block"
        );
        self.blocks
            .entry(block_descriptor.stream_id)
            .or_default()
            .push(IndexedBlock {
                descriptor: block_descriptor,
                data,
            });
    }

    /// Record a region of valid samples for a channel.
    ///
    /// Regions accumulate per channel and are kept sorted; overlapping or
    /// duplicate regions are stored as supplied.
    pub fn add_data_region(&mut self, region: DataRegion) {
        let overlaps = self
            .data_regions
            .entry(region.channel_id)
            .or_default()
            .insert(region.region);
        if overlaps {
            tracing::warn!(
                channel_id = region.channel_id,
                begin = region.region.begin,
                end = region.region.end,
                "data region overlaps an existing region"
            );
        } else {
            tracing::trace!(
                channel_id = region.channel_id,
                begin = region.region.begin,
                end = region.region.end,
                "data region added"
            );
        }
    }

    /// Look up a channel of the current stream descriptor.
    pub fn channel_descriptor(&self, channel_id: u64) -> Option<&ChannelDescriptor> {
        self.stream_descriptor.channel(channel_id)
    }

    pub fn has_channel(&self, channel_id: u64) -> bool {
        self.channel_descriptor(channel_id).is_some()
    }

    /// Total number of indexed blocks across all streams.
    pub fn block_count(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }

    /// Valid regions recorded for a channel, if any.
    pub fn regions(&self, channel_id: u64) -> Option<&RegionSet> {
        self.data_regions.get(&channel_id)
    }

    /// Build an iterator over all samples and gaps of a channel.
    ///
    /// # Errors
    /// - [`Error::InvalidChannel`] if the channel is not part of the stream
    /// - [`Error::TooShortBuffer`] if a block is too small for its placements
    pub fn create_channel_iterator(&self, channel_id: u64) -> Result<StreamIterator<'a>> {
        self.create_channel_iterator_with_count(channel_id)
            .map(|(iterator, _)| iterator)
    }

    /// Like [`Self::create_channel_iterator`], also returning the number of
    /// data samples (gaps excluded) found in the indexed blocks.
    pub fn create_channel_iterator_with_count(
        &self,
        channel_id: u64,
    ) -> Result<(StreamIterator<'a>, u64)> {
        let mut iterator = StreamIterator::new();
        let sample_count = self.update_stream_iterator(channel_id, &mut iterator)?;
        Ok((iterator, sample_count))
    }

    /// Refill an existing iterator for `channel_id` and return the number of
    /// data samples it holds.
    ///
    /// The iterator is cleared first, so it holds no ranges if an error is
    /// returned.
    ///
    /// # Panics
    /// Panics if the channel stride, its timestamp position or a block
    /// placement offset is not a whole number of bytes.
    pub fn update_stream_iterator(
        &self,
        channel_id: u64,
        iterator: &mut StreamIterator<'a>,
    ) -> Result<u64> {
        iterator.clear_ranges();

        let channel = self
            .channel_descriptor(channel_id)
            .ok_or(Error::InvalidChannel { channel_id })?;

        let mut sample_count = 0u64;
        let mut data_ranges = 0usize;
        let blocks = self
            .blocks
            .get(&self.stream_descriptor.stream_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for block in blocks {
            for placement in block.descriptor.placements(channel_id) {
                let (begin, end) = data_range(channel, placement, block.data)?;
                iterator.add_counted_range(begin, end, placement.count, RangeKind::Data);
                sample_count = sample_count.saturating_add(placement.count);
                data_ranges += 1;
            }
        }

        let mut gap_ranges = 0usize;
        if let Some(regions) = self.data_regions.get(&channel_id) {
            for gap in regions.invalid_regions() {
                iterator.add_range(
                    SampleCursor::gap(gap.begin),
                    SampleCursor::gap(gap.end),
                    RangeKind::Invalid,
                );
                gap_ranges += 1;
            }
        }

        iterator.init();

        tracing::debug!(
            channel_id,
            data_ranges,
            gap_ranges,
            sample_count,
            "channel iterator built"
        );
        Ok(sample_count)
    }

    /// Drop all indexed blocks and regions; the descriptor is kept.
    pub fn clear_blocks(&mut self) {
        tracing::debug!(
            blocks = self.block_count(),
            channels_with_regions = self.data_regions.len(),
            "clearing blocks and regions"
        );
        self.blocks.clear();
        self.data_regions.clear();
    }
}

/// Cursors bounding the samples of one placement inside a block buffer.
fn data_range<'a>(
    channel: &ChannelDescriptor,
    placement: &BlockChannelDescriptor,
    data: &'a [u8],
) -> Result<(SampleCursor<'a>, SampleCursor<'a>)> {
    let offset = placement.offset_bytes();
    let stride = channel.stride_bytes();
    let timestamp_position = channel.timestamp_position_bytes();

    let last_step = placement.count - 1;
    let last = stride
        .checked_mul(last_step)
        .and_then(|span| span.checked_add(offset));
    // Explicit timestamps need the whole u64 field of the last sample.
    let required = match timestamp_position {
        Some(position) => last
            .and_then(|last| last.checked_add(position))
            .and_then(|field| field.checked_add(8)),
        None => last.and_then(|last| last.checked_add(1)),
    };

    let required = required.and_then(|bytes| usize::try_from(bytes).ok());
    let last = match (last, required) {
        (Some(last), Some(required)) if required <= data.len() => last,
        _ => {
            return Err(Error::TooShortBuffer {
                actual: data.len(),
                expected: required.unwrap_or(usize::MAX),
                file: file!(),
                line: line!(),
            });
        }
    };

    let cursors = match timestamp_position {
        Some(position) => (
            SampleCursor::explicit(data, offset, stride, position),
            SampleCursor::explicit(data, last, stride, position),
        ),
        None => (
            SampleCursor::implicit(data, offset, stride, placement.first_sample_index),
            SampleCursor::implicit(
                data,
                last,
                stride,
                placement.first_sample_index.saturating_add(last_step),
            ),
        ),
    };
    Ok(cursors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_range_bounds() {
        let data = [0u8; 16];
        let channel = ChannelDescriptor::new(1, 32);

        let (begin, end) = data_range(&channel, &BlockChannelDescriptor::new(1, 0, 4, 7), &data)
            .expect("four u32 fit into 16 bytes");
        assert_eq!(begin.position(), 0);
        assert_eq!(end.position(), 12);
        assert_eq!(end.timestamp(), 10);

        let err = data_range(&channel, &BlockChannelDescriptor::new(1, 32, 4, 0), &data)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TooShortBuffer {
                actual: 16,
                expected: 17,
                ..
            }
        ));
    }

    #[test]
    fn test_data_range_explicit_needs_whole_field() {
        let data = [0u8; 24];
        let channel = ChannelDescriptor::new(1, 128).with_timestamp_position(64);

        assert!(data_range(&channel, &BlockChannelDescriptor::new(1, 0, 1, 0), &data).is_ok());
        assert!(matches!(
            data_range(&channel, &BlockChannelDescriptor::new(1, 0, 2, 0), &data),
            Err(Error::TooShortBuffer { expected: 32, .. })
        ));
    }

    #[test]
    fn test_data_range_overflow_is_reported() {
        let data = [0u8; 8];
        let channel = ChannelDescriptor::new(1, 64);
        let placement = BlockChannelDescriptor::new(1, 0, u64::MAX, 0);
        assert!(matches!(
            data_range(&channel, &placement, &data),
            Err(Error::TooShortBuffer { .. })
        ));
    }
}
