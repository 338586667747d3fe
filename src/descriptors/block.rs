use crate::common::bits_to_bytes;
use alloc::vec::Vec;

/// Placement of one channel's samples inside a raw block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockChannelDescriptor {
    /// Channel the samples belong to
    pub channel_id: u64,
    /// Bit offset of the first sample from the start of the block
    pub offset: u64,
    /// Number of samples; zero means the channel is absent from the block
    pub count: u64,
    /// Sample index of the first sample, the base for implicit timestamps
    pub first_sample_index: u64,
}

impl BlockChannelDescriptor {
    pub fn new(channel_id: u64, offset: u64, count: u64, first_sample_index: u64) -> Self {
        Self {
            channel_id,
            offset,
            count,
            first_sample_index,
        }
    }

    /// Returns true if the block actually holds samples of this channel.
    #[inline]
    pub fn is_present(&self) -> bool {
        self.count > 0
    }

    /// Offset of the first sample in bytes.
    ///
    /// # Panics
    /// Panics if the offset is not a whole number of bytes.
    pub fn offset_bytes(&self) -> u64 {
        bits_to_bytes(self.offset, "block channel offset")
    }
}

/// Describes the contents of one raw block delivered by the acquisition layer.
///
/// The block memory itself is not part of the descriptor; it is handed to
/// [`crate::StreamReader::add_data_block`] alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockDescriptor {
    /// Stream the block belongs to
    pub stream_id: u64,
    /// Channel placements in device order
    #[cfg_attr(feature = "serde", serde(default))]
    pub block_channels: Vec<BlockChannelDescriptor>,
}

impl BlockDescriptor {
    pub fn new(stream_id: u64) -> Self {
        Self {
            stream_id,
            block_channels: Vec::new(),
        }
    }

    /// Builder helper appending a channel placement.
    pub fn with_channel(mut self, placement: BlockChannelDescriptor) -> Self {
        self.block_channels.push(placement);
        self
    }

    /// Placements of `channel_id` that hold at least one sample.
    pub fn placements(&self, channel_id: u64) -> impl Iterator<Item = &BlockChannelDescriptor> {
        self.block_channels
            .iter()
            .filter(move |bcd| bcd.channel_id == channel_id && bcd.is_present())
    }

    /// Total number of samples the block holds for `channel_id`.
    pub fn sample_count(&self, channel_id: u64) -> u64 {
        self.placements(channel_id).map(|bcd| bcd.count).sum()
    }
}
