use crate::common::bits_to_bytes;

/// Layout of one channel's samples inside the blocks of a stream.
///
/// Consecutive samples of a channel are `stride` bits apart. When the device
/// stores a timestamp with every sample, `timestamp_position` gives the bit
/// offset of that 64-bit little-endian field relative to the start of the
/// sample; otherwise timestamps are implicit and equal to the sample index.
///
/// # Example
/// ```
/// use daqstream_rs::ChannelDescriptor;
///
/// // 8 byte value followed by an 8 byte timestamp
/// let ch = ChannelDescriptor::new(3, 128).with_timestamp_position(64);
/// assert_eq!(ch.stride_bytes(), 16);
/// assert_eq!(ch.timestamp_position_bytes(), Some(8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelDescriptor {
    /// Channel identifier, unique within a stream
    pub channel_id: u64,
    /// Distance between consecutive samples in bits
    pub stride: u64,
    /// Bit offset of the explicit timestamp field within a sample
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub timestamp_position: Option<u64>,
}

impl ChannelDescriptor {
    /// Create a channel with implicit timestamps.
    pub fn new(channel_id: u64, stride: u64) -> Self {
        Self {
            channel_id,
            stride,
            timestamp_position: None,
        }
    }

    /// Declare an explicit timestamp field at the given bit offset.
    pub fn with_timestamp_position(mut self, timestamp_position: u64) -> Self {
        self.timestamp_position = Some(timestamp_position);
        self
    }

    /// Returns true if every sample carries its own timestamp.
    #[inline]
    pub fn has_explicit_timestamp(&self) -> bool {
        self.timestamp_position.is_some()
    }

    /// Stride in bytes.
    ///
    /// # Panics
    /// Panics if the stride is not a whole number of bytes.
    pub fn stride_bytes(&self) -> u64 {
        bits_to_bytes(self.stride, "channel stride")
    }

    /// Timestamp field offset in bytes, if the channel has one.
    ///
    /// # Panics
    /// Panics if the position is not a whole number of bytes.
    pub fn timestamp_position_bytes(&self) -> Option<u64> {
        self.timestamp_position
            .map(|bits| bits_to_bytes(bits, "timestamp position"))
    }
}
