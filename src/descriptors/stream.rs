use crate::descriptors::ChannelDescriptor;
use alloc::vec::Vec;

#[cfg(all(feature = "serde", feature = "serde_json"))]
use crate::{Error, Result};
#[cfg(all(feature = "serde", feature = "serde_json"))]
use alloc::{format, string::String};

/// The channels that make up one acquisition stream.
///
/// Channel ids are unique within a stream: [`StreamDescriptor::add_channel`]
/// replaces an existing channel with the same id instead of appending a
/// duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamDescriptor {
    /// Stream identifier blocks are registered under
    pub stream_id: u64,
    /// Channels in declaration order
    #[cfg_attr(feature = "serde", serde(default))]
    pub channel_descriptors: Vec<ChannelDescriptor>,
}

impl StreamDescriptor {
    /// Create a stream without channels.
    pub fn new(stream_id: u64) -> Self {
        Self {
            stream_id,
            channel_descriptors: Vec::new(),
        }
    }

    /// Builder variant of [`Self::add_channel`].
    pub fn with_channel(mut self, channel: ChannelDescriptor) -> Self {
        self.add_channel(channel);
        self
    }

    /// Add a channel, replacing any channel with the same id.
    pub fn add_channel(&mut self, channel: ChannelDescriptor) {
        match self
            .channel_descriptors
            .iter_mut()
            .find(|existing| existing.channel_id == channel.channel_id)
        {
            Some(existing) => *existing = channel,
            None => self.channel_descriptors.push(channel),
        }
    }

    /// Look up a channel by id.
    pub fn channel(&self, channel_id: u64) -> Option<&ChannelDescriptor> {
        self.channel_descriptors
            .iter()
            .find(|desc| desc.channel_id == channel_id)
    }

    /// Channels in declaration order.
    pub fn channels(&self) -> &[ChannelDescriptor] {
        &self.channel_descriptors
    }
}

#[cfg(all(feature = "serde", feature = "serde_json"))]
impl StreamDescriptor {
    /// Serialize the descriptor to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::DescriptorSerializationError(format!("JSON serialization failed: {}", e))
        })
    }

    /// Parse a descriptor from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::DescriptorSerializationError(format!("JSON deserialization failed: {}", e))
        })
    }

    /// Save the descriptor to a JSON file.
    #[cfg(feature = "std")]
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(Error::IOError)?;
        Ok(())
    }

    /// Load a descriptor from a JSON file.
    #[cfg(feature = "std")]
    pub fn load_from_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(Error::IOError)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        let stream = StreamDescriptor::new(7)
            .with_channel(ChannelDescriptor::new(1, 32))
            .with_channel(ChannelDescriptor::new(2, 64));

        assert_eq!(stream.channel(2).map(|c| c.stride), Some(64));
        assert!(stream.channel(3).is_none());
        assert_eq!(stream.channels().len(), 2);
    }

    #[test]
    fn test_add_channel_replaces_same_id() {
        let mut stream = StreamDescriptor::new(7).with_channel(ChannelDescriptor::new(1, 32));
        stream.add_channel(ChannelDescriptor::new(1, 64).with_timestamp_position(0));

        assert_eq!(stream.channels().len(), 1);
        assert_eq!(stream.channels()[0].stride, 64);
        assert!(stream.channels()[0].has_explicit_timestamp());
    }
}
