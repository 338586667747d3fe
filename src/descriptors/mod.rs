// src/descriptors/mod.rs
//! Metadata describing streams, channels, blocks and valid regions.
//!
//! These are the already-parsed structures delivered by whatever decodes the
//! acquisition device's descriptor format. All layout quantities (strides,
//! offsets, timestamp positions) are expressed in **bits**, as the device
//! reports them; they are converted to bytes when an iterator is built.
//!
//! | Type | Describes |
//! |------|-----------|
//! | [`ChannelDescriptor`] | Stride and timestamp layout of one channel |
//! | [`StreamDescriptor`] | The set of channels making up one stream |
//! | [`BlockChannelDescriptor`] | Placement of one channel's samples inside a block |
//! | [`BlockDescriptor`] | All placements inside one raw block |
//! | [`DataRegion`] | An interval of sample indices known to hold valid data |

// ============================================================================
// Submodules
// ============================================================================

mod block;
mod channel;
mod region;
mod stream;

pub use block::{BlockChannelDescriptor, BlockDescriptor};
pub use channel::ChannelDescriptor;
pub use region::{DataRegion, InvalidRegions, Region, RegionSet};
pub use stream::StreamDescriptor;
