//! Example: Walking channels of a multi-channel block
//!
//! This example demonstrates how to:
//! 1. Describe a stream with an implicit and an explicit timestamp channel
//! 2. Index a raw block that packs both channels
//! 3. Declare valid regions and walk a channel with its gap markers
//!
//! Run with: RUST_LOG=debug cargo run --example walk_channel

use daqstream_rs::{
    BlockChannelDescriptor, BlockDescriptor, ChannelDescriptor, DataRegion, RangeKind,
    StreamDescriptor, StreamReader,
};
use tracing_subscriber::EnvFilter;

const STREAM_ID: u64 = 7;
const COUNTER: u64 = 1;
const VOLTAGE: u64 = 2;

fn main() -> daqstream_rs::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Stream Reader Example ===\n");

    // Counter: u16, timestamp is the sample index
    // Voltage: f32 value at bit 0, u64 timestamp at bit 32, 12 bytes per sample
    let stream = StreamDescriptor::new(STREAM_ID)
        .with_channel(ChannelDescriptor::new(COUNTER, 16))
        .with_channel(ChannelDescriptor::new(VOLTAGE, 96).with_timestamp_position(32));

    // One block: eight counter samples followed by four voltage samples
    let mut raw = Vec::new();
    for i in 0..8u16 {
        raw.extend_from_slice(&(i * 100).to_le_bytes());
    }
    for (i, volts) in [3.30f32, 3.31, 3.29, 3.32].iter().enumerate() {
        raw.extend_from_slice(&volts.to_le_bytes());
        raw.extend_from_slice(&(1_000 + i as u64 * 250).to_le_bytes());
    }

    let block = BlockDescriptor::new(STREAM_ID)
        .with_channel(BlockChannelDescriptor::new(COUNTER, 0, 8, 0))
        .with_channel(BlockChannelDescriptor::new(VOLTAGE, 8 * 16, 4, 0));

    let mut reader = StreamReader::with_descriptor(stream);
    reader.add_data_block(block, &raw);
    println!("1. Indexed {} block of {} bytes", reader.block_count(), raw.len());

    println!("\n2. Voltage channel (explicit timestamps):");
    let (samples, count) = reader.create_channel_iterator_with_count(VOLTAGE)?;
    for sample in samples.take(count as usize) {
        println!(
            "   t={:>5}  {:.2} V",
            sample.timestamp,
            sample.value::<f32>().unwrap_or_default()
        );
    }

    // Samples 4 and 5 of the counter were dropped by the device
    reader.add_data_region(DataRegion::new(COUNTER, 0, 3));
    reader.add_data_region(DataRegion::new(COUNTER, 6, 7));

    println!("\n3. Counter channel with valid regions [0, 3] and [6, 7]:");
    let samples = reader
        .create_channel_iterator(COUNTER)?
        .take_while(|sample| sample.timestamp <= 8);
    for sample in samples {
        match sample.kind {
            RangeKind::Data => println!(
                "   t={:>2}  {}",
                sample.timestamp,
                sample.value::<u16>().unwrap_or_default()
            ),
            RangeKind::Invalid => println!("   t={:>2}  <no data>", sample.timestamp),
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
