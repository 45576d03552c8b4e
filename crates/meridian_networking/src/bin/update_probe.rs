//! # Update Probe
//!
//! Builds a synthetic object update batch with the server's network settings
//! and reports how it is split, framed and compressed.
//!
//! ## Usage
//!
//! ```bash
//! update_probe --config worldserver.toml --blocks 2000 --block-size 120 --out-of-range 40
//! ```
//!
//! Set `RUST_LOG=debug` to see every packet.

use std::thread;

use meridian_networking::{
    ByteBuffer, ChannelSink, NetworkConfig, NetworkResult, UpdateData, WorldPacket,
};
use meridian_shared::{ObjectGuid, UpdateType};
use tracing_subscriber::EnvFilter;

/// Movement flag set on every synthetic block.
const MOVEMENT_FLAG_ON_TRANSPORT: u32 = 0x0000_0200;

struct ProbeArgs {
    config: Option<String>,
    blocks: usize,
    block_size: usize,
    out_of_range: u64,
}

fn parse_args() -> Option<ProbeArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut probe = ProbeArgs {
        config: None,
        blocks: 1000,
        block_size: 96,
        out_of_range: 0,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--config" | "-c" => probe.config = value.cloned(),
            "--blocks" | "-b" => {
                probe.blocks = value.and_then(|v| v.parse().ok()).unwrap_or(probe.blocks);
            }
            "--block-size" | "-s" => {
                probe.block_size = value.and_then(|v| v.parse().ok()).unwrap_or(probe.block_size);
            }
            "--out-of-range" | "-o" => {
                probe.out_of_range =
                    value.and_then(|v| v.parse().ok()).unwrap_or(probe.out_of_range);
            }
            "--help" | "-h" => {
                println!("Usage: update_probe [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>        Server TOML with a [network] table");
                println!("  -b, --blocks <NUM>         Update blocks to queue (default: 1000)");
                println!("  -s, --block-size <BYTES>   Size of each block (default: 96)");
                println!("  -o, --out-of-range <NUM>   GUIDs leaving view (default: 0)");
                println!("  -h, --help                 Show this help");
                return None;
            }
            other => {
                tracing::warn!("Ignoring unknown argument {other}");
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    Some(probe)
}

/// One update block: type marker, packed GUID, movement flags, position,
/// transport GUID, padding to size.
fn synthetic_block(guid: ObjectGuid, transport: ObjectGuid, size: usize) -> ByteBuffer {
    let mut block = ByteBuffer::with_capacity(size);
    block.write_u8(UpdateType::Movement.as_u8());
    block.append(guid.write_as_packed().as_bytes());
    block.write_u32(MOVEMENT_FLAG_ON_TRANSPORT);

    #[allow(clippy::cast_precision_loss)]
    let position: [f32; 4] = [guid.raw() as f32, 0.5, -12.25, 1.5];
    block.write_pod(&position);
    block.write_pod(&transport);

    if block.len() < size {
        block.resize(size);
    }
    block
}

fn run(args: &ProbeArgs) -> NetworkResult<()> {
    let config = match &args.config {
        Some(path) => NetworkConfig::load(path)?,
        None => NetworkConfig::default(),
    };

    let mut data = UpdateData::with_config(&config);
    data.add_out_of_range_guids(
        (0..args.out_of_range).map(|i| ObjectGuid::new(0xF130_0000_0000_0000 | i)),
    );

    let transport = ObjectGuid::new(0x1FC0_0000_0000_0001);
    for i in 0..args.blocks {
        let guid = ObjectGuid::new(i as u64 + 1);
        data.add_update_buffer(&synthetic_block(guid, transport, args.block_size));
    }

    tracing::info!(
        blocks = args.blocks,
        block_size = args.block_size,
        out_of_range = data.out_of_range().len(),
        segments = data.packet_count(),
        compression_level = config.compression_level,
        "Batch assembled"
    );

    let (mut sink, session) = ChannelSink::channel(None);
    let writer = thread::spawn(move || {
        session
            .iter()
            .enumerate()
            .map(|(i, packet): (usize, WorldPacket)| {
                tracing::debug!(
                    packet = i,
                    opcode = %packet.opcode(),
                    len = packet.len(),
                    "Session write"
                );
                packet.len()
            })
            .sum::<usize>()
    });

    let stats = data.send_data(&mut sink)?;
    drop(sink);
    let written = writer.join().unwrap_or_default();

    tracing::info!(
        sent = stats.packets_sent,
        compressed = stats.compressed_packets,
        raw = stats.raw_packets,
        dropped = stats.dropped_packets,
        bytes = stats.bytes_sent,
        session_bytes = written,
        "Batch delivered"
    );

    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let Some(args) = parse_args() else {
        return;
    };

    if let Err(err) = run(&args) {
        tracing::error!("Probe failed: {err}");
        std::process::exit(1);
    }
}
