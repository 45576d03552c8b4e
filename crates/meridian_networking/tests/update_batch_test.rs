//! Integration tests for the object update pipeline.

use std::collections::HashSet;
use std::io::Read;

use flate2::read::ZlibDecoder;
use meridian_networking::{
    ChannelSink, Compressor, PacketBuildError, UpdateData, WorldPacket, COMPRESSION_THRESHOLD,
    MAX_NETCLIENT_PACKET_SIZE,
};
use meridian_shared::{ObjectGuid, Opcode, UpdateType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Recovers the pre-compression payload of an update packet.
fn unframe(packet: &WorldPacket) -> Vec<u8> {
    match packet.opcode() {
        Opcode::SMSG_UPDATE_OBJECT => packet.contents().to_vec(),
        Opcode::SMSG_COMPRESSED_UPDATE_OBJECT => {
            let mut out = Vec::new();
            ZlibDecoder::new(&packet.contents()[4..])
                .read_to_end(&mut out)
                .unwrap();
            assert_eq!(out.len(), read_u32(packet.contents(), 0) as usize);
            out
        }
        other => panic!("not an update packet: {other}"),
    }
}

/// Block `i` starts with its index so order can be checked after the trip.
fn tagged_block(i: u32, len: usize) -> Vec<u8> {
    let mut block = vec![0xA5u8; len.max(4)];
    block[..4].copy_from_slice(&i.to_le_bytes());
    block
}

#[test]
fn test_single_small_block() {
    let mut data = UpdateData::new();
    data.add_update_block(&[0x11; 50]);

    let mut session: Vec<WorldPacket> = Vec::new();
    data.send_data(&mut session).unwrap();

    assert_eq!(session.len(), 1);
    assert_eq!(session[0].opcode(), Opcode::SMSG_UPDATE_OBJECT);
    assert_eq!(read_u32(session[0].contents(), 0), 1);
    assert_eq!(session[0].len(), 54);
}

#[test]
fn test_many_blocks_split_in_order() {
    let mut data = UpdateData::new();
    let total = 1000u32;
    for i in 0..total {
        data.add_update_block(&tagged_block(i, 100));
    }

    assert!(data.packet_count() >= 2);

    let mut session: Vec<WorldPacket> = Vec::new();
    data.send_data(&mut session).unwrap();
    assert_eq!(session.len(), data.packet_count());

    let mut seen = Vec::new();
    for (index, packet) in session.iter().enumerate() {
        let payload = unframe(packet);
        assert!(payload.len() <= MAX_NETCLIENT_PACKET_SIZE, "packet {index}");

        let count = read_u32(&payload, 0) as usize;
        let blocks = &payload[4..];
        assert_eq!(blocks.len(), count * 100);
        seen.extend(blocks.chunks(100).map(|b| read_u32(b, 0)));
    }

    assert_eq!(seen, (0..total).collect::<Vec<_>>());
}

#[test]
fn test_random_sizes_stay_under_ceiling() {
    let mut rng = StdRng::seed_from_u64(0x5EED);

    for round in 0..20 {
        let mut data = UpdateData::new();
        let guids = rng.gen_range(0..200u64);
        data.add_out_of_range_guids((0..guids).map(|g| ObjectGuid::new(u64::MAX - g)));

        let mut oversized = HashSet::new();
        for i in 0..rng.gen_range(1..600u32) {
            let len = if rng.gen_ratio(1, 200) {
                MAX_NETCLIENT_PACKET_SIZE + rng.gen_range(1..500)
            } else {
                rng.gen_range(4..2000)
            };
            if len >= MAX_NETCLIENT_PACKET_SIZE {
                oversized.insert(i);
            }
            data.add_update_block(&tagged_block(i, len));
        }

        let assembler = data.assembler();
        for index in 0..data.packet_count() {
            let segment = &data.segments().segments()[index];
            let payload = assembler.build_payload(index).unwrap();

            if segment.block_count() == 1 && segment.len() >= MAX_NETCLIENT_PACKET_SIZE {
                let first = read_u32(segment.buffer().contents(), 0);
                assert!(oversized.contains(&first), "round {round} segment {index}");
                continue;
            }
            assert!(
                payload.len() <= MAX_NETCLIENT_PACKET_SIZE,
                "round {round} segment {index}: {} bytes",
                payload.len()
            );
        }
    }
}

#[test]
fn test_large_block_with_many_out_of_range_guids() {
    let mut data = UpdateData::new();
    data.add_out_of_range_guids((0..1000u64).map(|g| ObjectGuid::new(u64::MAX - g)));
    data.add_update_block(&tagged_block(0, 30_000));

    assert_eq!(data.packet_count(), 2);

    let assembler = data.assembler();
    for index in 0..data.packet_count() {
        let payload = assembler.build_payload(index).unwrap();
        assert!(
            payload.len() <= MAX_NETCLIENT_PACKET_SIZE,
            "segment {index}: {} bytes",
            payload.len()
        );
    }

    // Segment 0 holds only the out-of-range block.
    let first = assembler.build_payload(0).unwrap();
    assert_eq!(read_u32(first.contents(), 0), 1);
    assert_eq!(first.contents()[4], UpdateType::OutOfRangeObjects.as_u8());

    let second = assembler.build_payload(1).unwrap();
    assert_eq!(read_u32(second.contents(), 0), 1);
    assert_eq!(read_u32(second.contents(), 4), 0);
    assert_eq!(second.len(), 4 + 30_000);
}

#[test]
fn test_out_of_range_in_first_packet_only() {
    let mut data = UpdateData::new();
    data.add_out_of_range_guid(ObjectGuid::new(0xAA));
    data.add_out_of_range_guids([ObjectGuid::new(0xAA), ObjectGuid::new(0xBB)]);
    assert_eq!(data.out_of_range().len(), 2);

    for i in 0..800 {
        data.add_update_block(&tagged_block(i, 100));
    }

    let mut session: Vec<WorldPacket> = Vec::new();
    data.send_data(&mut session).unwrap();
    assert!(session.len() >= 2);

    let first = unframe(&session[0]);
    assert_eq!(
        read_u32(&first, 0),
        data.segments().segments()[0].block_count() + 1
    );
    assert_eq!(first[4], UpdateType::OutOfRangeObjects.as_u8());
    assert_eq!(read_u32(&first, 5), 2);

    for (index, packet) in session.iter().enumerate().skip(1) {
        let payload = unframe(packet);
        assert_eq!(
            read_u32(&payload, 0),
            data.segments().segments()[index].block_count()
        );
        assert_eq!(&payload[4..], data.segments().segments()[index].buffer().contents());
    }
}

#[test]
fn test_no_out_of_range_block_when_empty() {
    let mut data = UpdateData::new();
    data.add_update_block(&tagged_block(0, 300));

    let payload = data.assembler().build_payload(0).unwrap();
    assert_eq!(read_u32(payload.contents(), 0), 1);
    assert_eq!(&payload.contents()[4..8], &0u32.to_le_bytes());
    assert_eq!(payload.len(), 304);
}

#[test]
fn test_compressed_packet_round_trip() {
    let mut data = UpdateData::with_compressor(Compressor::new(9));
    data.add_out_of_range_guids((1..=10).map(ObjectGuid::new));
    for i in 0..30 {
        data.add_update_block(&tagged_block(i, 80));
    }

    let expected = data.assembler().build_payload(0).unwrap();
    let packet = data.build_packet(0);

    assert_eq!(packet.opcode(), Opcode::SMSG_COMPRESSED_UPDATE_OBJECT);
    assert_eq!(read_u32(packet.contents(), 0) as usize, expected.len());
    assert_eq!(unframe(&packet), expected.contents());
}

#[test]
fn test_small_payload_never_compressed() {
    for len in 1..=(COMPRESSION_THRESHOLD - 4) {
        let mut data = UpdateData::new();
        data.add_update_block(&vec![0u8; len]);

        let packet = data.build_packet(0);
        assert_eq!(packet.opcode(), Opcode::SMSG_UPDATE_OBJECT, "len {len}");
        assert_eq!(packet.len(), len + 4);
    }
}

#[test]
fn test_clear_then_reuse() {
    let mut data = UpdateData::new();
    data.add_out_of_range_guids([ObjectGuid::new(1), ObjectGuid::new(2), ObjectGuid::new(3)]);
    data.add_update_block(&tagged_block(0, 50));
    assert!(data.has_data());

    data.clear();
    assert!(!data.has_data());
    assert_eq!(data.out_of_range().len(), 0);

    data.add_update_block(&tagged_block(1, 50));
    assert_eq!(data.packet_count(), 1);

    let mut session: Vec<WorldPacket> = Vec::new();
    data.send_data(&mut session).unwrap();
    assert_eq!(session.len(), 1);
    assert_eq!(read_u32(session[0].contents(), 0), 1);
}

#[test]
fn test_failed_compression_dropped_others_delivered() {
    let mut data = UpdateData::with_compressor(Compressor::new(77));
    data.add_update_block(&tagged_block(0, 40));
    data.add_after_create_packet(WorldPacket::new(Opcode(0x3C2)));

    // Raw packet still goes out with a broken compressor.
    let mut session: Vec<WorldPacket> = Vec::new();
    let stats = data.send_data(&mut session).unwrap();
    assert_eq!(stats.raw_packets, 1);
    assert_eq!(session.len(), 2);

    data.add_update_block(&tagged_block(1, 400));
    assert!(matches!(
        data.try_build_packet(0),
        Err(PacketBuildError::Compression(_))
    ));

    let mut session: Vec<WorldPacket> = Vec::new();
    let stats = data.send_data(&mut session).unwrap();
    assert_eq!(stats.dropped_packets, 1);
    assert_eq!(session.len(), 1);
    assert_eq!(session[0].opcode(), Opcode(0x3C2));
}

#[test]
fn test_channel_session_receives_in_order() {
    let (mut sink, session) = ChannelSink::channel(Some(64));

    let mut data = UpdateData::new();
    for i in 0..700 {
        data.add_update_block(&tagged_block(i, 100));
    }
    data.add_after_create_packet(WorldPacket::new(Opcode(0x200)));
    data.add_after_create_packet(WorldPacket::new(Opcode(0x201)));

    let stats = data.send_data(&mut sink).unwrap();
    let received: Vec<WorldPacket> = session.try_iter().collect();

    assert_eq!(received.len() as u64, stats.packets_sent);
    let opcodes: Vec<Opcode> = received.iter().map(WorldPacket::opcode).collect();
    let updates = data.packet_count();
    assert!(opcodes[..updates].iter().all(|o| o.is_update_object()));
    assert_eq!(&opcodes[updates..], &[Opcode(0x200), Opcode(0x201)]);
}

#[test]
fn test_closed_channel_aborts_send() {
    let (mut sink, session) = ChannelSink::channel(None);
    drop(session);

    let mut data = UpdateData::new();
    data.add_update_block(&tagged_block(0, 10));

    assert!(data.send_data(&mut sink).is_err());
}
