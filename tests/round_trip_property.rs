//! Property tests: any script reads back the same regardless of fragment size.

use chunkwire::{
    ChannelId,
    FragmentationConfig,
    HEADER_SIZE,
    PacketReader,
    PacketWriter,
    Reassembler,
};
use chunkwire_testing::{assert_reads, deterministic_runner, script_strategy, stream_len, write_script};
use proptest::{prelude::prop_assert_eq, test_runner::TestCaseError};

#[test]
fn scripts_round_trip_for_every_payload_capacity() {
    let strategy = (script_strategy(12), 1_usize..=40);
    let mut runner = deterministic_runner(128);

    runner
        .run(&strategy, |(script, payload_capacity)| {
            let writer = write_script(ChannelId::new(1), HEADER_SIZE + payload_capacity, 0, &script);
            prop_assert_eq!(writer.size(), stream_len(&script));
            prop_assert_eq!(
                writer.chunk_count(),
                stream_len(&script).div_ceil(payload_capacity)
            );

            let mut reader = PacketReader::new(&writer);
            assert_reads(&mut reader, &script);
            prop_assert_eq!(reader.remaining(), 0);
            Ok(())
        })
        .unwrap_or_else(|err| panic!("round trip property failed: {err}"));
}

#[test]
fn fragment_payloads_concatenate_to_the_same_stream() {
    let strategy = (script_strategy(10), 1_usize..=16);
    let mut runner = deterministic_runner(96);

    runner
        .run(&strategy, |(script, payload_capacity)| {
            let reference = write_script(ChannelId::new(1), HEADER_SIZE + 10_000, 0, &script);
            let split = write_script(ChannelId::new(1), HEADER_SIZE + payload_capacity, 0, &script);

            let flatten = |writer: &PacketWriter| -> Vec<u8> {
                writer
                    .fragments()
                    .iter()
                    .flat_map(|fragment| fragment.payload().iter().copied())
                    .collect()
            };
            prop_assert_eq!(flatten(&reference), flatten(&split));
            Ok(())
        })
        .unwrap_or_else(|err| panic!("stream equality property failed: {err}"));
}

#[test]
fn reassembled_frames_read_back_identically() {
    let strategy = (script_strategy(10), 1_usize..=12);
    let mut runner = deterministic_runner(96);

    runner
        .run(&strategy, |(script, payload_capacity)| {
            let writer = write_script(ChannelId::new(9), HEADER_SIZE + payload_capacity, 0, &script);
            let frames = writer
                .into_frames()
                .map_err(|err| TestCaseError::fail(err.to_string()))?;

            let mut reassembler = Reassembler::from_config(&FragmentationConfig::default());
            let mut assembled = None;
            for frame in frames {
                assembled = reassembler
                    .push(frame)
                    .map_err(|err| TestCaseError::fail(err.to_string()))?;
            }
            let packet =
                assembled.ok_or_else(|| TestCaseError::fail("packet did not complete"))?;
            prop_assert_eq!(packet.len(), stream_len(&script));
            prop_assert_eq!(packet.channel(), ChannelId::new(9));

            let mut reader = packet.reader();
            assert_reads(&mut reader, &script);
            prop_assert_eq!(reader.remaining(), 0);
            Ok(())
        })
        .unwrap_or_else(|err| panic!("reassembly property failed: {err}"));
}
