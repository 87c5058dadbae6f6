//! Integration coverage for the `chunkwire_testing` script helpers.

use chunkwire::{ChannelId, HEADER_SIZE, PacketReader};
use chunkwire_testing::{PacketOp, assert_reads, stream_len, write_script};
use rstest::rstest;

#[rstest]
#[case(PacketOp::U8(1), 1)]
#[case(PacketOp::Bool(false), 1)]
#[case(PacketOp::U16(1), 2)]
#[case(PacketOp::I32(-1), 4)]
#[case(PacketOp::F64(0.5), 8)]
#[case(PacketOp::Str("abc".into()), 7)]
fn stream_len_counts_wire_bytes(#[case] op: PacketOp, #[case] expected: usize) {
    assert_eq!(op.stream_len(), expected);
    let writer = write_script(ChannelId::new(1), HEADER_SIZE + 3, 0, std::slice::from_ref(&op));
    assert_eq!(writer.size(), expected);
}

#[test]
fn scripts_replay_against_a_reader() {
    let script = vec![
        PacketOp::U64(9),
        PacketOp::Str("chunk".into()),
        PacketOp::F64(f64::NAN),
    ];
    assert_eq!(stream_len(&script), 8 + 9 + 8);

    let writer = write_script(ChannelId::new(2), HEADER_SIZE + 4, 0, &script);
    assert_reads(&mut PacketReader::new(&writer), &script);
}

#[test]
#[should_panic(expected = "assertion")]
fn mismatched_script_panics() {
    let writer = write_script(ChannelId::new(3), HEADER_SIZE + 4, 0, &[PacketOp::U16(1)]);
    assert_reads(&mut PacketReader::new(&writer), &[PacketOp::U16(2)]);
}
