//! Tests for fragment header encoding and fragment-series sequencing rules.

use rstest::rstest;

use crate::fragment::*;

#[test]
fn fragment_header_exposes_fields() {
    let header = FragmentHeader::new(ChannelId::new(9), FragmentIndex::new(2), 3);
    assert_eq!(header.channel(), ChannelId::new(9));
    assert_eq!(header.fragment_index(), FragmentIndex::new(2));
    assert_eq!(header.fragment_count(), 3);
    assert!(header.is_last_fragment());
}

#[test]
fn fragment_header_encodes_little_endian_fields() {
    let header = FragmentHeader::new(ChannelId::new(0x0102), FragmentIndex::new(3), 0x0410);
    assert_eq!(header.encode(), [0x02, 0x01, 0x03, 0x00, 0x10, 0x04]);
    assert_eq!(
        FragmentHeader::decode(&header.encode()).expect("decode header"),
        header
    );
}

#[test]
fn fragment_header_decode_ignores_trailing_payload() {
    let header = FragmentHeader::new(ChannelId::new(4), FragmentIndex::zero(), 1);
    let mut frame = header.encode().to_vec();
    frame.extend_from_slice(&[9, 9, 9]);
    assert_eq!(FragmentHeader::decode(&frame), Ok(header));
}

#[rstest]
#[case(&[])]
#[case(&[1, 0, 0])]
#[case(&[1, 0, 0, 0, 1])]
fn fragment_header_rejects_truncated_frames(#[case] frame: &[u8]) {
    assert_eq!(
        FragmentHeader::decode(frame),
        Err(HeaderError::Truncated { have: frame.len() })
    );
}

#[test]
fn fragment_header_rejects_zero_count() {
    assert_eq!(
        FragmentHeader::decode(&[1, 0, 0, 0, 0, 0]),
        Err(HeaderError::ZeroCount)
    );
}

#[rstest]
#[case(1)]
#[case(5)]
fn series_accepts_sequential_fragments(#[case] channel: u16) {
    let channel = ChannelId::new(channel);
    let mut series = FragmentSeries::new(channel, 2);
    let first = FragmentHeader::new(channel, FragmentIndex::zero(), 2);
    let second = FragmentHeader::new(channel, FragmentIndex::new(1), 2);

    assert_eq!(series.accept(first), Ok(FragmentStatus::Incomplete));
    assert_eq!(series.accept(second), Ok(FragmentStatus::Complete));
    assert!(series.is_complete());
}

#[test]
fn series_completes_single_fragment_packet() {
    let channel = ChannelId::new(3);
    let mut series = FragmentSeries::new(channel, 1);
    let only = FragmentHeader::new(channel, FragmentIndex::zero(), 1);
    assert_eq!(series.accept(only), Ok(FragmentStatus::Complete));
}

#[test]
fn series_rejects_other_channel() {
    let mut series = FragmentSeries::new(ChannelId::new(7), 2);
    let header = FragmentHeader::new(ChannelId::new(8), FragmentIndex::zero(), 2);
    let err = series
        .accept(header)
        .expect_err("fragment from another channel must be rejected");
    assert!(matches!(err, FragmentError::ChannelMismatch { .. }));
}

#[test]
fn series_rejects_count_change() {
    let channel = ChannelId::new(7);
    let mut series = FragmentSeries::new(channel, 2);
    let header = FragmentHeader::new(channel, FragmentIndex::zero(), 3);
    assert_eq!(
        series.accept(header),
        Err(FragmentError::CountMismatch {
            expected: 2,
            found: 3
        })
    );
}

#[test]
fn series_rejects_index_beyond_count() {
    let channel = ChannelId::new(7);
    let mut series = FragmentSeries::new(channel, 2);
    let header = FragmentHeader::new(channel, FragmentIndex::new(2), 2);
    assert_eq!(
        series.accept(header),
        Err(FragmentError::IndexOutOfRange {
            index: FragmentIndex::new(2),
            count: 2
        })
    );
}

#[test]
fn series_rejects_out_of_order_fragment() {
    let channel = ChannelId::new(7);
    let mut series = FragmentSeries::new(channel, 4);
    let header = FragmentHeader::new(channel, FragmentIndex::new(2), 4);
    let err = series
        .accept(header)
        .expect_err("out-of-order fragment must be rejected");
    assert!(matches!(err, FragmentError::IndexMismatch { .. }));
}

#[test]
fn series_suppresses_duplicate_fragment() {
    let channel = ChannelId::new(7);
    let mut series = FragmentSeries::new(channel, 2);
    let first = FragmentHeader::new(channel, FragmentIndex::zero(), 2);
    let final_fragment = FragmentHeader::new(channel, FragmentIndex::new(1), 2);

    assert_eq!(series.accept(first), Ok(FragmentStatus::Incomplete));
    assert_eq!(series.accept(first), Ok(FragmentStatus::Duplicate));
    assert_eq!(series.accept(final_fragment), Ok(FragmentStatus::Complete));
    assert_eq!(series.accept(final_fragment), Ok(FragmentStatus::Duplicate));
    assert!(series.is_complete());
}

#[test]
fn series_accepts_final_fragment_at_max_index() {
    let channel = ChannelId::new(2);
    let mut series = FragmentSeries::new(channel, u16::MAX);
    for index in 0..u16::MAX - 1 {
        let header = FragmentHeader::new(channel, FragmentIndex::new(index), u16::MAX);
        assert_eq!(series.accept(header), Ok(FragmentStatus::Incomplete));
    }
    let last = FragmentHeader::new(channel, FragmentIndex::new(u16::MAX - 1), u16::MAX);
    assert_eq!(series.accept(last), Ok(FragmentStatus::Complete));
}
