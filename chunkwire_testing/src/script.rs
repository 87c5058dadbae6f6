//! Scripted write/read sequences for round-trip tests.

use chunkwire::{ChannelId, PacketReader, PacketWriter};
use proptest::{
    collection::vec,
    prelude::{Strategy, any, prop_oneof},
    string::string_regex,
    test_runner::{Config as ProptestConfig, RngAlgorithm, TestRng, TestRunner},
};

/// One typed write, replayed later as the matching read.
#[derive(Clone, Debug, PartialEq)]
pub enum PacketOp {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I32(i32),
    F64(f64),
    Bool(bool),
    Str(String),
}

impl PacketOp {
    /// Logical bytes this operation adds to the stream.
    #[must_use]
    pub fn stream_len(&self) -> usize {
        match self {
            Self::U8(_) | Self::Bool(_) => 1,
            Self::U16(_) => 2,
            Self::U32(_) | Self::I32(_) => 4,
            Self::U64(_) | Self::F64(_) => 8,
            Self::Str(text) => 4 + text.len(),
        }
    }
}

/// Total logical bytes a script writes.
#[must_use]
pub fn stream_len(script: &[PacketOp]) -> usize { script.iter().map(PacketOp::stream_len).sum() }

/// Build a writer and replay `script` into it.
///
/// # Panics
///
/// Panics if any write fails, which only happens for fragment sizes with no
/// payload capacity.
#[must_use]
pub fn write_script(
    channel: ChannelId,
    fragment_size: usize,
    initial_size: usize,
    script: &[PacketOp],
) -> PacketWriter {
    let mut writer = PacketWriter::new(channel, fragment_size, initial_size);
    for op in script {
        let result = match op {
            PacketOp::U8(value) => writer.write(*value),
            PacketOp::U16(value) => writer.write(*value),
            PacketOp::U32(value) => writer.write(*value),
            PacketOp::U64(value) => writer.write(*value),
            PacketOp::I32(value) => writer.write(*value),
            PacketOp::F64(value) => writer.write(*value),
            PacketOp::Bool(value) => writer.write(*value),
            PacketOp::Str(text) => writer.write_string(text),
        };
        result.unwrap_or_else(|err| panic!("scripted write {op:?} failed: {err}"));
    }
    writer
}

/// Issue the reads matching `script` and assert each decodes to the written
/// value.
///
/// Floats are compared bit for bit. Value reads use a fallback that differs
/// from the expected value so a silent under-run cannot pass.
///
/// # Panics
///
/// Panics if any read disagrees with the script.
pub fn assert_reads(reader: &mut PacketReader<'_>, script: &[PacketOp]) {
    for op in script {
        let read = match op {
            PacketOp::U8(value) => PacketOp::U8(reader.read(!*value)),
            PacketOp::U16(value) => PacketOp::U16(reader.read(!*value)),
            PacketOp::U32(value) => PacketOp::U32(reader.read(!*value)),
            PacketOp::U64(value) => PacketOp::U64(reader.read(!*value)),
            PacketOp::I32(value) => PacketOp::I32(reader.read(!*value)),
            PacketOp::F64(value) => {
                let bits = reader.read(f64::from_bits(!value.to_bits())).to_bits();
                assert_eq!(bits, value.to_bits(), "f64 mismatch");
                continue;
            }
            PacketOp::Bool(value) => PacketOp::Bool(reader.read(!*value)),
            PacketOp::Str(_) => PacketOp::Str(
                reader
                    .read_string()
                    .unwrap_or_else(|err| panic!("scripted read of {op:?} failed: {err}")),
            ),
        };
        assert_eq!(&read, op);
    }
}

/// Strategy producing a single scripted operation.
pub fn packet_op_strategy() -> impl Strategy<Value = PacketOp> {
    prop_oneof![
        any::<u8>().prop_map(PacketOp::U8),
        any::<u16>().prop_map(PacketOp::U16),
        any::<u32>().prop_map(PacketOp::U32),
        any::<u64>().prop_map(PacketOp::U64),
        any::<i32>().prop_map(PacketOp::I32),
        any::<f64>().prop_map(PacketOp::F64),
        any::<bool>().prop_map(PacketOp::Bool),
        string_regex("[a-z ]{0,24}")
            .unwrap_or_else(|err| panic!("invalid string pattern: {err}"))
            .prop_map(PacketOp::Str),
    ]
}

/// Strategy producing scripts of up to `max_ops` operations.
pub fn script_strategy(max_ops: usize) -> impl Strategy<Value = Vec<PacketOp>> {
    vec(packet_op_strategy(), 0..=max_ops)
}

/// Proptest runner with a fixed seed so failures reproduce across runs.
#[must_use]
pub fn deterministic_runner(cases: u32) -> TestRunner {
    let config = ProptestConfig {
        cases,
        ..ProptestConfig::default()
    };
    let rng = TestRng::deterministic_rng(RngAlgorithm::ChaCha);
    TestRunner::new_with_rng(config, rng)
}
