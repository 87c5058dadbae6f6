//! Utilities for exercising `chunkwire` packets in tests.
//!
//! [`PacketOp`] scripts describe a sequence of writes that can be replayed
//! against a [`PacketWriter`](chunkwire::PacketWriter) and then checked
//! against a [`PacketReader`](chunkwire::PacketReader) issuing the matching
//! reads.
//!
//! ```rust
//! use chunkwire::{ChannelId, HEADER_SIZE, PacketReader};
//! use chunkwire_testing::{PacketOp, assert_reads, write_script};
//!
//! let script = vec![PacketOp::U8(25), PacketOp::Str("abcd".into())];
//! let writer = write_script(ChannelId::new(1), HEADER_SIZE + 2, 0, &script);
//! assert_reads(&mut PacketReader::new(&writer), &script);
//! ```

pub mod logging;
pub mod script;

pub use logging::{LoggerHandle, logger};
pub use script::{
    PacketOp,
    assert_reads,
    deterministic_runner,
    packet_op_strategy,
    script_strategy,
    stream_len,
    write_script,
};
