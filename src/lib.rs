#![doc(html_root_url = "https://docs.rs/chunkwire/latest")]
//! Public API for the `chunkwire` library.
//!
//! This crate provides a chunked binary packet codec: a writer that spreads
//! typed values and length-prefixed strings over fixed-capacity fragments,
//! and a reader that decodes them back with fragment boundaries kept
//! invisible to the caller.

pub mod byte_order;
pub mod fragment;
pub mod metrics;

pub use byte_order::WireValue;
pub use fragment::{
    AssembledPacket,
    ChannelId,
    Fragment,
    FragmentError,
    FragmentHeader,
    FragmentIndex,
    FragmentLayout,
    FragmentSeries,
    FragmentStatus,
    FragmentationConfig,
    FragmentationError,
    HEADER_SIZE,
    HeaderError,
    MAX_FRAGMENT_SIZE,
    PacketReader,
    PacketWriter,
    ReadError,
    Reassembler,
    ReassemblyError,
    WriteError,
};
pub use metrics::{Direction, ERRORS_TOTAL, FRAGMENTS_TOTAL};
