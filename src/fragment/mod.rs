//! Fragmented packet writer and reader.
//!
//! A [`PacketWriter`] spreads a logical byte stream over fixed-capacity
//! fragments, a [`PacketReader`] walks it back, and the [`Reassembler`]
//! rebuilds packets from header-stamped frames received off the wire.

pub mod buffer;
pub mod config;
pub mod error;
pub mod header;
pub mod id;
pub mod index;
pub mod reader;
pub mod reassembler;
pub mod series;
pub mod writer;

pub use buffer::Fragment;
pub use config::{FragmentLayout, FragmentationConfig};
pub use error::{
    FragmentError,
    FragmentStatus,
    FragmentationError,
    HeaderError,
    ReadError,
    ReassemblyError,
    WriteError,
};
pub use header::{FragmentHeader, HEADER_SIZE, MAX_FRAGMENT_SIZE};
pub use id::ChannelId;
pub use index::FragmentIndex;
pub use reader::PacketReader;
pub use reassembler::{AssembledPacket, Reassembler};
pub use series::FragmentSeries;
pub use writer::PacketWriter;

#[cfg(test)]
mod tests;
