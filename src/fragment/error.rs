//! Error and status types emitted by the packet codec.
//!
//! Writers, readers and the reassembler each get their own enum so callers
//! can match on exactly the failures an operation can produce.

use std::{num::NonZeroUsize, string::FromUtf8Error};

use thiserror::Error;

use super::{ChannelId, FragmentIndex};

/// Errors produced while appending to a [`PacketWriter`](crate::fragment::PacketWriter).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum WriteError {
    /// The fragment size leaves no room for payload after the header.
    #[error("fragment size {fragment_size} leaves no payload capacity after the header")]
    NoPayloadCapacity { fragment_size: usize },
    /// A string write claimed more bytes than the text provides.
    #[error("string length {declared} exceeds the {available} bytes supplied")]
    StringTooShort { declared: usize, available: usize },
    /// A string length does not fit the `u32` length prefix.
    #[error("string length {len} does not fit a u32 length prefix")]
    StringTooLong { len: usize },
}

/// Errors produced while decoding from a [`PacketReader`](crate::fragment::PacketReader).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    /// Fewer bytes remain than the value requires.
    #[error("unexpected end of packet: need {needed} bytes, {remaining} remain")]
    UnexpectedEnd { needed: usize, remaining: usize },
    /// A string length prefix points past the end of the packet.
    #[error("string length {declared} overruns the {remaining} bytes remaining")]
    StringOverrun { declared: usize, remaining: usize },
    /// The string bytes are not valid UTF-8.
    #[error("string is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// Errors produced while stamping outbound fragment headers.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FragmentationError {
    /// The packet needs more fragments than the header can number.
    #[error("packet needs {count} fragments; headers carry at most {}", u16::MAX)]
    IndexOverflow { count: usize },
}

/// Errors produced while decoding a [`FragmentHeader`](crate::fragment::FragmentHeader).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    /// The frame is too short to hold a header.
    #[error("frame of {have} bytes is too short for a fragment header")]
    Truncated { have: usize },
    /// The header advertises a packet with no fragments.
    #[error("fragment header advertises zero fragments")]
    ZeroCount,
}

/// Result of feeding a fragment into a [`FragmentSeries`](crate::fragment::FragmentSeries).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentStatus {
    /// The packet still expects more fragments.
    Incomplete,
    /// The fragment completed the packet.
    Complete,
    /// The fragment repeats one already accepted.
    Duplicate,
}

/// Errors produced by [`FragmentSeries`](crate::fragment::FragmentSeries).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FragmentError {
    /// The fragment belongs to a different channel.
    #[error("fragment channel mismatch: expected {expected}, found {found}")]
    ChannelMismatch {
        expected: ChannelId,
        found: ChannelId,
    },
    /// A fragment arrived out of order.
    #[error("fragment index mismatch: expected {expected}, found {found}")]
    IndexMismatch {
        expected: FragmentIndex,
        found: FragmentIndex,
    },
    /// A fragment disagrees with the series about the fragment count.
    #[error("fragment count mismatch: expected {expected}, found {found}")]
    CountMismatch { expected: u16, found: u16 },
    /// The fragment index lies beyond the advertised fragment count.
    #[error("fragment index {index} out of range for {count} fragments")]
    IndexOutOfRange { index: FragmentIndex, count: u16 },
}

/// Errors produced by the [`Reassembler`](crate::fragment::Reassembler).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ReassemblyError {
    /// The frame header could not be decoded.
    #[error(transparent)]
    Header(#[from] HeaderError),
    /// The fragment violated ordering rules.
    #[error(transparent)]
    Fragment(#[from] FragmentError),
    /// The assembled packet would exceed the configured cap.
    #[error("packet on channel {channel} too large: attempted {attempted} bytes, limit {limit}")]
    PacketTooLarge {
        channel: ChannelId,
        attempted: usize,
        limit: NonZeroUsize,
    },
    /// A fragment that is not the last one carries no payload.
    #[error("fragment {index} is not the last but carries no payload")]
    EmptyFragment { index: FragmentIndex },
    /// A fragment's payload length disagrees with the packet's payload capacity.
    #[error("fragment {index} carries {len} payload bytes; expected {expected}")]
    PayloadLengthMismatch {
        index: FragmentIndex,
        len: usize,
        expected: usize,
    },
}
