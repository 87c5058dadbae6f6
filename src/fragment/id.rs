//! Channel identifiers carried alongside each packet.

use derive_more::{Display, From, Into};

/// Opaque channel (opcode) identifier recorded for the transport layer.
///
/// The codec never interprets the value; it only carries it into fragment
/// headers and reports it back from readers.
///
/// # Examples
///
/// ```
/// use chunkwire::fragment::ChannelId;
/// let channel = ChannelId::new(42);
/// assert_eq!(channel.get(), 42);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, From, Into)]
#[display("{_0}")]
pub struct ChannelId(u16);

impl ChannelId {
    /// Create a new identifier.
    #[must_use]
    pub const fn new(value: u16) -> Self { Self(value) }

    /// Return the inner numeric identifier.
    #[must_use]
    pub const fn get(self) -> u16 { self.0 }
}
