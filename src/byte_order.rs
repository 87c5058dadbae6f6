//! Fixed-width value encoding for the logical packet stream.
//!
//! Every primitive is carried in little-endian byte order so that packets
//! produced on one host decode identically on any other. The width of each
//! value is fixed at compile time through [`WireValue::Bytes`].

/// A primitive that occupies a fixed number of bytes in the packet stream.
///
/// # Examples
///
/// ```
/// use chunkwire::byte_order::WireValue;
///
/// assert_eq!(1768_u16.to_wire(), [0xE8, 0x06]);
/// assert_eq!(u16::from_wire([0xE8, 0x06]), 1768);
/// assert_eq!(<u32 as WireValue>::WIDTH, 4);
/// ```
pub trait WireValue: Copy {
    /// Byte array holding one encoded value.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Number of stream bytes one value occupies.
    const WIDTH: usize;

    /// Encode `self` in stream byte order.
    fn to_wire(self) -> Self::Bytes;

    /// Decode a value from its stream representation.
    fn from_wire(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_wire_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WireValue for $ty {
                type Bytes = [u8; size_of::<$ty>()];

                const WIDTH: usize = size_of::<$ty>();

                fn to_wire(self) -> Self::Bytes { self.to_le_bytes() }

                fn from_wire(bytes: Self::Bytes) -> Self { <$ty>::from_le_bytes(bytes) }
            }
        )*
    };
}

impl_wire_value!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl WireValue for bool {
    type Bytes = [u8; 1];

    const WIDTH: usize = 1;

    fn to_wire(self) -> Self::Bytes { [u8::from(self)] }

    fn from_wire(bytes: Self::Bytes) -> Self { bytes[0] != 0 }
}

/// Serialise a string length prefix.
///
/// String lengths are always carried as a `u32`.
#[must_use]
pub fn write_length_prefix(len: u32) -> [u8; 4] { len.to_wire() }

/// Parse a string length prefix from its stream representation.
#[must_use]
pub fn read_length_prefix(bytes: [u8; 4]) -> u32 { u32::from_wire(bytes) }

#[cfg(test)]
mod tests {
    //! Encoding tests for the fixed-width stream values.

    use rstest::rstest;

    use super::{WireValue, read_length_prefix, write_length_prefix};

    /// Verify that each width encodes in little-endian order.
    #[rstest]
    #[case::u16(&1768_u16.to_wire()[..], &[0xE8, 0x06])]
    #[case::u32(&0x1234_5678_u32.to_wire()[..], &[0x78, 0x56, 0x34, 0x12])]
    #[case::i16(&(-2_i16).to_wire()[..], &[0xFE, 0xFF])]
    #[case::u64(
        &0x1122_3344_5566_7788_u64.to_wire()[..],
        &[0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11]
    )]
    #[case::bool(&true.to_wire()[..], &[1])]
    fn values_encode_little_endian(#[case] written: &[u8], #[case] expected: &[u8]) {
        assert_eq!(written, expected);
    }

    #[test]
    fn widths_match_type_sizes() {
        assert_eq!(<u8 as WireValue>::WIDTH, 1);
        assert_eq!(<i16 as WireValue>::WIDTH, 2);
        assert_eq!(<f32 as WireValue>::WIDTH, 4);
        assert_eq!(<f64 as WireValue>::WIDTH, 8);
        assert_eq!(<bool as WireValue>::WIDTH, 1);
    }

    #[test]
    fn float_decodes_bit_exact() {
        let value = -0.125_f64;
        assert_eq!(f64::from_wire(value.to_wire()).to_bits(), value.to_bits());
    }

    #[test]
    fn length_prefix_is_four_bytes() {
        assert_eq!(write_length_prefix(4), [4, 0, 0, 0]);
        assert_eq!(read_length_prefix([0, 1, 0, 0]), 256);
    }
}
