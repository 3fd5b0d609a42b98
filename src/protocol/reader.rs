//! Bounds-checked access to a characteristic payload.

use std::ops::Range;

use crate::error::DecodeError;
use crate::protocol::PacketKind;

/// Read-only cursor-free view over one payload.
///
/// Every accessor returns [`DecodeError::Length`] instead of panicking when
/// the requested bytes are not present.
pub struct PacketReader<'a> {
    packet: PacketKind,
    payload: &'a [u8],
}

impl<'a> PacketReader<'a> {
    /// Wrap a payload for the given packet kind.
    pub fn new(packet: PacketKind, payload: &'a [u8]) -> Self {
        Self { packet, payload }
    }

    /// The raw payload.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    fn length_error(&self, expected: usize) -> DecodeError {
        DecodeError::Length {
            packet: self.packet,
            expected,
            actual: self.payload.len(),
        }
    }

    /// Require the payload to be exactly `len` bytes.
    pub fn require_exact(&self, len: usize) -> Result<(), DecodeError> {
        if self.payload.len() != len {
            return Err(self.length_error(len));
        }
        Ok(())
    }

    /// Require the payload to be at least `len` bytes.
    pub fn require_min(&self, len: usize) -> Result<(), DecodeError> {
        if self.payload.len() < len {
            return Err(self.length_error(len));
        }
        Ok(())
    }

    /// Read one byte.
    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or_else(|| self.length_error(offset + 1))
    }

    /// Borrow a byte range.
    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], DecodeError> {
        let end = range.end;
        self.payload
            .get(range)
            .ok_or_else(|| self.length_error(end))
    }

    /// Copy a byte range into a fixed-size array.
    pub fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], DecodeError> {
        let end = range.end;
        self.read_slice(range)?
            .try_into()
            .map_err(|_| self.length_error(end))
    }

    /// Read a little-endian IEEE-754 single.
    pub fn read_f32_le(&self, range: Range<usize>) -> Result<f32, DecodeError> {
        self.read_array::<4>(range).map(f32::from_le_bytes)
    }

    /// Read a big-endian unsigned 32-bit integer.
    pub fn read_u32_be(&self, range: Range<usize>) -> Result<u32, DecodeError> {
        self.read_array::<4>(range).map(u32::from_be_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_exact() {
        let reader = PacketReader::new(PacketKind::Reading, &[0, 1, 2]);
        assert!(reader.require_exact(3).is_ok());
        assert_eq!(
            reader.require_exact(4),
            Err(DecodeError::Length {
                packet: PacketKind::Reading,
                expected: 4,
                actual: 3
            })
        );
        assert!(reader.require_exact(2).is_err());
    }

    #[test]
    fn test_require_min() {
        let reader = PacketReader::new(PacketKind::ChannelConfig, &[0; 21]);
        assert!(reader.require_min(20).is_ok());
        assert!(reader.require_min(22).is_err());
    }

    #[test]
    fn test_out_of_range_reads_do_not_panic() {
        let reader = PacketReader::new(PacketKind::Trim, &[1, 2]);
        assert_eq!(reader.read_u8(1), Ok(2));
        assert!(reader.read_u8(2).is_err());
        assert!(reader.read_slice(0..3).is_err());
        assert!(reader.read_f32_le(0..4).is_err());
    }

    #[test]
    fn test_byte_order() {
        let payload = [0x00, 0x00, 0x0C, 0x80];
        let reader = PacketReader::new(PacketKind::Reading, &payload);
        assert_eq!(reader.read_u32_be(0..4), Ok(0x0000_0C80));

        let payload = 1.5f32.to_le_bytes();
        let reader = PacketReader::new(PacketKind::Reading, &payload);
        assert_eq!(reader.read_f32_le(0..4), Ok(1.5));
    }
}
