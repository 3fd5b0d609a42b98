//! Trim characteristic.
//!
//! Per-channel calibration offsets. Each 7-byte channel entry is a
//! little-endian `f32` offset followed by a 3-byte stamp: a day/month/year
//! triple on float-generation firmware, opaque bytes otherwise.

use chrono::NaiveDate;
use tracing::debug;

use crate::data::Channel;
use crate::error::DecodeError;
use crate::protocol::layout;
use crate::protocol::{PacketKind, PacketReader, ProtocolGeneration};

/// Date a trim offset was set, as three raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrimDate {
    /// Day of month.
    pub day: u8,
    /// Month.
    pub month: u8,
    /// Two-digit year.
    pub year: u8,
}

impl TrimDate {
    /// Create from `[day, month, year]`.
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            day: bytes[0],
            month: bytes[1],
            year: bytes[2],
        }
    }

    /// Convert to `[day, month, year]`.
    pub fn to_bytes(&self) -> [u8; 3] {
        [self.day, self.month, self.year]
    }

    /// Calendar date, taking the year as 2000 + `year`.
    ///
    /// Returns `None` for an impossible date, such as the all-zero stamp of
    /// a channel that was never trimmed.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            2000 + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
    }
}

impl std::fmt::Display for TrimDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.day, self.month, self.year)
    }
}

/// The 3 bytes following a trim offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrimStamp {
    /// Calibration date (float generation).
    Dated(TrimDate),
    /// Bytes of unknown meaning (fixed-point generation).
    Opaque([u8; 3]),
}

impl TrimStamp {
    fn from_bytes(bytes: [u8; 3], generation: ProtocolGeneration) -> Self {
        if generation.has_dated_trim() {
            Self::Dated(TrimDate::from_bytes(bytes))
        } else {
            Self::Opaque(bytes)
        }
    }

    /// The raw stamp bytes.
    pub fn to_bytes(&self) -> [u8; 3] {
        match self {
            Self::Dated(date) => date.to_bytes(),
            Self::Opaque(bytes) => *bytes,
        }
    }

    /// The calibration date, if this stamp carries one.
    pub fn date(&self) -> Option<&TrimDate> {
        match self {
            Self::Dated(date) => Some(date),
            Self::Opaque(_) => None,
        }
    }
}

/// Trim entry for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelTrim {
    /// Offset added to the channel's readings, in the display unit.
    pub offset: f32,
    /// Date or opaque bytes following the offset.
    pub stamp: TrimStamp,
}

/// Decoded Trim characteristic.
///
/// Layout:
/// - Bytes 0-3: Channel 1 offset (f32 little-endian)
/// - Bytes 4-6: Channel 1 stamp
/// - Bytes 7-10: Channel 2 offset (f32 little-endian)
/// - Bytes 11-13: Channel 2 stamp
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrimConfig {
    /// Channel 1 trim.
    pub channel_1: ChannelTrim,
    /// Channel 2 trim.
    pub channel_2: ChannelTrim,
}

impl TrimConfig {
    /// Size of the Trim payload in bytes.
    pub const SIZE: usize = layout::TRIM_LEN;

    /// Parse a Trim payload.
    pub fn parse(data: &[u8], generation: ProtocolGeneration) -> Result<Self, DecodeError> {
        let reader = PacketReader::new(PacketKind::Trim, data);
        reader.require_exact(Self::SIZE)?;

        let trim = Self {
            channel_1: ChannelTrim {
                offset: reader.read_f32_le(layout::TRIM_CHANNEL_1_OFFSET_RANGE)?,
                stamp: TrimStamp::from_bytes(
                    reader.read_array(layout::TRIM_CHANNEL_1_STAMP_RANGE)?,
                    generation,
                ),
            },
            channel_2: ChannelTrim {
                offset: reader.read_f32_le(layout::TRIM_CHANNEL_2_OFFSET_RANGE)?,
                stamp: TrimStamp::from_bytes(
                    reader.read_array(layout::TRIM_CHANNEL_2_STAMP_RANGE)?,
                    generation,
                ),
            },
        };

        debug!("Parsed {} trim: {:?}", generation, trim);

        Ok(trim)
    }

    /// Trim entry for a channel.
    pub fn channel(&self, channel: Channel) -> &ChannelTrim {
        match channel {
            Channel::One => &self.channel_1,
            Channel::Two => &self.channel_2,
        }
    }

    /// Encode back to the 14-byte wire form.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[layout::TRIM_CHANNEL_1_OFFSET_RANGE]
            .copy_from_slice(&self.channel_1.offset.to_le_bytes());
        bytes[layout::TRIM_CHANNEL_1_STAMP_RANGE].copy_from_slice(&self.channel_1.stamp.to_bytes());
        bytes[layout::TRIM_CHANNEL_2_OFFSET_RANGE]
            .copy_from_slice(&self.channel_2.offset.to_le_bytes());
        bytes[layout::TRIM_CHANNEL_2_STAMP_RANGE].copy_from_slice(&self.channel_2.stamp.to_bytes());
        bytes
    }
}

/// Decode a Trim payload.
///
/// Fails with [`DecodeError::Length`] unless `data` is exactly 14 bytes.
pub fn decode_trim(data: &[u8], generation: ProtocolGeneration) -> Result<TrimConfig, DecodeError> {
    TrimConfig::parse(data, generation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn trim_bytes() -> Vec<u8> {
        let mut data = Vec::with_capacity(14);
        data.extend_from_slice(&0.5f32.to_le_bytes());
        data.extend_from_slice(&[14, 3, 23]);
        data.extend_from_slice(&(-1.25f32).to_le_bytes());
        data.extend_from_slice(&[0, 0, 0]);
        data
    }

    #[test]
    fn test_dated_trim() {
        let trim = decode_trim(&trim_bytes(), ProtocolGeneration::Float).unwrap();

        assert_eq!(trim.channel_1.offset, 0.5);
        assert_eq!(
            trim.channel_1.stamp,
            TrimStamp::Dated(TrimDate {
                day: 14,
                month: 3,
                year: 23
            })
        );
        assert_eq!(trim.channel(Channel::Two).offset, -1.25);

        let date = trim.channel_1.stamp.date().unwrap();
        assert_eq!(date.to_string(), "14/3/23");
        assert_eq!(date.to_naive_date(), NaiveDate::from_ymd_opt(2023, 3, 14));
    }

    #[test]
    fn test_untrimmed_channel_has_no_calendar_date() {
        let trim = decode_trim(&trim_bytes(), ProtocolGeneration::Float).unwrap();
        let date = trim.channel_2.stamp.date().unwrap();
        assert_eq!(date.to_naive_date(), None);
    }

    #[test]
    fn test_undated_trim() {
        let trim = decode_trim(&trim_bytes(), ProtocolGeneration::FixedPoint).unwrap();

        assert_eq!(trim.channel_1.offset, 0.5);
        assert_eq!(trim.channel_1.stamp, TrimStamp::Opaque([14, 3, 23]));
        assert_eq!(trim.channel_1.stamp.date(), None);
        assert_eq!(trim.channel_2.stamp, TrimStamp::Opaque([0, 0, 0]));
    }

    #[test]
    fn test_to_bytes_preserves_layout() {
        let data = trim_bytes();
        for generation in [ProtocolGeneration::Float, ProtocolGeneration::FixedPoint] {
            let trim = decode_trim(&data, generation).unwrap();
            assert_eq!(trim.to_bytes().to_vec(), data);
        }
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            decode_trim(&[0; 13], ProtocolGeneration::Float),
            Err(DecodeError::Length {
                packet: PacketKind::Trim,
                expected: 14,
                actual: 13
            })
        );
        assert!(decode_trim(&[0; 15], ProtocolGeneration::FixedPoint).is_err());
    }
}
