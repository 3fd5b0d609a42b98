//! Channel Data characteristic.
//!
//! The live temperature of one channel, in one of two encodings depending on
//! the firmware generation:
//!
//! - [`ProtocolGeneration::Float`]: 4 bytes, little-endian `f32`, NaN when no
//!   probe is plugged in.
//! - [`ProtocolGeneration::FixedPoint`]: 4 bytes, **big-endian** `u32` in
//!   1/32 degree steps, `0xFFFFFFFF` on sensor fault.
//!
//! A decoded value only becomes meaningful once it is joined with the
//! channel's enable flag from Device Config; see [`classify_reading`].

use tracing::debug;

use crate::error::DecodeError;
use crate::protocol::layout;
use crate::protocol::{PacketKind, PacketReader, ProtocolGeneration};

/// Fixed-point temperature in 1/32 degree steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaledReading(u32);

impl ScaledReading {
    /// Raw value reported on sensor fault.
    pub const SENSOR_ERROR: Self = Self(layout::SENSOR_ERROR_SENTINEL);

    /// Wrap a raw fixed-point value.
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw fixed-point value.
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Check if this is the sensor fault sentinel.
    pub fn is_sensor_error(&self) -> bool {
        self.0 == layout::SENSOR_ERROR_SENTINEL
    }

    /// Decimal temperature, `None` on sensor fault.
    ///
    /// # Example
    ///
    /// ```
    /// use thermaq_rust_ble::data::ScaledReading;
    ///
    /// assert_eq!(ScaledReading::new(3200).value(), Some(100.0));
    /// assert_eq!(ScaledReading::SENSOR_ERROR.value(), None);
    /// ```
    pub fn value(&self) -> Option<f64> {
        if self.is_sensor_error() {
            None
        } else {
            Some(f64::from(self.0) / layout::FIXED_POINT_SCALE)
        }
    }
}

/// A decoded Channel Data payload, before classification.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawReading {
    /// Float-generation reading; NaN means no probe.
    Float(f32),
    /// Fixed-point-generation reading.
    Scaled(ScaledReading),
}

/// Consumer-facing state of a channel reading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadingStatus {
    /// The channel is switched off in Device Config.
    Disabled,
    /// No probe is plugged into the channel.
    NoProbe,
    /// The sensor reported a fault.
    SensorError,
    /// A temperature in the device's display unit.
    Value(f64),
}

impl ReadingStatus {
    /// The temperature, if there is one.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(value) => Some(*value),
            _ => None,
        }
    }

    /// Check if this status carries a temperature.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "Disabled"),
            Self::NoProbe => write!(f, "No Probe"),
            Self::SensorError => write!(f, "Sensor Error"),
            Self::Value(value) => write!(f, "{:.2}", value),
        }
    }
}

/// Join a decoded reading with its channel's enable flag.
///
/// A sensor fault is reported even on a disabled channel. Otherwise a disabled
/// channel wins over a missing probe.
///
/// # Example
///
/// ```
/// use thermaq_rust_ble::data::{classify_reading, RawReading, ReadingStatus};
///
/// assert_eq!(classify_reading(RawReading::Float(f32::NAN), true), ReadingStatus::NoProbe);
/// assert_eq!(classify_reading(RawReading::Float(21.5), false), ReadingStatus::Disabled);
/// ```
pub fn classify_reading(raw: RawReading, channel_enabled: bool) -> ReadingStatus {
    match raw {
        RawReading::Scaled(scaled) if scaled.is_sensor_error() => ReadingStatus::SensorError,
        _ if !channel_enabled => ReadingStatus::Disabled,
        RawReading::Float(value) if value.is_nan() => ReadingStatus::NoProbe,
        RawReading::Float(value) => ReadingStatus::Value(f64::from(value)),
        RawReading::Scaled(scaled) => match scaled.value() {
            Some(value) => ReadingStatus::Value(value),
            None => ReadingStatus::SensorError,
        },
    }
}

/// A channel reading together with the channel's enable flag.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelReading {
    /// The decoded payload.
    pub raw: RawReading,
    /// Whether the channel is enabled in Device Config.
    pub enabled: bool,
}

impl ChannelReading {
    /// Pair a decoded payload with its enable flag.
    pub fn new(raw: RawReading, enabled: bool) -> Self {
        Self { raw, enabled }
    }

    /// Classified state of this reading.
    pub fn status(&self) -> ReadingStatus {
        classify_reading(self.raw, self.enabled)
    }

    /// The temperature, if the reading carries one.
    pub fn value(&self) -> Option<f64> {
        self.status().value()
    }
}

/// Decode a float-generation Channel Data payload.
///
/// Fails with [`DecodeError::Length`] unless `data` is exactly 4 bytes. A NaN
/// result is a valid "no probe" reading, not an error.
pub fn decode_reading_f32(data: &[u8]) -> Result<f32, DecodeError> {
    let reader = PacketReader::new(PacketKind::Reading, data);
    reader.require_exact(layout::READING_LEN)?;
    reader.read_f32_le(0..layout::READING_LEN)
}

/// Decode a fixed-point-generation Channel Data payload.
///
/// The four bytes are a big-endian `u32`, unlike every other numeric field
/// in the protocol. Fails with [`DecodeError::Length`] unless `data` is
/// exactly 4 bytes.
pub fn decode_reading_u32_scaled(data: &[u8]) -> Result<ScaledReading, DecodeError> {
    let reader = PacketReader::new(PacketKind::Reading, data);
    reader.require_exact(layout::READING_LEN)?;
    reader
        .read_u32_be(0..layout::READING_LEN)
        .map(ScaledReading::new)
}

/// Decode a Channel Data payload in the encoding of `generation`.
pub fn decode_reading(
    data: &[u8],
    generation: ProtocolGeneration,
) -> Result<RawReading, DecodeError> {
    let reading = match generation {
        ProtocolGeneration::Float => RawReading::Float(decode_reading_f32(data)?),
        ProtocolGeneration::FixedPoint => RawReading::Scaled(decode_reading_u32_scaled(data)?),
    };

    debug!("Parsed {} reading: {:?}", generation, reading);

    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_reading() {
        let data = 63.25f32.to_le_bytes();
        assert_eq!(decode_reading_f32(&data), Ok(63.25));
        assert_eq!(
            classify_reading(RawReading::Float(63.25), true),
            ReadingStatus::Value(63.25)
        );
    }

    #[test]
    fn test_nan_bytes_read_little_endian_are_no_probe() {
        // The NaN pattern as written big-endian, read little-endian: 0x0000C07F.
        let value = decode_reading_f32(&[0x7F, 0xC0, 0x00, 0x00]).unwrap();
        assert_eq!(value.to_bits(), 0x0000_C07F);

        // The NaN pattern as the firmware stores it, little-endian.
        let value = decode_reading_f32(&[0x00, 0x00, 0xC0, 0x7F]).unwrap();
        assert!(value.is_nan());
        assert_eq!(
            classify_reading(RawReading::Float(value), true),
            ReadingStatus::NoProbe
        );
    }

    #[test]
    fn test_scaled_reading() {
        let scaled = decode_reading_u32_scaled(&3200u32.to_be_bytes()).unwrap();
        assert_eq!(scaled.raw(), 3200);
        assert_eq!(scaled.value(), Some(100.0));
        assert_eq!(
            classify_reading(RawReading::Scaled(scaled), true),
            ReadingStatus::Value(100.0)
        );
    }

    #[test]
    fn test_scaled_reading_is_big_endian() {
        let scaled = decode_reading_u32_scaled(&[0x00, 0x00, 0x0C, 0x80]).unwrap();
        assert_eq!(scaled.value(), Some(100.0));

        let scaled = decode_reading_u32_scaled(&[0x80, 0x0C, 0x00, 0x00]).unwrap();
        assert_ne!(scaled.value(), Some(100.0));
    }

    #[test]
    fn test_fractional_scaled_reading() {
        let scaled = ScaledReading::new(32 * 21 + 16);
        assert_eq!(scaled.value(), Some(21.5));
    }

    #[test]
    fn test_sensor_error_regardless_of_enabled() {
        let scaled = decode_reading_u32_scaled(&[0xFF; 4]).unwrap();
        assert!(scaled.is_sensor_error());
        assert_eq!(scaled, ScaledReading::SENSOR_ERROR);

        for enabled in [true, false] {
            assert_eq!(
                classify_reading(RawReading::Scaled(scaled), enabled),
                ReadingStatus::SensorError
            );
        }
    }

    #[test]
    fn test_disabled_channel() {
        assert_eq!(
            classify_reading(RawReading::Float(f32::NAN), false),
            ReadingStatus::Disabled
        );
        assert_eq!(
            classify_reading(RawReading::Scaled(ScaledReading::new(64)), false),
            ReadingStatus::Disabled
        );
    }

    #[test]
    fn test_channel_reading() {
        let reading = ChannelReading::new(RawReading::Float(20.0), true);
        assert_eq!(reading.status(), ReadingStatus::Value(20.0));
        assert_eq!(reading.value(), Some(20.0));

        let reading = ChannelReading::new(RawReading::Float(20.0), false);
        assert_eq!(reading.value(), None);
    }

    #[test]
    fn test_decode_reading_by_generation() {
        let data = [0x00, 0x00, 0x0C, 0x80];
        assert!(matches!(
            decode_reading(&data, ProtocolGeneration::Float),
            Ok(RawReading::Float(_))
        ));
        assert_eq!(
            decode_reading(&data, ProtocolGeneration::FixedPoint),
            Ok(RawReading::Scaled(ScaledReading::new(3200)))
        );
    }

    #[test]
    fn test_wrong_length() {
        let expected = Err(DecodeError::Length {
            packet: PacketKind::Reading,
            expected: 4,
            actual: 3,
        });
        assert_eq!(decode_reading_f32(&[0; 3]), expected);
        assert_eq!(
            decode_reading_u32_scaled(&[0; 3]),
            Err(DecodeError::Length {
                packet: PacketKind::Reading,
                expected: 4,
                actual: 3
            })
        );
        assert!(decode_reading_f32(&[0; 5]).is_err());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ReadingStatus::NoProbe.to_string(), "No Probe");
        assert_eq!(ReadingStatus::Value(21.456).to_string(), "21.46");
    }
}
