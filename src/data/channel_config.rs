//! Channel Config characteristic.
//!
//! Each channel has its own 20-byte config with two alarm thresholds and a
//! fixed-width name.

use tracing::{debug, warn};

use crate::error::DecodeError;
use crate::protocol::layout;
use crate::protocol::{PacketKind, PacketReader};

/// A single alarm threshold.
///
/// The firmware disables an alarm by storing a NaN in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alarm {
    /// Alarm is off.
    #[default]
    Disabled,
    /// Alarm fires at this temperature, in the device's display unit.
    Threshold(f32),
}

impl Alarm {
    /// Create from the raw stored value.
    ///
    /// Any NaN bit pattern (all-ones exponent, nonzero mantissa) disables the
    /// alarm, regardless of sign or payload.
    pub fn from_raw(value: f32) -> Self {
        if value.is_nan() {
            Self::Disabled
        } else {
            Self::Threshold(value)
        }
    }

    /// Convert to the stored value.
    pub fn to_raw(&self) -> f32 {
        match self {
            Self::Disabled => f32::NAN,
            Self::Threshold(value) => *value,
        }
    }

    /// Check if the alarm is enabled.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Threshold(_))
    }

    /// The threshold, `None` when disabled.
    pub fn threshold(&self) -> Option<f32> {
        match self {
            Self::Disabled => None,
            Self::Threshold(value) => Some(*value),
        }
    }
}

/// Fixed-width channel name exactly as stored on the device.
///
/// The bytes are kept verbatim. [`ChannelName::as_str`] returns the full
/// 12-byte field including padding; [`ChannelName::trimmed`] strips trailing
/// NULs and whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelName {
    bytes: [u8; layout::NAME_LEN],
}

impl ChannelName {
    /// Width of the name field in bytes.
    pub const LEN: usize = layout::NAME_LEN;

    /// Wrap raw name bytes.
    pub fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self { bytes }
    }

    /// Build a stored name from text, padding with spaces.
    ///
    /// Returns `None` if the UTF-8 encoding of `name` is longer than 12 bytes.
    pub fn from_str_padded(name: &str) -> Option<Self> {
        let encoded = name.as_bytes();
        if encoded.len() > Self::LEN {
            return None;
        }
        let mut bytes = [b' '; layout::NAME_LEN];
        bytes[..encoded.len()].copy_from_slice(encoded);
        Some(Self { bytes })
    }

    /// The raw stored bytes.
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.bytes
    }

    /// Validate the stored bytes as UTF-8.
    pub fn validate(&self) -> Result<&str, DecodeError> {
        std::str::from_utf8(&self.bytes).map_err(|e| DecodeError::Encoding {
            packet: PacketKind::ChannelConfig,
            valid_up_to: e.valid_up_to(),
        })
    }

    /// Check if the stored bytes are valid UTF-8.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// The full stored text, `None` if it is not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.validate().ok()
    }

    /// The stored text without trailing NULs or whitespace.
    pub fn trimmed(&self) -> Option<&str> {
        self.as_str()
            .map(|name| name.trim_end_matches(|c: char| c == '\0' || c.is_whitespace()))
    }

    /// The stored text with invalid sequences replaced by U+FFFD.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl std::fmt::Display for ChannelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.trimmed() {
            Some(name) => f.write_str(name),
            None => f.write_str(self.to_string_lossy().trim_end()),
        }
    }
}

/// Decoded Channel Config characteristic.
///
/// Layout:
/// - Bytes 0-3: High alarm (f32 little-endian, NaN = disabled)
/// - Bytes 4-7: Low alarm (f32 little-endian, NaN = disabled)
/// - Bytes 8-19: Name (12 bytes of text)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelConfig {
    /// High temperature alarm.
    pub alarm_high: Alarm,
    /// Low temperature alarm.
    pub alarm_low: Alarm,
    /// Channel name.
    pub name: ChannelName,
}

impl ChannelConfig {
    /// Size of the Channel Config payload in bytes.
    pub const SIZE: usize = layout::CHANNEL_CONFIG_LEN;

    fn parse_fields(data: &[u8]) -> Result<Self, DecodeError> {
        let reader = PacketReader::new(PacketKind::ChannelConfig, data);
        reader.require_min(Self::SIZE)?;

        Ok(Self {
            alarm_high: Alarm::from_raw(reader.read_f32_le(layout::ALARM_HIGH_RANGE)?),
            alarm_low: Alarm::from_raw(reader.read_f32_le(layout::ALARM_LOW_RANGE)?),
            name: ChannelName::from_bytes(reader.read_array(layout::NAME_RANGE)?),
        })
    }

    /// Parse a Channel Config payload, rejecting a name that is not UTF-8.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let config = Self::parse_fields(data)?;
        config.name.validate()?;

        debug!("Parsed channel config: {:?}", config);

        Ok(config)
    }

    /// Parse a Channel Config payload, keeping a malformed name.
    ///
    /// Only a length failure is returned as an error. Callers check
    /// [`ChannelName::is_valid`] to see whether the name decoded cleanly.
    pub fn parse_lossy(data: &[u8]) -> Result<Self, DecodeError> {
        let config = Self::parse_fields(data)?;

        if let Err(e) = config.name.validate() {
            warn!("Channel name is not valid text: {}", e);
        }

        Ok(config)
    }

    /// Encode back to the 20-byte wire form.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[layout::ALARM_HIGH_RANGE].copy_from_slice(&self.alarm_high.to_raw().to_le_bytes());
        bytes[layout::ALARM_LOW_RANGE].copy_from_slice(&self.alarm_low.to_raw().to_le_bytes());
        bytes[layout::NAME_RANGE].copy_from_slice(self.name.as_bytes());
        bytes
    }
}

/// Decode a Channel Config payload.
///
/// Fails with [`DecodeError::Length`] if `data` is shorter than 20 bytes and
/// with [`DecodeError::Encoding`] if the name is not valid UTF-8.
pub fn decode_channel_config(data: &[u8]) -> Result<ChannelConfig, DecodeError> {
    ChannelConfig::parse(data)
}

/// Decode a Channel Config payload without failing on a malformed name.
pub fn decode_channel_config_lossy(data: &[u8]) -> Result<ChannelConfig, DecodeError> {
    ChannelConfig::parse_lossy(data)
}
