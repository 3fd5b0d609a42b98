//! Device Config characteristic.
//!
//! Seven bytes describing display unit, sampling, power management, channel 2
//! enable and the probe hardware fitted to each channel.

use tracing::debug;

use crate::data::Channel;
use crate::error::DecodeError;
use crate::protocol::layout;
use crate::protocol::{PacketKind, PacketReader};
use crate::utils::{celsius_to_fahrenheit, fahrenheit_to_celsius, nibble, pack_nibbles};

/// Temperature unit the thermometer is set to display.
///
/// The unit is advisory; alarm and reading values are reported in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemperatureUnit {
    /// Degrees Celsius (0).
    #[default]
    Celsius,
    /// Degrees Fahrenheit (1).
    Fahrenheit,
    /// Any other byte value.
    Unknown(u8),
}

impl TemperatureUnit {
    /// Create from raw byte value.
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => Self::Celsius,
            1 => Self::Fahrenheit,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw byte value.
    pub fn to_raw(&self) -> u8 {
        match self {
            Self::Celsius => 0,
            Self::Fahrenheit => 1,
            Self::Unknown(value) => *value,
        }
    }

    /// Check if this is a recognised unit.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Display symbol, empty for an unknown unit.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
            Self::Unknown(_) => "",
        }
    }

    /// Convert a value in this unit to Celsius.
    ///
    /// Returns `None` for an unknown unit.
    pub fn to_celsius(&self, value: f64) -> Option<f64> {
        match self {
            Self::Celsius => Some(value),
            Self::Fahrenheit => Some(fahrenheit_to_celsius(value)),
            Self::Unknown(_) => None,
        }
    }

    /// Convert a value in this unit to Fahrenheit.
    ///
    /// Returns `None` for an unknown unit.
    pub fn to_fahrenheit(&self, value: f64) -> Option<f64> {
        match self {
            Self::Celsius => Some(celsius_to_fahrenheit(value)),
            Self::Fahrenheit => Some(value),
            Self::Unknown(_) => None,
        }
    }
}

/// Thermocouple hardware fitted to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProbeType {
    /// Pluggable K-type thermocouple (nibble 1).
    Pluggable,
    /// Fixed K-type thermocouple (nibble 2).
    FixedK,
    /// Any other nibble, including 0.
    Unknown(u8),
}

impl ProbeType {
    /// Classify a 4-bit probe type code.
    ///
    /// Only the low four bits of `value` are considered.
    pub fn from_nibble(value: u8) -> Self {
        match value & 0x0F {
            1 => Self::Pluggable,
            2 => Self::FixedK,
            // 0 has no confirmed meaning and stays Unknown.
            other => Self::Unknown(other),
        }
    }

    /// Convert to the 4-bit code.
    pub fn to_nibble(&self) -> u8 {
        match self {
            Self::Pluggable => 1,
            Self::FixedK => 2,
            Self::Unknown(value) => *value & 0x0F,
        }
    }

    /// Check if this is a recognised probe type.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Get a human-readable name for this probe type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pluggable => "Pluggable K Type",
            Self::FixedK => "Fixed K Type",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// Decoded Device Config characteristic.
///
/// Layout:
/// - Byte 0: Temperature unit
/// - Byte 1: Measurement interval (seconds)
/// - Byte 2: Reserved
/// - Byte 3: Auto power off (minutes, 0 = disabled)
/// - Byte 4: Reserved
/// - Byte 5: Channel 2 enabled (nonzero = enabled)
/// - Byte 6: Probe types (low nibble = channel 1, high nibble = channel 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Display unit.
    pub unit: TemperatureUnit,
    /// Measurement interval in seconds.
    pub measurement_interval: u8,
    /// Bytes 2 and 4, meaning unknown. One of them may be emissivity.
    pub reserved: [u8; 2],
    /// Raw auto power off minutes; 0 means disabled.
    pub auto_power_off_minutes: u8,
    /// Whether channel 2 is enabled.
    pub channel_2_enabled: bool,
    /// Byte 6, kept verbatim. Packed probe types on most firmware; reserved
    /// on some no-trim (fixed-point) firmware.
    pub probe_types: u8,
}

impl DeviceConfig {
    /// Size of the Device Config payload in bytes.
    pub const SIZE: usize = layout::DEVICE_CONFIG_LEN;

    /// Parse a Device Config payload.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let reader = PacketReader::new(PacketKind::DeviceConfig, data);
        reader.require_exact(Self::SIZE)?;

        let config = Self {
            unit: TemperatureUnit::from_raw(reader.read_u8(layout::UNIT_OFFSET)?),
            measurement_interval: reader.read_u8(layout::INTERVAL_OFFSET)?,
            reserved: [
                reader.read_u8(layout::RESERVED_A_OFFSET)?,
                reader.read_u8(layout::RESERVED_B_OFFSET)?,
            ],
            auto_power_off_minutes: reader.read_u8(layout::AUTO_POWER_OFF_OFFSET)?,
            channel_2_enabled: reader.read_u8(layout::CHANNEL_2_ENABLED_OFFSET)? != 0,
            probe_types: reader.read_u8(layout::PROBE_TYPES_OFFSET)?,
        };

        debug!("Parsed device config: {:?}", config);

        Ok(config)
    }

    /// Encode back to the 7-byte wire form.
    ///
    /// The channel 2 flag is written as 0 or 1.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[layout::UNIT_OFFSET] = self.unit.to_raw();
        bytes[layout::INTERVAL_OFFSET] = self.measurement_interval;
        bytes[layout::RESERVED_A_OFFSET] = self.reserved[0];
        bytes[layout::AUTO_POWER_OFF_OFFSET] = self.auto_power_off_minutes;
        bytes[layout::RESERVED_B_OFFSET] = self.reserved[1];
        bytes[layout::CHANNEL_2_ENABLED_OFFSET] = u8::from(self.channel_2_enabled);
        bytes[layout::PROBE_TYPES_OFFSET] = self.probe_types;
        bytes
    }

    /// Auto power off delay in minutes, `None` when disabled.
    pub fn auto_power_off(&self) -> Option<u8> {
        match self.auto_power_off_minutes {
            0 => None,
            minutes => Some(minutes),
        }
    }

    /// Auto power off delay in hours, `None` when disabled.
    pub fn auto_power_off_hours(&self) -> Option<f64> {
        self.auto_power_off().map(|minutes| f64::from(minutes) / 60.0)
    }

    /// Probe hardware fitted to a channel, classified from byte 6.
    ///
    /// On fixed-point firmware byte 6 may be reserved, in which case this
    /// reads as [`ProbeType::Unknown`] or an arbitrary type. The raw byte in
    /// [`probe_types`](Self::probe_types) is never altered by decoding.
    pub fn probe_type(&self, channel: Channel) -> ProbeType {
        ProbeType::from_nibble(nibble(self.probe_types, channel.index() as u8))
    }

    /// Replace the probe type recorded for one channel.
    pub fn set_probe_type(&mut self, channel: Channel, probe: ProbeType) {
        let mut nibbles = [nibble(self.probe_types, 0), nibble(self.probe_types, 1)];
        nibbles[channel.index()] = probe.to_nibble();
        self.probe_types = pack_nibbles(nibbles[0], nibbles[1]);
    }

    /// Check if a channel is enabled. Channel 1 always is.
    pub fn is_channel_enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::One => true,
            Channel::Two => self.channel_2_enabled,
        }
    }
}

/// Decode a Device Config payload.
///
/// Fails with [`DecodeError::Length`] unless `data` is exactly 7 bytes.
///
/// # Example
///
/// ```
/// use thermaq_rust_ble::data::{decode_device_config, Channel, ProbeType, TemperatureUnit};
///
/// let config = decode_device_config(&[0, 10, 0, 30, 0, 1, 0x21]).unwrap();
/// assert_eq!(config.unit, TemperatureUnit::Celsius);
/// assert_eq!(config.probe_type(Channel::One), ProbeType::Pluggable);
/// assert_eq!(config.probe_type(Channel::Two), ProbeType::FixedK);
/// ```
pub fn decode_device_config(data: &[u8]) -> Result<DeviceConfig, DecodeError> {
    DeviceConfig::parse(data)
}
