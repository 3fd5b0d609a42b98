//! Packet kinds and the single decode entry point.

use tracing::debug;

use crate::data::{
    decode_battery_level, decode_channel_config, decode_command_notification,
    decode_device_config, decode_reading, decode_text, decode_trim, BatteryLevel, ChannelConfig,
    CommandNotification, DeviceConfig, RawReading, TrimConfig,
};
use crate::error::DecodeError;
use crate::protocol::layout;
use crate::protocol::ProtocolGeneration;

/// How strictly a packet's length is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    /// The buffer must be exactly this long.
    Exact(usize),
    /// The buffer must be at least this long; trailing bytes are ignored.
    AtLeast(usize),
    /// Any length is accepted.
    Any,
}

impl LengthRule {
    /// Check a buffer length against this rule.
    pub fn accepts(&self, len: usize) -> bool {
        match *self {
            Self::Exact(n) => len == n,
            Self::AtLeast(n) => len >= n,
            Self::Any => true,
        }
    }

    /// The fixed length named by this rule, if any.
    pub fn fixed_len(&self) -> Option<usize> {
        match *self {
            Self::Exact(n) | Self::AtLeast(n) => Some(n),
            Self::Any => None,
        }
    }
}

/// The semantic kind of a characteristic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PacketKind {
    /// Device Config (unit, interval, power off, channel 2 enable, probe types).
    DeviceConfig,
    /// Per-channel alarm thresholds and name.
    ChannelConfig,
    /// Per-channel live temperature.
    Reading,
    /// Calibration trim for both channels.
    Trim,
    /// Command and notification byte pair.
    CommandNotification,
    /// Battery percentage.
    BatteryLevel,
    /// Device Information Service string.
    Text,
}

impl PacketKind {
    /// Length rule enforced when decoding this packet.
    pub fn length_rule(&self) -> LengthRule {
        match self {
            Self::DeviceConfig => LengthRule::Exact(layout::DEVICE_CONFIG_LEN),
            Self::ChannelConfig => LengthRule::AtLeast(layout::CHANNEL_CONFIG_LEN),
            Self::Reading => LengthRule::Exact(layout::READING_LEN),
            Self::Trim => LengthRule::Exact(layout::TRIM_LEN),
            Self::CommandNotification => LengthRule::AtLeast(layout::COMMAND_NOTIFICATION_LEN),
            Self::BatteryLevel => LengthRule::Exact(layout::BATTERY_LEVEL_LEN),
            Self::Text => LengthRule::Any,
        }
    }

    /// Nominal payload length, `None` for variable-length text.
    pub fn expected_len(&self) -> Option<usize> {
        self.length_rule().fixed_len()
    }

    /// Get a human-readable name for this packet kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeviceConfig => "Device Config",
            Self::ChannelConfig => "Channel Config",
            Self::Reading => "Channel Data",
            Self::Trim => "Trim",
            Self::CommandNotification => "Commands/Notifications",
            Self::BatteryLevel => "Battery Level",
            Self::Text => "Text",
        }
    }
}

impl std::fmt::Display for PacketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Packet {
    /// Decoded Device Config.
    DeviceConfig(DeviceConfig),
    /// Decoded Channel Config.
    ChannelConfig(ChannelConfig),
    /// Decoded Channel Data, not yet joined with the channel enable flag.
    Reading(RawReading),
    /// Decoded Trim.
    Trim(TrimConfig),
    /// Decoded command/notification pair.
    CommandNotification(CommandNotification),
    /// Decoded battery percentage.
    BatteryLevel(BatteryLevel),
    /// Decoded Device Information string.
    Text(String),
}

impl Packet {
    /// The kind of packet this was decoded from.
    pub fn kind(&self) -> PacketKind {
        match self {
            Self::DeviceConfig(_) => PacketKind::DeviceConfig,
            Self::ChannelConfig(_) => PacketKind::ChannelConfig,
            Self::Reading(_) => PacketKind::Reading,
            Self::Trim(_) => PacketKind::Trim,
            Self::CommandNotification(_) => PacketKind::CommandNotification,
            Self::BatteryLevel(_) => PacketKind::BatteryLevel,
            Self::Text(_) => PacketKind::Text,
        }
    }
}

/// Decode a buffer of a declared kind.
///
/// `generation` only affects [`PacketKind::Reading`] and [`PacketKind::Trim`].
///
/// # Example
///
/// ```
/// use thermaq_rust_ble::protocol::{decode_packet, Packet, PacketKind, ProtocolGeneration};
///
/// let packet = decode_packet(PacketKind::BatteryLevel, &[87], ProtocolGeneration::Float).unwrap();
/// assert!(matches!(packet, Packet::BatteryLevel(level) if level.percent() == 87));
/// ```
pub fn decode_packet(
    kind: PacketKind,
    data: &[u8],
    generation: ProtocolGeneration,
) -> Result<Packet, DecodeError> {
    debug!(
        "decode_packet: {} ({}) with {} bytes: {:02X?}",
        kind,
        generation,
        data.len(),
        data
    );

    let packet = match kind {
        PacketKind::DeviceConfig => Packet::DeviceConfig(decode_device_config(data)?),
        PacketKind::ChannelConfig => Packet::ChannelConfig(decode_channel_config(data)?),
        PacketKind::Reading => Packet::Reading(decode_reading(data, generation)?),
        PacketKind::Trim => Packet::Trim(decode_trim(data, generation)?),
        PacketKind::CommandNotification => {
            Packet::CommandNotification(decode_command_notification(data)?)
        }
        PacketKind::BatteryLevel => Packet::BatteryLevel(decode_battery_level(data)?),
        PacketKind::Text => Packet::Text(decode_text(data)),
    };

    Ok(packet)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [PacketKind; 7] = [
        PacketKind::DeviceConfig,
        PacketKind::ChannelConfig,
        PacketKind::Reading,
        PacketKind::Trim,
        PacketKind::CommandNotification,
        PacketKind::BatteryLevel,
        PacketKind::Text,
    ];

    #[test]
    fn test_expected_lengths() {
        assert_eq!(PacketKind::DeviceConfig.expected_len(), Some(7));
        assert_eq!(PacketKind::ChannelConfig.expected_len(), Some(20));
        assert_eq!(PacketKind::Reading.expected_len(), Some(4));
        assert_eq!(PacketKind::Trim.expected_len(), Some(14));
        assert_eq!(PacketKind::CommandNotification.expected_len(), Some(2));
        assert_eq!(PacketKind::BatteryLevel.expected_len(), Some(1));
        assert_eq!(PacketKind::Text.expected_len(), None);
    }

    #[test]
    fn test_one_short_fails_for_every_fixed_packet() {
        for generation in [ProtocolGeneration::Float, ProtocolGeneration::FixedPoint] {
            for kind in ALL_KINDS {
                let Some(len) = kind.expected_len() else {
                    continue;
                };
                let data = vec![0u8; len - 1];
                let err = decode_packet(kind, &data, generation).unwrap_err();
                assert_eq!(
                    err,
                    DecodeError::Length {
                        packet: kind,
                        expected: len,
                        actual: len - 1
                    },
                    "{kind} should reject {} bytes",
                    len - 1
                );
            }
        }
    }

    #[test]
    fn test_exact_length_decodes_for_every_packet() {
        for kind in ALL_KINDS {
            let data = vec![0u8; kind.expected_len().unwrap_or(5)];
            let packet = decode_packet(kind, &data, ProtocolGeneration::Float).unwrap();
            assert_eq!(packet.kind(), kind);
        }
    }

    #[test]
    fn test_length_rule_accepts() {
        assert!(LengthRule::Exact(7).accepts(7));
        assert!(!LengthRule::Exact(7).accepts(8));
        assert!(LengthRule::AtLeast(20).accepts(24));
        assert!(!LengthRule::AtLeast(20).accepts(19));
        assert!(LengthRule::Any.accepts(0));
    }

    #[test]
    fn test_reading_follows_generation() {
        let data = [0x00, 0x00, 0x0C, 0x80];
        let float = decode_packet(PacketKind::Reading, &data, ProtocolGeneration::Float).unwrap();
        let fixed =
            decode_packet(PacketKind::Reading, &data, ProtocolGeneration::FixedPoint).unwrap();
        assert!(matches!(float, Packet::Reading(RawReading::Float(_))));
        assert!(matches!(fixed, Packet::Reading(RawReading::Scaled(s)) if s.raw() == 3200));
    }
}
