//! Standard Device Information and Battery Service values.

use tracing::debug;

use crate::error::DecodeError;
use crate::protocol::layout;
use crate::protocol::{PacketKind, PacketReader};

/// Decode a Device Information string.
///
/// Each byte maps to the character with the same code point, so any buffer
/// decodes. The thermometer only sends ASCII here.
///
/// # Example
///
/// ```
/// use thermaq_rust_ble::data::decode_text;
///
/// assert_eq!(decode_text(b"ETI Ltd"), "ETI Ltd");
/// ```
pub fn decode_text(data: &[u8]) -> String {
    data.iter().map(|&b| char::from(b)).collect()
}

/// Battery charge as reported by the Battery Level characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatteryLevel(pub u8);

impl BatteryLevel {
    /// Highest meaningful percentage.
    pub const MAX: u8 = 100;

    /// The raw percentage.
    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Check if the value is a plausible percentage.
    pub fn is_valid(&self) -> bool {
        self.0 <= Self::MAX
    }
}

impl std::fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Decode a Battery Level payload.
///
/// Fails with [`DecodeError::Length`] unless `data` is exactly 1 byte.
pub fn decode_battery_level(data: &[u8]) -> Result<BatteryLevel, DecodeError> {
    let reader = PacketReader::new(PacketKind::BatteryLevel, data);
    reader.require_exact(layout::BATTERY_LEVEL_LEN)?;
    let level = BatteryLevel(reader.read_u8(0)?);

    debug!("Parsed battery level: {}", level);

    Ok(level)
}

/// Device Information Service strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceInfo {
    /// Manufacturer name.
    pub manufacturer_name: String,
    /// Model number.
    pub model_number: String,
    /// Serial number.
    pub serial_number: String,
    /// Hardware revision.
    pub hardware_revision: String,
    /// Firmware revision.
    pub firmware_revision: String,
    /// Software revision.
    pub software_revision: String,
}
