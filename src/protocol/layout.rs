//! Byte layouts of the ThermaQ characteristic payloads.
//!
//! All multi-byte fields are little-endian except the fixed-point
//! temperature reading, which the firmware sends big-endian.

use std::ops::Range;

// Device Config (7 bytes)
/// Device Config payload length.
pub const DEVICE_CONFIG_LEN: usize = 7;
/// Temperature unit (0 = °C, 1 = °F).
pub const UNIT_OFFSET: usize = 0;
/// Measurement interval in seconds.
pub const INTERVAL_OFFSET: usize = 1;
/// First reserved byte. Possibly emissivity.
pub const RESERVED_A_OFFSET: usize = 2;
/// Auto power off in minutes (0 = disabled).
pub const AUTO_POWER_OFF_OFFSET: usize = 3;
/// Second reserved byte.
pub const RESERVED_B_OFFSET: usize = 4;
/// Channel 2 enable flag.
pub const CHANNEL_2_ENABLED_OFFSET: usize = 5;
/// Packed probe types, channel 1 in the low nibble.
pub const PROBE_TYPES_OFFSET: usize = 6;

// Channel Config (20 bytes)
/// Channel Config payload length.
pub const CHANNEL_CONFIG_LEN: usize = 20;
/// High alarm threshold, f32.
pub const ALARM_HIGH_RANGE: Range<usize> = 0..4;
/// Low alarm threshold, f32.
pub const ALARM_LOW_RANGE: Range<usize> = 4..8;
/// Channel name text.
pub const NAME_RANGE: Range<usize> = 8..20;
/// Channel name field width.
pub const NAME_LEN: usize = 12;

// Channel Data (4 bytes)
/// Channel Data payload length.
pub const READING_LEN: usize = 4;
/// Fixed-point reading that signals a sensor fault.
pub const SENSOR_ERROR_SENTINEL: u32 = 0xFFFF_FFFF;
/// Fixed-point readings are in 1/32 degree steps.
pub const FIXED_POINT_SCALE: f64 = 32.0;

// Trim (14 bytes)
/// Trim payload length.
pub const TRIM_LEN: usize = 14;
/// Channel 1 trim offset, f32.
pub const TRIM_CHANNEL_1_OFFSET_RANGE: Range<usize> = 0..4;
/// Channel 1 trim stamp (date or opaque).
pub const TRIM_CHANNEL_1_STAMP_RANGE: Range<usize> = 4..7;
/// Channel 2 trim offset, f32.
pub const TRIM_CHANNEL_2_OFFSET_RANGE: Range<usize> = 7..11;
/// Channel 2 trim stamp (date or opaque).
pub const TRIM_CHANNEL_2_STAMP_RANGE: Range<usize> = 11..14;

// Commands / Notifications (2 bytes)
/// Commands/Notifications payload length.
pub const COMMAND_NOTIFICATION_LEN: usize = 2;
/// Command byte.
pub const COMMAND_OFFSET: usize = 0;
/// Notification byte.
pub const NOTIFICATION_OFFSET: usize = 1;
/// Largest buffer accepted on the command write path.
pub const COMMAND_WRITE_MAX_LEN: usize = 2;

// Battery Level (1 byte)
/// Battery Level payload length.
pub const BATTERY_LEVEL_LEN: usize = 1;
