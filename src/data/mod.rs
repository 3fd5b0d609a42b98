//! Data structures for thermometer characteristics.
//!
//! Each module owns one characteristic: its decoded record type and the
//! pure `decode_*` function that builds it from a byte buffer.

pub mod channel;
pub mod channel_config;
pub mod command;
pub mod device_config;
pub mod device_info;
pub mod reading;
pub mod trim;

pub use channel::Channel;
pub use channel_config::{
    decode_channel_config, decode_channel_config_lossy, Alarm, ChannelConfig, ChannelName,
};
pub use command::{
    decode_command_notification, encode_command, validate_command_buffer, Command,
    CommandNotification, Notification,
};
pub use device_config::{decode_device_config, DeviceConfig, ProbeType, TemperatureUnit};
pub use device_info::{decode_battery_level, decode_text, BatteryLevel, DeviceInfo};
pub use reading::{
    classify_reading, decode_reading, decode_reading_f32, decode_reading_u32_scaled,
    ChannelReading, RawReading, ReadingStatus, ScaledReading,
};
pub use trim::{decode_trim, ChannelTrim, TrimConfig, TrimDate, TrimStamp};
