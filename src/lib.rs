// Allow unusual byte groupings for UUIDs which have standard format
#![allow(clippy::unusual_byte_groupings)]

//! # thermaq-rust-ble
//!
//! A Rust library for decoding the Bluetooth Low Energy characteristics of
//! ETI ThermaQ Blue two-channel thermometers.
//!
//! The decoders are pure functions from a byte buffer to a typed record and
//! never touch the radio. A thin btleplug adapter reads, writes and
//! subscribes to characteristics by logical channel and feeds the decoders.
//!
//! ## Features
//!
//! - **Device Config**: display unit, interval, auto power off, channel 2
//!   enable flag and fitted probe types
//! - **Channel Config**: high and low alarms plus the 12-byte channel name
//! - **Readings**: both protocol generations (f32 and 1/32 fixed-point),
//!   classified as value, no probe, sensor error or disabled
//! - **Trim**: per-channel calibration offsets with dated or opaque stamps
//! - **Commands**: decode command/notification pairs and encode commands
//!
//! ## Quick Start
//!
//! ```rust
//! use thermaq_rust_ble::data::{decode_reading, ChannelReading, ReadingStatus};
//! use thermaq_rust_ble::ProtocolGeneration;
//!
//! let raw = decode_reading(&21.5f32.to_le_bytes(), ProtocolGeneration::Float).unwrap();
//! let reading = ChannelReading::new(raw, true);
//! assert_eq!(reading.status(), ReadingStatus::Value(21.5));
//! ```
//!
//! Talking to a device goes through [`Thermometer`]:
//!
//! ```rust,no_run
//! use btleplug::platform::{Adapter, Peripheral};
//! use thermaq_rust_ble::{Result, Thermometer, ThermometerConfig};
//!
//! async fn report(adapter: &Adapter, peripheral: Peripheral) -> Result<()> {
//!     let config = ThermometerConfig::default();
//!     let thermometer = Thermometer::connect(adapter, peripheral, config).await?;
//!     let snapshot = thermometer.read_snapshot().await;
//!     if let Ok(reading) = &snapshot.channel_1_reading {
//!         println!("Channel 1: {}", reading.status());
//!     }
//!     thermometer.disconnect().await
//! }
//! ```
//!
//! ## Platform Notes
//!
//! ### Linux
//! Requires BlueZ. User may need to be in the `bluetooth` group.
//!
//! ### macOS
//! Requires Bluetooth permission for the host application.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for data types

// Public modules
pub mod ble;
pub mod config;
pub mod data;
pub mod error;
pub mod protocol;
pub mod thermometer;
pub mod utils;

// Re-exports for convenience
pub use config::ThermometerConfig;
pub use error::{DecodeError, Error, Result};
pub use thermometer::{Thermometer, ThermometerSnapshot, ThermometerUpdate};
pub use utils::{celsius_to_fahrenheit, fahrenheit_to_celsius};

// Re-export commonly used types from submodules
pub use ble::{
    CharacteristicHandler, CharacteristicSource, ConnectionEvent, ConnectionState, GattChannel,
    NotificationEvent,
};
pub use data::{
    Alarm, BatteryLevel, Channel, ChannelConfig, ChannelName, ChannelReading, Command,
    CommandNotification, DeviceConfig, DeviceInfo, Notification, ProbeType, ReadingStatus,
    TemperatureUnit, TrimConfig,
};
pub use protocol::{decode_packet, Packet, PacketKind, ProtocolGeneration};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        let _ = std::any::TypeId::of::<Thermometer>();
        let _ = std::any::TypeId::of::<ThermometerSnapshot>();
        let _ = std::any::TypeId::of::<Error>();
        let _ = std::any::TypeId::of::<DecodeError>();
        let _ = std::any::TypeId::of::<DeviceConfig>();
        let _ = std::any::TypeId::of::<ChannelConfig>();
        let _ = std::any::TypeId::of::<TrimConfig>();
        let _ = std::any::TypeId::of::<GattChannel>();
    }

    #[test]
    fn test_temperature_conversion() {
        assert!((celsius_to_fahrenheit(100.0) - 212.0).abs() < 0.001);
        assert!((fahrenheit_to_celsius(212.0) - 100.0).abs() < 0.001);
    }
}
