//! BLE communication module.
//!
//! Maps the thermometer's GATT characteristics to logical channels and
//! moves raw bytes to and from them over btleplug.

pub mod characteristics;
pub mod connection;
pub mod source;
pub mod uuids;

pub use characteristics::{CharacteristicHandler, NotificationEvent};
pub use connection::{ConnectionEvent, ConnectionManager, ConnectionState, ReconnectPolicy};
#[cfg(test)]
pub use source::MockCharacteristicSource;
pub use source::CharacteristicSource;
pub use uuids::{GattChannel, GATT_CHANNELS, NOTIFIABLE_CHANNELS};
