//! Transport seam between the decoders and a BLE stack.

use async_trait::async_trait;

use crate::ble::uuids::GattChannel;
use crate::error::Result;

/// Raw byte access to the thermometer's characteristics by logical channel.
///
/// [`CharacteristicHandler`](crate::ble::CharacteristicHandler) implements
/// this over btleplug. Any other transport that can read and write byte
/// buffers can stand in for it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacteristicSource: Send + Sync {
    /// Read the current value of a characteristic.
    async fn read(&self, channel: GattChannel) -> Result<Vec<u8>>;

    /// Write a value to a characteristic.
    async fn write(&self, channel: GattChannel, data: &[u8]) -> Result<()>;

    /// Enable notifications on a characteristic.
    async fn subscribe(&self, channel: GattChannel) -> Result<()>;
}
