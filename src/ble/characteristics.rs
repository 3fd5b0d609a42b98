//! GATT characteristic handling over btleplug.
//!
//! [`CharacteristicHandler`] resolves logical [`GattChannel`]s to discovered
//! btleplug characteristics and fans incoming notifications out to any
//! number of receivers.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{Characteristic, Peripheral as _, WriteType};
use btleplug::platform::Peripheral;
use bytes::Bytes;
use futures::stream::StreamExt;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, error, trace, warn};
use uuid::Uuid;

use crate::ble::source::CharacteristicSource;
use crate::ble::uuids::{is_thermaq_characteristic, GattChannel, GATT_CHANNELS};
use crate::error::{Error, Result};

/// Capacity of the notification fan-out channel.
const NOTIFICATION_CAPACITY: usize = 256;

/// Notification pushed by the thermometer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    /// UUID of the characteristic that sent the notification.
    pub characteristic_uuid: Uuid,
    /// The notification payload.
    pub data: Bytes,
}

impl NotificationEvent {
    /// Create an event for a known channel.
    pub fn new(channel: GattChannel, data: impl Into<Bytes>) -> Self {
        Self {
            characteristic_uuid: channel.uuid(),
            data: data.into(),
        }
    }

    /// Logical channel the notification came from, if recognised.
    pub fn channel(&self) -> Option<GattChannel> {
        GattChannel::from_uuid(&self.characteristic_uuid)
    }
}

/// Handler for the thermometer's GATT characteristics.
pub struct CharacteristicHandler {
    /// The peripheral to communicate with.
    peripheral: Peripheral,
    /// Discovered characteristics by UUID.
    characteristics: Arc<RwLock<HashMap<Uuid, Characteristic>>>,
    /// Fan-out for notification events.
    notification_tx: broadcast::Sender<NotificationEvent>,
    /// Whether the listener task should keep running.
    is_listening: Arc<RwLock<bool>>,
    /// Handle to the notification listener task.
    listener_handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
    /// Bound on a single read or write.
    operation_timeout: Duration,
    /// Write type used for writable characteristics.
    write_with_response: bool,
}

impl CharacteristicHandler {
    /// Create a handler for a connected peripheral.
    ///
    /// Services must be discovered and [`discover_characteristics`]
    /// called before any read or write.
    ///
    /// [`discover_characteristics`]: Self::discover_characteristics
    pub fn new(peripheral: Peripheral) -> Self {
        let (notification_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        Self {
            peripheral,
            characteristics: Arc::new(RwLock::new(HashMap::new())),
            notification_tx,
            is_listening: Arc::new(RwLock::new(false)),
            listener_handle: Arc::new(RwLock::new(None)),
            operation_timeout: Duration::from_secs(10),
            write_with_response: true,
        }
    }

    /// Set the per-operation timeout and write type.
    pub fn with_io_params(
        mut self,
        operation_timeout: Duration,
        write_with_response: bool,
    ) -> Self {
        self.operation_timeout = operation_timeout;
        self.write_with_response = write_with_response;
        self
    }

    /// Cache every characteristic from the peripheral's discovered services.
    pub async fn discover_characteristics(&self) -> Result<()> {
        let services = self.peripheral.services();

        let mut chars = self.characteristics.write();
        chars.clear();

        for service in services {
            for characteristic in service.characteristics {
                match GattChannel::from_uuid(&characteristic.uuid) {
                    Some(channel) => debug!(
                        "Found {} ({}) in service {}",
                        channel, characteristic.uuid, service.uuid
                    ),
                    None => trace!(
                        "Ignoring characteristic {} in service {}",
                        characteristic.uuid,
                        service.uuid
                    ),
                }
                chars.insert(characteristic.uuid, characteristic);
            }
        }

        if !chars.keys().any(is_thermaq_characteristic) {
            warn!("Peripheral exposes no ThermaQ characteristics");
        } else {
            let missing: Vec<GattChannel> = GATT_CHANNELS
                .iter()
                .filter(|(_, uuid)| !chars.contains_key(uuid))
                .map(|(channel, _)| *channel)
                .collect();
            if !missing.is_empty() {
                warn!("Thermometer is missing characteristics: {:?}", missing);
            }
        }

        debug!("Discovered {} characteristics", chars.len());

        Ok(())
    }

    /// Check if a channel's characteristic was discovered.
    pub fn has_channel(&self, channel: GattChannel) -> bool {
        self.characteristics.read().contains_key(&channel.uuid())
    }

    /// Get the peripheral.
    pub fn peripheral(&self) -> &Peripheral {
        &self.peripheral
    }

    fn characteristic(&self, channel: GattChannel) -> Result<Characteristic> {
        self.characteristics
            .read()
            .get(&channel.uuid())
            .cloned()
            .ok_or_else(|| Error::CharacteristicNotFound {
                uuid: channel.uuid().to_string(),
            })
    }

    async fn with_timeout<T, F>(&self, operation: String, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, btleplug::Error>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result.map_err(Error::Bluetooth),
            Err(_) => Err(Error::Timeout { operation }),
        }
    }

    /// Unsubscribe from a channel's notifications.
    pub async fn unsubscribe(&self, channel: GattChannel) -> Result<()> {
        let characteristic = self.characteristic(channel)?;

        self.with_timeout(
            format!("unsubscribe from {channel}"),
            self.peripheral.unsubscribe(&characteristic),
        )
        .await?;

        debug!("Unsubscribed from {}", channel);

        Ok(())
    }

    /// Start forwarding notifications to [`subscribe_notifications`] receivers.
    ///
    /// [`subscribe_notifications`]: Self::subscribe_notifications
    pub async fn start_notifications(&self) -> Result<()> {
        if *self.is_listening.read() {
            return Ok(());
        }

        let mut notifications = self.peripheral.notifications().await?;
        *self.is_listening.write() = true;

        let is_listening = self.is_listening.clone();
        let notification_tx = self.notification_tx.clone();

        let handle = tokio::spawn(async move {
            debug!("Notification listener started");

            while *is_listening.read() {
                tokio::select! {
                    next = notifications.next() => {
                        let Some(notification) = next else {
                            warn!("Notification stream ended");
                            break;
                        };

                        trace!(
                            "Notification from {}: {:02X?}",
                            notification.uuid,
                            notification.value
                        );

                        let event = NotificationEvent {
                            characteristic_uuid: notification.uuid,
                            data: Bytes::from(notification.value),
                        };

                        // No receivers is not an error; events are simply dropped.
                        let _ = notification_tx.send(event);
                    }
                    _ = tokio::time::sleep(Duration::from_millis(50)) => {}
                }
            }

            *is_listening.write() = false;
            debug!("Notification listener stopped");
        });

        *self.listener_handle.write() = Some(handle);

        Ok(())
    }

    /// Stop the notification listener and wait for it to exit.
    pub async fn stop_notifications(&self) {
        *self.is_listening.write() = false;

        let handle = self.listener_handle.write().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Notification listener panicked: {}", e);
            }
        }
    }

    /// Get a receiver for notification events.
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<NotificationEvent> {
        self.notification_tx.subscribe()
    }
}

#[async_trait]
impl CharacteristicSource for CharacteristicHandler {
    async fn read(&self, channel: GattChannel) -> Result<Vec<u8>> {
        let characteristic = self.characteristic(channel)?;

        let data = self
            .with_timeout(format!("read {channel}"), self.peripheral.read(&characteristic))
            .await?;

        trace!("Read {} bytes from {}: {:02X?}", data.len(), channel, data);

        Ok(data)
    }

    async fn write(&self, channel: GattChannel, data: &[u8]) -> Result<()> {
        let characteristic = self.characteristic(channel)?;

        let write_type = if self.write_with_response {
            WriteType::WithResponse
        } else {
            WriteType::WithoutResponse
        };

        self.with_timeout(
            format!("write {channel}"),
            self.peripheral.write(&characteristic, data, write_type),
        )
        .await?;

        trace!("Wrote {} bytes to {}: {:02X?}", data.len(), channel, data);

        Ok(())
    }

    async fn subscribe(&self, channel: GattChannel) -> Result<()> {
        let characteristic = self.characteristic(channel)?;

        debug!(
            "Subscribing to {}, properties: {:?}",
            channel, characteristic.properties
        );

        self.with_timeout(
            format!("subscribe to {channel}"),
            self.peripheral.subscribe(&characteristic),
        )
        .await?;

        debug!("Subscribed to {}", channel);

        Ok(())
    }
}

impl Drop for CharacteristicHandler {
    fn drop(&mut self) {
        *self.is_listening.write() = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::uuids::BATTERY_LEVEL_UUID;

    #[test]
    fn test_notification_event_channel() {
        let event = NotificationEvent::new(GattChannel::Channel2Data, vec![1, 2, 3, 4]);
        assert_eq!(event.channel(), Some(GattChannel::Channel2Data));
        assert_eq!(&event.data[..], &[1, 2, 3, 4]);

        let event = NotificationEvent {
            characteristic_uuid: BATTERY_LEVEL_UUID,
            data: Bytes::from_static(&[50]),
        };
        assert_eq!(event.channel(), Some(GattChannel::BatteryLevel));
    }

    #[test]
    fn test_unknown_notification_channel() {
        let event = NotificationEvent {
            characteristic_uuid: Uuid::nil(),
            data: Bytes::new(),
        };
        assert_eq!(event.channel(), None);
    }
}
