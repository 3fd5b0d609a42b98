//! Thermometer struct and methods.
//!
//! Ties the characteristic decoders to a [`CharacteristicSource`]: one call
//! reads and decodes every characteristic, and pushed notifications decode
//! against the last Device Config seen.

use std::sync::Arc;

use btleplug::platform::{Adapter, Peripheral};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::ble::characteristics::{CharacteristicHandler, NotificationEvent};
use crate::ble::connection::{ConnectionManager, ConnectionState, LinkState};
use crate::ble::source::CharacteristicSource;
use crate::ble::uuids::{GattChannel, NOTIFIABLE_CHANNELS};
use crate::config::ThermometerConfig;
use crate::data::{
    decode_battery_level, decode_channel_config_lossy, decode_command_notification,
    decode_device_config, decode_reading, decode_text, decode_trim, encode_command, BatteryLevel,
    Channel, ChannelConfig, ChannelReading, Command, CommandNotification, DeviceConfig,
    DeviceInfo, TrimConfig,
};
use crate::error::{Error, Result};
use crate::protocol::{decode_packet, Packet, ProtocolGeneration};

/// Every characteristic read in one pass.
///
/// Each field fails independently, so a bad Trim payload still leaves the
/// readings usable.
#[derive(Debug)]
pub struct ThermometerSnapshot {
    /// When the pass started.
    pub read_at: DateTime<Utc>,
    /// Encoding the payloads were decoded with.
    pub generation: ProtocolGeneration,
    /// Device Information strings.
    pub device_info: Result<DeviceInfo>,
    /// Battery percentage.
    pub battery: Result<BatteryLevel>,
    /// Device settings.
    pub device_config: Result<DeviceConfig>,
    /// Channel 1 alarms and name.
    pub channel_1_config: Result<ChannelConfig>,
    /// Channel 2 alarms and name.
    pub channel_2_config: Result<ChannelConfig>,
    /// Channel 1 temperature.
    pub channel_1_reading: Result<ChannelReading>,
    /// Channel 2 temperature, joined with the channel 2 enable flag.
    pub channel_2_reading: Result<ChannelReading>,
    /// Calibration trim.
    pub trim: Result<TrimConfig>,
    /// Last command and current notification.
    pub command_notification: Result<CommandNotification>,
}

impl ThermometerSnapshot {
    /// Config for a channel.
    pub fn channel_config(&self, channel: Channel) -> &Result<ChannelConfig> {
        match channel {
            Channel::One => &self.channel_1_config,
            Channel::Two => &self.channel_2_config,
        }
    }

    /// Reading for a channel.
    pub fn reading(&self, channel: Channel) -> &Result<ChannelReading> {
        match channel {
            Channel::One => &self.channel_1_reading,
            Channel::Two => &self.channel_2_reading,
        }
    }

    /// Number of characteristics that failed to read or decode.
    pub fn error_count(&self) -> usize {
        [
            self.device_info.is_err(),
            self.battery.is_err(),
            self.device_config.is_err(),
            self.channel_1_config.is_err(),
            self.channel_2_config.is_err(),
            self.channel_1_reading.is_err(),
            self.channel_2_reading.is_err(),
            self.trim.is_err(),
            self.command_notification.is_err(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }
}

/// A decoded notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ThermometerUpdate {
    /// New temperature on a channel.
    Reading {
        /// The channel the reading belongs to.
        channel: Channel,
        /// The reading, joined with the channel enable flag.
        reading: ChannelReading,
    },
    /// New battery percentage.
    Battery(BatteryLevel),
    /// The device reported a command or notification.
    CommandNotification(CommandNotification),
    /// Device settings changed.
    DeviceConfig(DeviceConfig),
    /// Any other characteristic.
    Other {
        /// The characteristic that notified.
        channel: GattChannel,
        /// Its decoded payload.
        packet: Packet,
    },
}

/// A ThermaQ Blue thermometer.
pub struct Thermometer<S = CharacteristicHandler> {
    source: S,
    config: ThermometerConfig,
    /// Last Device Config decoded from a read or notification.
    device_config: RwLock<Option<DeviceConfig>>,
    connection: Option<Arc<ConnectionManager>>,
    link: Option<LinkState>,
}

impl<S: CharacteristicSource> Thermometer<S> {
    /// Wrap a characteristic source.
    pub fn new(source: S, config: ThermometerConfig) -> Self {
        Self {
            source,
            config,
            device_config: RwLock::new(None),
            connection: None,
            link: None,
        }
    }

    /// The underlying characteristic source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The settings in use.
    pub fn config(&self) -> &ThermometerConfig {
        &self.config
    }

    /// The protocol generation payloads are decoded with.
    pub fn generation(&self) -> ProtocolGeneration {
        self.config.generation
    }

    /// The connection manager, when connected through btleplug.
    pub fn connection(&self) -> Option<&ConnectionManager> {
        self.connection.as_deref()
    }

    /// Current link state. A bare source with no manager counts as connected.
    pub fn connection_state(&self) -> ConnectionState {
        self.link
            .as_ref()
            .map_or(ConnectionState::Connected, LinkState::get)
    }

    /// The last Device Config decoded.
    pub fn cached_device_config(&self) -> Option<DeviceConfig> {
        *self.device_config.read()
    }

    /// Whether a channel is enabled according to the cached Device Config.
    ///
    /// Channel 2 counts as enabled until a Device Config has been decoded.
    pub fn is_channel_enabled(&self, channel: Channel) -> bool {
        self.device_config
            .read()
            .as_ref()
            .map_or(true, |config| config.is_channel_enabled(channel))
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connection_state().is_connected() {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    async fn read_raw(&self, channel: GattChannel) -> Result<Vec<u8>> {
        self.ensure_connected()?;
        self.source.read(channel).await
    }

    /// Read a characteristic and decode it by its packet kind.
    pub async fn read_packet(&self, channel: GattChannel) -> Result<Packet> {
        let data = self.read_raw(channel).await?;
        let packet = decode_packet(channel.packet_kind(), &data, self.generation())?;
        if let Packet::DeviceConfig(config) = &packet {
            *self.device_config.write() = Some(*config);
        }
        Ok(packet)
    }

    /// Read a Device Information string.
    pub async fn read_text(&self, channel: GattChannel) -> Result<String> {
        let data = self.read_raw(channel).await?;
        Ok(decode_text(&data))
    }

    /// Read all six Device Information strings.
    pub async fn read_device_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo {
            manufacturer_name: self.read_text(GattChannel::ManufacturerName).await?,
            model_number: self.read_text(GattChannel::ModelNumber).await?,
            serial_number: self.read_text(GattChannel::SerialNumber).await?,
            hardware_revision: self.read_text(GattChannel::HardwareRevision).await?,
            firmware_revision: self.read_text(GattChannel::FirmwareRevision).await?,
            software_revision: self.read_text(GattChannel::SoftwareRevision).await?,
        })
    }

    /// Read the battery percentage.
    pub async fn read_battery_level(&self) -> Result<BatteryLevel> {
        let data = self.read_raw(GattChannel::BatteryLevel).await?;
        Ok(decode_battery_level(&data)?)
    }

    /// Read Device Config and remember it for channel 2 classification.
    pub async fn read_device_config(&self) -> Result<DeviceConfig> {
        let data = self.read_raw(GattChannel::DeviceConfig).await?;
        let config = decode_device_config(&data)?;
        *self.device_config.write() = Some(config);
        Ok(config)
    }

    /// Read a channel's alarms and name.
    ///
    /// A name that is not valid UTF-8 is kept rather than failing the read.
    pub async fn read_channel_config(&self, channel: Channel) -> Result<ChannelConfig> {
        let data = self.read_raw(GattChannel::config(channel)).await?;
        Ok(decode_channel_config_lossy(&data)?)
    }

    /// Read a channel's temperature, joined with the cached enable flag.
    pub async fn read_reading(&self, channel: Channel) -> Result<ChannelReading> {
        self.read_reading_with(channel, self.is_channel_enabled(channel))
            .await
    }

    async fn read_reading_with(&self, channel: Channel, enabled: bool) -> Result<ChannelReading> {
        let data = self.read_raw(GattChannel::data(channel)).await?;
        let raw = decode_reading(&data, self.generation())?;
        Ok(ChannelReading::new(raw, enabled))
    }

    /// Read the calibration trim.
    pub async fn read_trim(&self) -> Result<TrimConfig> {
        let data = self.read_raw(GattChannel::Trim).await?;
        Ok(decode_trim(&data, self.generation())?)
    }

    /// Read the last command and current notification.
    pub async fn read_command_notification(&self) -> Result<CommandNotification> {
        let data = self.read_raw(GattChannel::CommandsNotifications).await?;
        Ok(decode_command_notification(&data)?)
    }

    /// Read and decode every characteristic.
    ///
    /// Device Config is read before the readings so channel 2 is classified
    /// against fresh settings. If Device Config fails, channel 2 is treated
    /// as enabled.
    pub async fn read_snapshot(&self) -> ThermometerSnapshot {
        let read_at = Utc::now();

        let device_info = self.read_device_info().await;
        let battery = self.read_battery_level().await;
        let device_config = self.read_device_config().await;

        let channel_2_enabled = match &device_config {
            Ok(config) => config.channel_2_enabled,
            Err(e) => {
                warn!("Device Config unavailable, assuming channel 2 enabled: {}", e);
                true
            }
        };

        let snapshot = ThermometerSnapshot {
            read_at,
            generation: self.generation(),
            device_info,
            battery,
            device_config,
            channel_1_config: self.read_channel_config(Channel::One).await,
            channel_2_config: self.read_channel_config(Channel::Two).await,
            channel_1_reading: self.read_reading_with(Channel::One, true).await,
            channel_2_reading: self
                .read_reading_with(Channel::Two, channel_2_enabled)
                .await,
            trim: self.read_trim().await,
            command_notification: self.read_command_notification().await,
        };

        debug!(
            "Snapshot complete with {} failed characteristic(s)",
            snapshot.error_count()
        );

        snapshot
    }

    /// Send a command to the Commands/Notifications characteristic.
    pub async fn send_command(&self, command: Command) -> Result<()> {
        if !command.is_known() {
            return Err(Error::InvalidParameter {
                name: "command".to_string(),
                value: command.name().to_string(),
            });
        }

        self.ensure_connected()?;

        let buffer = encode_command(command);
        info!("Sending {} command: {:02X?}", command.name(), buffer);

        self.source
            .write(GattChannel::CommandsNotifications, &buffer)
            .await
    }

    /// Enable notifications on every channel that supports them.
    pub async fn subscribe_live(&self) -> Result<()> {
        self.ensure_connected()?;

        for channel in NOTIFIABLE_CHANNELS {
            self.source.subscribe(channel).await?;
        }

        debug!("Subscribed to {} live channels", NOTIFIABLE_CHANNELS.len());

        Ok(())
    }

    /// Decode a pushed notification.
    ///
    /// Readings are joined with the cached Device Config. A Device Config
    /// notification replaces the cache.
    pub fn decode_notification(&self, event: &NotificationEvent) -> Result<ThermometerUpdate> {
        let channel = event
            .channel()
            .ok_or_else(|| Error::UnknownCharacteristic {
                uuid: event.characteristic_uuid.to_string(),
            })?;

        let update = match channel {
            GattChannel::Channel1Data => self.reading_update(Channel::One, &event.data)?,
            GattChannel::Channel2Data => self.reading_update(Channel::Two, &event.data)?,
            GattChannel::BatteryLevel => {
                ThermometerUpdate::Battery(decode_battery_level(&event.data)?)
            }
            GattChannel::CommandsNotifications => {
                ThermometerUpdate::CommandNotification(decode_command_notification(&event.data)?)
            }
            GattChannel::DeviceConfig => {
                let config = decode_device_config(&event.data)?;
                *self.device_config.write() = Some(config);
                ThermometerUpdate::DeviceConfig(config)
            }
            other => ThermometerUpdate::Other {
                channel: other,
                packet: decode_packet(other.packet_kind(), &event.data, self.generation())?,
            },
        };

        debug!("Notification from {}: {:?}", channel, update);

        Ok(update)
    }

    fn reading_update(&self, channel: Channel, data: &[u8]) -> Result<ThermometerUpdate> {
        let raw = decode_reading(data, self.generation())?;
        Ok(ThermometerUpdate::Reading {
            channel,
            reading: ChannelReading::new(raw, self.is_channel_enabled(channel)),
        })
    }
}

impl Thermometer<CharacteristicHandler> {
    /// Connect to a known peripheral and discover its characteristics.
    ///
    /// The link is maintained: when `adapter` reports the peripheral dropped,
    /// the connection is re-established with the configured retries. Call
    /// [`start_live`](Self::start_live) again once it reports `Connected`.
    pub async fn connect(
        adapter: &Adapter,
        peripheral: Peripheral,
        config: ThermometerConfig,
    ) -> Result<Self> {
        let connection = Arc::new(ConnectionManager::with_config(peripheral.clone(), &config));
        connection.connect(true).await?;
        ConnectionManager::watch_disconnections(&connection, adapter).await?;

        let handler = CharacteristicHandler::new(peripheral)
            .with_io_params(config.operation_timeout, config.write_with_response);
        handler.discover_characteristics().await?;

        info!("Thermometer ready ({} protocol)", config.generation);

        Ok(Self {
            source: handler,
            config,
            device_config: RwLock::new(None),
            link: Some(connection.link().clone()),
            connection: Some(connection),
        })
    }

    /// Subscribe to live channels and start forwarding notifications.
    ///
    /// Pass each received event to [`decode_notification`](Self::decode_notification).
    pub async fn start_live(&self) -> Result<broadcast::Receiver<NotificationEvent>> {
        self.subscribe_live().await?;
        let receiver = self.source.subscribe_notifications();
        self.source.start_notifications().await?;
        Ok(receiver)
    }

    /// Stop notifications and disconnect.
    pub async fn disconnect(&self) -> Result<()> {
        self.source.stop_notifications().await;

        match &self.connection {
            Some(connection) => connection.disconnect().await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::MockCharacteristicSource;
    use crate::data::{Alarm, Notification, ProbeType, ReadingStatus, TemperatureUnit};
    use crate::error::DecodeError;
    use crate::protocol::PacketKind;
    use pretty_assertions::assert_eq;
    use tokio_test::{assert_err, assert_ok};
    use uuid::Uuid;

    fn device_config_bytes(channel_2_enabled: bool) -> Vec<u8> {
        vec![0x00, 0x01, 0x00, 0x00, 30, u8::from(channel_2_enabled), 0x21]
    }

    fn channel_config_bytes(name: &[u8; 12]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&100.0f32.to_le_bytes());
        data.extend_from_slice(&f32::NAN.to_le_bytes());
        data.extend_from_slice(name);
        data
    }

    fn trim_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0.5f32.to_le_bytes());
        data.extend_from_slice(&[15, 6, 24]);
        data.extend_from_slice(&(-0.25f32).to_le_bytes());
        data.extend_from_slice(&[1, 1, 25]);
        data
    }

    fn payload(channel: GattChannel, channel_2_enabled: bool) -> Vec<u8> {
        match channel {
            GattChannel::ManufacturerName => b"ETI Ltd".to_vec(),
            GattChannel::ModelNumber => b"ThermaQ Blue".to_vec(),
            GattChannel::SerialNumber => b"12345678".to_vec(),
            GattChannel::HardwareRevision => b"2".to_vec(),
            GattChannel::FirmwareRevision => b"1.0.3".to_vec(),
            GattChannel::SoftwareRevision => b"1.0".to_vec(),
            GattChannel::BatteryLevel => vec![87],
            GattChannel::Channel1Data => 21.5f32.to_le_bytes().to_vec(),
            GattChannel::Channel2Data => 64.25f32.to_le_bytes().to_vec(),
            GattChannel::CommandsNotifications => vec![0x01, 0x00],
            GattChannel::Channel1Config => channel_config_bytes(b"Brisket     "),
            GattChannel::Channel2Config => channel_config_bytes(b"Oven\0\0\0\0\0\0\0\0"),
            GattChannel::DeviceConfig => device_config_bytes(channel_2_enabled),
            GattChannel::Trim => trim_bytes(),
        }
    }

    fn healthy_source(channel_2_enabled: bool) -> MockCharacteristicSource {
        let mut source = MockCharacteristicSource::new();
        source
            .expect_read()
            .returning(move |channel| Ok(payload(channel, channel_2_enabled)));
        source
    }

    #[tokio::test]
    async fn test_read_snapshot() {
        let thermometer = Thermometer::new(healthy_source(true), ThermometerConfig::default());

        let snapshot = thermometer.read_snapshot().await;
        assert_eq!(snapshot.error_count(), 0);
        assert_eq!(snapshot.generation, ProtocolGeneration::Float);

        let info = assert_ok!(snapshot.device_info.as_ref());
        assert_eq!(info.manufacturer_name, "ETI Ltd");
        assert_eq!(info.model_number, "ThermaQ Blue");

        assert_eq!(assert_ok!(snapshot.battery.as_ref()).percent(), 87);

        let config = assert_ok!(snapshot.device_config.as_ref());
        assert_eq!(config.unit, TemperatureUnit::Celsius);
        assert_eq!(config.probe_type(Channel::One), ProbeType::Pluggable);
        assert_eq!(config.probe_type(Channel::Two), ProbeType::FixedK);

        let ch1 = assert_ok!(snapshot.channel_config(Channel::One).as_ref());
        assert_eq!(ch1.alarm_high, Alarm::Threshold(100.0));
        assert_eq!(ch1.alarm_low, Alarm::Disabled);
        assert_eq!(ch1.name.trimmed(), Some("Brisket"));
        let ch2 = assert_ok!(snapshot.channel_config(Channel::Two).as_ref());
        assert_eq!(ch2.name.trimmed(), Some("Oven"));

        let reading = assert_ok!(snapshot.reading(Channel::One).as_ref());
        assert_eq!(reading.status(), ReadingStatus::Value(21.5));
        let reading = assert_ok!(snapshot.reading(Channel::Two).as_ref());
        assert_eq!(reading.status(), ReadingStatus::Value(64.25));

        let trim = assert_ok!(snapshot.trim.as_ref());
        assert_eq!(trim.channel_1.offset, 0.5);
        assert_eq!(trim.channel_2.offset, -0.25);

        let command = assert_ok!(snapshot.command_notification.as_ref());
        assert_eq!(command.command, Command::Identify);
        assert_eq!(command.notification, Notification::None);

        assert_eq!(thermometer.cached_device_config(), Some(*config));
    }

    #[tokio::test]
    async fn test_snapshot_channel_2_disabled() {
        let thermometer = Thermometer::new(healthy_source(false), ThermometerConfig::default());

        let snapshot = thermometer.read_snapshot().await;
        let reading = assert_ok!(snapshot.channel_2_reading.as_ref());
        assert_eq!(reading.status(), ReadingStatus::Disabled);
        assert!(!thermometer.is_channel_enabled(Channel::Two));
        assert!(thermometer.is_channel_enabled(Channel::One));
    }

    #[tokio::test]
    async fn test_snapshot_without_device_config() {
        let mut source = MockCharacteristicSource::new();
        source.expect_read().returning(|channel| match channel {
            GattChannel::DeviceConfig => Err(Error::CharacteristicNotFound {
                uuid: channel.uuid().to_string(),
            }),
            other => Ok(payload(other, false)),
        });
        let thermometer = Thermometer::new(source, ThermometerConfig::default());

        let snapshot = thermometer.read_snapshot().await;
        assert_eq!(snapshot.error_count(), 1);
        assert!(matches!(
            snapshot.device_config,
            Err(Error::CharacteristicNotFound { .. })
        ));

        let reading = assert_ok!(snapshot.channel_2_reading.as_ref());
        assert!(reading.enabled);
        assert_eq!(reading.value(), Some(64.25));
        assert_eq!(thermometer.cached_device_config(), None);
    }

    #[tokio::test]
    async fn test_snapshot_isolates_decode_failures() {
        let mut source = MockCharacteristicSource::new();
        source.expect_read().returning(|channel| match channel {
            GattChannel::Channel1Data => Ok(vec![0x00, 0x00, 0xAC]),
            GattChannel::Trim => Ok(vec![0; 13]),
            other => Ok(payload(other, true)),
        });
        let thermometer = Thermometer::new(source, ThermometerConfig::default());

        let snapshot = thermometer.read_snapshot().await;
        assert_eq!(snapshot.error_count(), 2);

        let err = assert_err!(snapshot.channel_1_reading.as_ref());
        assert_eq!(
            err.as_decode(),
            Some(&DecodeError::Length {
                packet: PacketKind::Reading,
                expected: 4,
                actual: 3
            })
        );
        assert!(snapshot.trim.is_err());
        assert!(snapshot.channel_2_reading.is_ok());
        assert!(snapshot.battery.is_ok());
    }

    #[tokio::test]
    async fn test_fixed_point_snapshot_readings() {
        let mut source = MockCharacteristicSource::new();
        source.expect_read().returning(|channel| match channel {
            GattChannel::Channel1Data => Ok(vec![0x00, 0x00, 0x02, 0xA8]),
            GattChannel::Channel2Data => Ok(vec![0xFF; 4]),
            other => Ok(payload(other, true)),
        });
        let config = ThermometerConfig::default().with_generation(ProtocolGeneration::FixedPoint);
        let thermometer = Thermometer::new(source, config);

        let snapshot = thermometer.read_snapshot().await;
        let reading = assert_ok!(snapshot.channel_1_reading.as_ref());
        assert_eq!(reading.value(), Some(21.25));
        let reading = assert_ok!(snapshot.channel_2_reading.as_ref());
        assert_eq!(reading.status(), ReadingStatus::SensorError);

        let trim = assert_ok!(snapshot.trim.as_ref());
        assert_eq!(trim.channel_1.stamp.date(), None);
    }

    #[tokio::test]
    async fn test_send_command() {
        let mut source = MockCharacteristicSource::new();
        source
            .expect_write()
            .withf(|channel, data| {
                *channel == GattChannel::CommandsNotifications && data.to_vec() == vec![0x20, 0x00]
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let thermometer = Thermometer::new(source, ThermometerConfig::default());

        assert_ok!(thermometer.send_command(Command::Identify).await);
    }

    #[tokio::test]
    async fn test_send_none_command_rejected() {
        let thermometer =
            Thermometer::new(MockCharacteristicSource::new(), ThermometerConfig::default());

        let err = assert_err!(thermometer.send_command(Command::None).await);
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[tokio::test]
    async fn test_subscribe_live() {
        let mut source = MockCharacteristicSource::new();
        source
            .expect_subscribe()
            .withf(|channel| channel.is_notifiable())
            .times(NOTIFIABLE_CHANNELS.len())
            .returning(|_| Ok(()));
        let thermometer = Thermometer::new(source, ThermometerConfig::default());

        assert_ok!(thermometer.subscribe_live().await);
    }

    #[tokio::test]
    async fn test_reads_rejected_after_link_loss() {
        let link = LinkState::new("thermometer".to_string());
        link.set_maintain(true);
        link.set(ConnectionState::Connected);
        let mut events = link.subscribe();

        let mut thermometer = Thermometer::new(healthy_source(true), ThermometerConfig::default());
        thermometer.link = Some(link.clone());
        assert_ok!(thermometer.read_battery_level().await);

        assert!(link.mark_lost());
        assert_eq!(thermometer.connection_state(), ConnectionState::Disconnected);
        assert_eq!(
            assert_ok!(events.try_recv()).state,
            ConnectionState::Disconnected
        );

        let err = assert_err!(thermometer.read_battery_level().await);
        assert!(matches!(err, Error::NotConnected));

        link.set(ConnectionState::Connected);
        assert_ok!(thermometer.read_battery_level().await);
    }

    #[test]
    fn test_bare_source_counts_as_connected() {
        let thermometer =
            Thermometer::new(MockCharacteristicSource::new(), ThermometerConfig::default());

        assert_eq!(thermometer.connection_state(), ConnectionState::Connected);
        assert!(thermometer.connection().is_none());
    }

    #[test]
    fn test_decode_reading_notification() {
        let thermometer =
            Thermometer::new(MockCharacteristicSource::new(), ThermometerConfig::default());
        let event =
            NotificationEvent::new(GattChannel::Channel2Data, 30.0f32.to_le_bytes().to_vec());

        // No Device Config seen yet, so channel 2 counts as enabled.
        let update = assert_ok!(thermometer.decode_notification(&event));
        assert_eq!(
            update,
            ThermometerUpdate::Reading {
                channel: Channel::Two,
                reading: ChannelReading::new(crate::data::RawReading::Float(30.0), true),
            }
        );

        let config_event =
            NotificationEvent::new(GattChannel::DeviceConfig, device_config_bytes(false));
        let update = assert_ok!(thermometer.decode_notification(&config_event));
        assert!(matches!(update, ThermometerUpdate::DeviceConfig(c) if !c.channel_2_enabled));

        match assert_ok!(thermometer.decode_notification(&event)) {
            ThermometerUpdate::Reading { channel, reading } => {
                assert_eq!(channel, Channel::Two);
                assert_eq!(reading.status(), ReadingStatus::Disabled);
            }
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[test]
    fn test_decode_other_notifications() {
        let thermometer =
            Thermometer::new(MockCharacteristicSource::new(), ThermometerConfig::default());

        let battery = NotificationEvent::new(GattChannel::BatteryLevel, vec![42]);
        let update = assert_ok!(thermometer.decode_notification(&battery));
        assert_eq!(update, ThermometerUpdate::Battery(BatteryLevel(42)));

        let update = assert_ok!(thermometer.decode_notification(&NotificationEvent::new(
            GattChannel::CommandsNotifications,
            vec![0x00, 0x01]
        )));
        match update {
            ThermometerUpdate::CommandNotification(c) => {
                assert_eq!(c.notification, Notification::ButtonPressed);
            }
            other => panic!("unexpected update: {other:?}"),
        }

        let update = assert_ok!(thermometer.decode_notification(&NotificationEvent::new(
            GattChannel::ModelNumber,
            b"ThermaQ".to_vec()
        )));
        assert_eq!(
            update,
            ThermometerUpdate::Other {
                channel: GattChannel::ModelNumber,
                packet: Packet::Text("ThermaQ".to_string()),
            }
        );
    }

    #[test]
    fn test_decode_notification_errors() {
        let thermometer =
            Thermometer::new(MockCharacteristicSource::new(), ThermometerConfig::default());

        let unknown = NotificationEvent {
            characteristic_uuid: Uuid::nil(),
            data: bytes::Bytes::from_static(&[1, 2]),
        };
        let err = assert_err!(thermometer.decode_notification(&unknown));
        assert!(matches!(err, Error::UnknownCharacteristic { .. }));

        let short = NotificationEvent::new(GattChannel::Channel1Data, vec![0x00]);
        let err = assert_err!(thermometer.decode_notification(&short));
        assert!(err.as_decode().is_some_and(|e| e.is_length_error()));
    }
}
