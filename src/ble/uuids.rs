//! BLE Service and Characteristic UUIDs.
//!
//! Maps every characteristic the thermometer exposes to a [`GattChannel`]
//! and the packet kind its payload decodes as.

use uuid::Uuid;

use crate::data::Channel;
use crate::protocol::PacketKind;

// Device Information Service (Standard BLE)
/// Manufacturer Name characteristic UUID.
pub const MANUFACTURER_NAME_UUID: Uuid = Uuid::from_u128(0x0000_2a29_0000_1000_8000_00805f9b34fb);
/// Model Number characteristic UUID.
pub const MODEL_NUMBER_UUID: Uuid = Uuid::from_u128(0x0000_2a24_0000_1000_8000_00805f9b34fb);
/// Serial Number characteristic UUID.
pub const SERIAL_NUMBER_UUID: Uuid = Uuid::from_u128(0x0000_2a25_0000_1000_8000_00805f9b34fb);
/// Hardware Revision characteristic UUID.
pub const HARDWARE_REVISION_UUID: Uuid = Uuid::from_u128(0x0000_2a27_0000_1000_8000_00805f9b34fb);
/// Firmware Revision characteristic UUID.
pub const FIRMWARE_REVISION_UUID: Uuid = Uuid::from_u128(0x0000_2a26_0000_1000_8000_00805f9b34fb);
/// Software Revision characteristic UUID.
pub const SOFTWARE_REVISION_UUID: Uuid = Uuid::from_u128(0x0000_2a28_0000_1000_8000_00805f9b34fb);

// Battery Service (Standard BLE)
/// Battery Level characteristic UUID (Read, Notify).
pub const BATTERY_LEVEL_UUID: Uuid = Uuid::from_u128(0x0000_2a19_0000_1000_8000_00805f9b34fb);

// ThermaQ custom characteristics ("ETIBLUETHERM" prefix)
/// Channel 1 Data characteristic UUID (Read, Notify).
pub const CHANNEL_1_DATA_UUID: Uuid = Uuid::from_u128(0x4554_4942_4c55_4554_4845_524db87ad701);
/// Channel 2 Data characteristic UUID (Read, Notify).
pub const CHANNEL_2_DATA_UUID: Uuid = Uuid::from_u128(0x4554_4942_4c55_4554_4845_524db87ad703);
/// Commands/Notifications characteristic UUID (Read, Write, Notify).
pub const COMMANDS_NOTIFICATIONS_UUID: Uuid =
    Uuid::from_u128(0x4554_4942_4c55_4554_4845_524db87ad705);
/// Channel 1 Config characteristic UUID.
pub const CHANNEL_1_CONFIG_UUID: Uuid = Uuid::from_u128(0x4554_4942_4c55_4554_4845_524db87ad707);
/// Channel 2 Config characteristic UUID.
pub const CHANNEL_2_CONFIG_UUID: Uuid = Uuid::from_u128(0x4554_4942_4c55_4554_4845_524db87ad708);
/// Device Config characteristic UUID.
pub const DEVICE_CONFIG_UUID: Uuid = Uuid::from_u128(0x4554_4942_4c55_4554_4845_524db87ad709);
/// Trim characteristic UUID.
pub const TRIM_UUID: Uuid = Uuid::from_u128(0x4554_4942_4c55_4554_4845_524db87ad70a);

/// Logical characteristic on the thermometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GattChannel {
    /// Manufacturer Name string.
    ManufacturerName,
    /// Model Number string.
    ModelNumber,
    /// Serial Number string.
    SerialNumber,
    /// Hardware Revision string.
    HardwareRevision,
    /// Firmware Revision string.
    FirmwareRevision,
    /// Software Revision string.
    SoftwareRevision,
    /// Battery percentage.
    BatteryLevel,
    /// Channel 1 live temperature.
    Channel1Data,
    /// Channel 2 live temperature.
    Channel2Data,
    /// Command/notification byte pair.
    CommandsNotifications,
    /// Channel 1 alarms and name.
    Channel1Config,
    /// Channel 2 alarms and name.
    Channel2Config,
    /// Device settings.
    DeviceConfig,
    /// Calibration trim.
    Trim,
}

/// Every logical channel with its characteristic UUID.
pub const GATT_CHANNELS: [(GattChannel, Uuid); 14] = [
    (GattChannel::ManufacturerName, MANUFACTURER_NAME_UUID),
    (GattChannel::ModelNumber, MODEL_NUMBER_UUID),
    (GattChannel::SerialNumber, SERIAL_NUMBER_UUID),
    (GattChannel::HardwareRevision, HARDWARE_REVISION_UUID),
    (GattChannel::FirmwareRevision, FIRMWARE_REVISION_UUID),
    (GattChannel::SoftwareRevision, SOFTWARE_REVISION_UUID),
    (GattChannel::BatteryLevel, BATTERY_LEVEL_UUID),
    (GattChannel::Channel1Data, CHANNEL_1_DATA_UUID),
    (GattChannel::Channel2Data, CHANNEL_2_DATA_UUID),
    (GattChannel::CommandsNotifications, COMMANDS_NOTIFICATIONS_UUID),
    (GattChannel::Channel1Config, CHANNEL_1_CONFIG_UUID),
    (GattChannel::Channel2Config, CHANNEL_2_CONFIG_UUID),
    (GattChannel::DeviceConfig, DEVICE_CONFIG_UUID),
    (GattChannel::Trim, TRIM_UUID),
];

/// Channels the thermometer can push notifications on.
pub const NOTIFIABLE_CHANNELS: [GattChannel; 4] = [
    GattChannel::Channel1Data,
    GattChannel::Channel2Data,
    GattChannel::BatteryLevel,
    GattChannel::CommandsNotifications,
];

impl GattChannel {
    /// Characteristic UUID for this channel.
    pub fn uuid(&self) -> Uuid {
        match self {
            Self::ManufacturerName => MANUFACTURER_NAME_UUID,
            Self::ModelNumber => MODEL_NUMBER_UUID,
            Self::SerialNumber => SERIAL_NUMBER_UUID,
            Self::HardwareRevision => HARDWARE_REVISION_UUID,
            Self::FirmwareRevision => FIRMWARE_REVISION_UUID,
            Self::SoftwareRevision => SOFTWARE_REVISION_UUID,
            Self::BatteryLevel => BATTERY_LEVEL_UUID,
            Self::Channel1Data => CHANNEL_1_DATA_UUID,
            Self::Channel2Data => CHANNEL_2_DATA_UUID,
            Self::CommandsNotifications => COMMANDS_NOTIFICATIONS_UUID,
            Self::Channel1Config => CHANNEL_1_CONFIG_UUID,
            Self::Channel2Config => CHANNEL_2_CONFIG_UUID,
            Self::DeviceConfig => DEVICE_CONFIG_UUID,
            Self::Trim => TRIM_UUID,
        }
    }

    /// Look up the channel for a characteristic UUID.
    pub fn from_uuid(uuid: &Uuid) -> Option<Self> {
        GATT_CHANNELS
            .iter()
            .find(|(_, candidate)| candidate == uuid)
            .map(|(channel, _)| *channel)
    }

    /// Packet kind the channel's payload decodes as.
    pub fn packet_kind(&self) -> PacketKind {
        match self {
            Self::ManufacturerName
            | Self::ModelNumber
            | Self::SerialNumber
            | Self::HardwareRevision
            | Self::FirmwareRevision
            | Self::SoftwareRevision => PacketKind::Text,
            Self::BatteryLevel => PacketKind::BatteryLevel,
            Self::Channel1Data | Self::Channel2Data => PacketKind::Reading,
            Self::CommandsNotifications => PacketKind::CommandNotification,
            Self::Channel1Config | Self::Channel2Config => PacketKind::ChannelConfig,
            Self::DeviceConfig => PacketKind::DeviceConfig,
            Self::Trim => PacketKind::Trim,
        }
    }

    /// Measurement channel this characteristic belongs to, if any.
    pub fn channel(&self) -> Option<Channel> {
        match self {
            Self::Channel1Data | Self::Channel1Config => Some(Channel::One),
            Self::Channel2Data | Self::Channel2Config => Some(Channel::Two),
            _ => None,
        }
    }

    /// Data characteristic for a measurement channel.
    pub fn data(channel: Channel) -> Self {
        match channel {
            Channel::One => Self::Channel1Data,
            Channel::Two => Self::Channel2Data,
        }
    }

    /// Config characteristic for a measurement channel.
    pub fn config(channel: Channel) -> Self {
        match channel {
            Channel::One => Self::Channel1Config,
            Channel::Two => Self::Channel2Config,
        }
    }

    /// Check if the thermometer sends notifications on this channel.
    pub fn is_notifiable(&self) -> bool {
        NOTIFIABLE_CHANNELS.contains(self)
    }
}

impl std::fmt::Display for GattChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ManufacturerName => "Manufacturer Name",
            Self::ModelNumber => "Model Number",
            Self::SerialNumber => "Serial Number",
            Self::HardwareRevision => "Hardware Revision",
            Self::FirmwareRevision => "Firmware Revision",
            Self::SoftwareRevision => "Software Revision",
            Self::BatteryLevel => "Battery Level",
            Self::Channel1Data => "Channel 1 Data",
            Self::Channel2Data => "Channel 2 Data",
            Self::CommandsNotifications => "Commands/Notifications",
            Self::Channel1Config => "Channel 1 Config",
            Self::Channel2Config => "Channel 2 Config",
            Self::DeviceConfig => "Device Config",
            Self::Trim => "Trim",
        };
        f.write_str(name)
    }
}

/// Check if a characteristic UUID belongs to the thermometer's custom service.
pub fn is_thermaq_characteristic(uuid: &Uuid) -> bool {
    GattChannel::from_uuid(uuid).is_some_and(|channel| {
        !matches!(
            channel.packet_kind(),
            PacketKind::Text | PacketKind::BatteryLevel
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_format() {
        assert_eq!(
            CHANNEL_1_DATA_UUID.to_string(),
            "45544942-4c55-4554-4845-524db87ad701"
        );
        assert_eq!(
            CHANNEL_1_CONFIG_UUID,
            Uuid::parse_str("45544942-4C55-4554-4845-524DB87AD707").unwrap()
        );
        assert_eq!(
            BATTERY_LEVEL_UUID.to_string(),
            "00002a19-0000-1000-8000-00805f9b34fb"
        );
    }

    #[test]
    fn test_table_matches_uuid_method() {
        for (channel, uuid) in GATT_CHANNELS {
            assert_eq!(channel.uuid(), uuid, "{channel}");
            assert_eq!(GattChannel::from_uuid(&uuid), Some(channel));
        }
    }

    #[test]
    fn test_uuids_are_unique() {
        for (i, (_, a)) in GATT_CHANNELS.iter().enumerate() {
            for (_, b) in GATT_CHANNELS.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_unknown_uuid() {
        let device_info_service = Uuid::from_u128(0x0000_180a_0000_1000_8000_00805f9b34fb);
        assert_eq!(GattChannel::from_uuid(&device_info_service), None);
        assert_eq!(GattChannel::from_uuid(&Uuid::nil()), None);
    }

    #[test]
    fn test_channel_mapping() {
        assert_eq!(GattChannel::data(Channel::Two), GattChannel::Channel2Data);
        assert_eq!(GattChannel::config(Channel::One), GattChannel::Channel1Config);
        assert_eq!(GattChannel::Channel2Config.channel(), Some(Channel::Two));
        assert_eq!(GattChannel::Trim.channel(), None);
        assert_eq!(GattChannel::Trim.packet_kind(), PacketKind::Trim);
    }

    #[test]
    fn test_notifiable() {
        assert!(GattChannel::Channel1Data.is_notifiable());
        assert!(GattChannel::BatteryLevel.is_notifiable());
        assert!(!GattChannel::DeviceConfig.is_notifiable());
    }

    #[test]
    fn test_is_thermaq_characteristic() {
        assert!(is_thermaq_characteristic(&TRIM_UUID));
        assert!(!is_thermaq_characteristic(&BATTERY_LEVEL_UUID));
        assert!(!is_thermaq_characteristic(&Uuid::nil()));
    }
}
