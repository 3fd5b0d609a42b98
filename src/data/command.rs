//! Commands/Notifications characteristic.
//!
//! Reading returns two bytes: the last command index and a notification
//! code. Writing takes a command wire code, which is a different table from
//! the index the device reports back.

use tracing::debug;

use crate::error::{DecodeError, Error, Result};
use crate::protocol::layout;
use crate::protocol::{PacketKind, PacketReader};

/// Device command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Take a measurement (index 0, wire code 0x10).
    Measure,
    /// Flash the display to identify the device (index 1, wire code 0x20).
    Identify,
    /// Restore default settings (index 2, wire code 0x30).
    SetDefaults,
    /// Factory reset (index 3, wire code 0x40).
    FactoryReset,
    /// No command (any other index, wire code 0x00).
    #[default]
    None,
}

impl Command {
    /// Every command, in index order.
    pub const ALL: [Command; 5] = [
        Command::Measure,
        Command::Identify,
        Command::SetDefaults,
        Command::FactoryReset,
        Command::None,
    ];

    /// Create from the index the device reports.
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => Self::Measure,
            1 => Self::Identify,
            2 => Self::SetDefaults,
            3 => Self::FactoryReset,
            _ => Self::None,
        }
    }

    /// The outbound code written to trigger this command.
    pub fn wire_code(&self) -> u8 {
        match self {
            Self::Measure => 0x10,
            Self::Identify => 0x20,
            Self::SetDefaults => 0x30,
            Self::FactoryReset => 0x40,
            Self::None => 0x00,
        }
    }

    /// Create from an outbound wire code.
    pub fn from_wire_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.wire_code() == code)
    }

    /// Check if this is a real command.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Get a human-readable name for this command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Measure => "Measure",
            Self::Identify => "Identify",
            Self::SetDefaults => "Set Defaults",
            Self::FactoryReset => "Factory Reset",
            Self::None => "None",
        }
    }
}

/// Device notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Notification {
    /// Nothing to report (0).
    #[default]
    None = 0,
    /// A button on the device was pressed (1).
    ButtonPressed = 1,
    /// The device is shutting down (2).
    Shutdown = 2,
    /// A written setting was rejected (3).
    InvalidSetting = 3,
    /// A written command was rejected (4).
    InvalidCommand = 4,
    /// Internal communication error (5).
    CommunicationError = 5,
    /// Code 6, or any code outside the table.
    UnknownNotification = 6,
    /// Checkpoint (7).
    Checkpoint = 7,
    /// The device asks the client to re-read its characteristics (8).
    RequestRefresh = 8,
}

impl Notification {
    /// Create from raw byte value.
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::ButtonPressed,
            2 => Self::Shutdown,
            3 => Self::InvalidSetting,
            4 => Self::InvalidCommand,
            5 => Self::CommunicationError,
            7 => Self::Checkpoint,
            8 => Self::RequestRefresh,
            _ => Self::UnknownNotification,
        }
    }

    /// Convert to raw byte value.
    pub fn to_raw(&self) -> u8 {
        *self as u8
    }

    /// Check if this is a recognised notification.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::UnknownNotification)
    }

    /// Check if the device reported a rejected write or internal error.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSetting | Self::InvalidCommand | Self::CommunicationError
        )
    }

    /// Get a human-readable name for this notification.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::ButtonPressed => "Button Pressed",
            Self::Shutdown => "Shutdown",
            Self::InvalidSetting => "Invalid Setting",
            Self::InvalidCommand => "Invalid Command",
            Self::CommunicationError => "Communication Error",
            Self::UnknownNotification => "Unknown Notification",
            Self::Checkpoint => "Checkpoint",
            Self::RequestRefresh => "Request Refresh",
        }
    }
}

/// Decoded Commands/Notifications characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandNotification {
    /// Last command.
    pub command: Command,
    /// Current notification.
    pub notification: Notification,
    /// Raw command and notification bytes.
    pub raw: [u8; 2],
}

impl CommandNotification {
    /// Parse a Commands/Notifications payload.
    pub fn parse(data: &[u8]) -> std::result::Result<Self, DecodeError> {
        let reader = PacketReader::new(PacketKind::CommandNotification, data);
        reader.require_min(layout::COMMAND_NOTIFICATION_LEN)?;

        let command_byte = reader.read_u8(layout::COMMAND_OFFSET)?;
        let notification_byte = reader.read_u8(layout::NOTIFICATION_OFFSET)?;

        let parsed = Self {
            command: Command::from_raw(command_byte),
            notification: Notification::from_raw(notification_byte),
            raw: [command_byte, notification_byte],
        };

        debug!("Parsed command/notification: {:?}", parsed);

        Ok(parsed)
    }
}

/// Decode a Commands/Notifications payload.
///
/// Fails with [`DecodeError::Length`] if `data` is shorter than 2 bytes.
///
/// # Example
///
/// ```
/// use thermaq_rust_ble::data::{decode_command_notification, Command, Notification};
///
/// let decoded = decode_command_notification(&[0x00, 0x07]).unwrap();
/// assert_eq!(decoded.command, Command::Measure);
/// assert_eq!(decoded.notification, Notification::Checkpoint);
/// ```
pub fn decode_command_notification(
    data: &[u8],
) -> std::result::Result<CommandNotification, DecodeError> {
    CommandNotification::parse(data)
}

/// Encode a command for the write path.
///
/// The second byte is always zero.
pub fn encode_command(command: Command) -> [u8; layout::COMMAND_WRITE_MAX_LEN] {
    [command.wire_code(), 0x00]
}

/// Check an outbound command buffer and return the command it carries.
///
/// The buffer must be 1 or 2 bytes long and start with a known wire code.
pub fn validate_command_buffer(data: &[u8]) -> Result<Command> {
    if data.is_empty() || data.len() > layout::COMMAND_WRITE_MAX_LEN {
        return Err(Error::InvalidParameter {
            name: "command buffer length".to_string(),
            value: data.len().to_string(),
        });
    }

    Command::from_wire_code(data[0]).ok_or_else(|| Error::InvalidParameter {
        name: "command wire code".to_string(),
        value: format!("{:#04x}", data[0]),
    })
}
