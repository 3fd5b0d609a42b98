//! Error types for the thermaq-rust-ble crate.

use thiserror::Error;

use crate::protocol::PacketKind;

/// Failure to decode a single characteristic payload.
///
/// Decode errors are local to one buffer. Unknown enumeration values are not
/// errors; they resolve to an `Unknown`/`None` variant of the relevant type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer does not have the length the packet layout requires.
    #[error("{packet} packet has wrong length: expected {expected} bytes, got {actual}")]
    Length {
        /// The packet being decoded.
        packet: PacketKind,
        /// The length the layout requires (exact or minimum, per packet).
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },

    /// A text field does not hold valid UTF-8.
    #[error("{packet} packet has invalid text (valid up to byte {valid_up_to})")]
    Encoding {
        /// The packet being decoded.
        packet: PacketKind,
        /// Number of leading bytes of the field that were valid.
        valid_up_to: usize,
    },
}

impl DecodeError {
    /// The packet kind that failed to decode.
    pub fn packet(&self) -> PacketKind {
        match self {
            Self::Length { packet, .. } | Self::Encoding { packet, .. } => *packet,
        }
    }

    /// Check if this is a buffer length failure.
    pub fn is_length_error(&self) -> bool {
        matches!(self, Self::Length { .. })
    }

    /// Check if this is a text encoding failure.
    pub fn is_encoding_error(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }
}

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A characteristic payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Bluetooth-related error from the underlying BLE library.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// Operation requires a connection but the thermometer is not connected.
    #[error("Thermometer not connected")]
    NotConnected,

    /// Failed to establish a connection to the thermometer.
    #[error("Connection failed: {reason}")]
    ConnectionFailed {
        /// Description of why the connection failed.
        reason: String,
    },

    /// A characteristic read or write did not complete in time.
    #[error("Operation timed out: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
    },

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter {
        /// The name of the parameter.
        name: String,
        /// The invalid value that was provided.
        value: String,
    },

    /// Characteristic not found on the device.
    #[error("Characteristic not found: {uuid}")]
    CharacteristicNotFound {
        /// The UUID of the characteristic that was not found.
        uuid: String,
    },

    /// A notification arrived from a characteristic this crate does not know.
    #[error("Unknown characteristic: {uuid}")]
    UnknownCharacteristic {
        /// The UUID of the characteristic.
        uuid: String,
    },
}

impl Error {
    /// Get the decode error, if this is one.
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
