//! Connection and decoding settings.

use std::time::Duration;

use crate::protocol::ProtocolGeneration;

/// Settings for talking to a thermometer.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use thermaq_rust_ble::{ProtocolGeneration, ThermometerConfig};
///
/// let config = ThermometerConfig::default()
///     .with_generation(ProtocolGeneration::FixedPoint)
///     .with_connect_attempts(5)
///     .with_reconnect_delay(Duration::from_millis(500));
///
/// assert!(config.generation.is_fixed_point());
/// assert_eq!(config.connect_attempts, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThermometerConfig {
    /// Which wire encoding the device speaks.
    pub generation: ProtocolGeneration,
    /// Connection attempts before giving up when maintaining a connection.
    pub connect_attempts: u32,
    /// Pause between connection attempts.
    pub reconnect_delay: Duration,
    /// Upper bound on a single characteristic read or write.
    pub operation_timeout: Duration,
    /// Use acknowledged writes for commands.
    pub write_with_response: bool,
}

impl Default for ThermometerConfig {
    fn default() -> Self {
        Self {
            generation: ProtocolGeneration::default(),
            connect_attempts: 3,
            reconnect_delay: Duration::from_secs(1),
            operation_timeout: Duration::from_secs(10),
            write_with_response: true,
        }
    }
}

impl ThermometerConfig {
    /// Set the protocol generation.
    pub fn with_generation(mut self, generation: ProtocolGeneration) -> Self {
        self.generation = generation;
        self
    }

    /// Set the number of connection attempts. Zero is treated as one.
    pub fn with_connect_attempts(mut self, attempts: u32) -> Self {
        self.connect_attempts = attempts.max(1);
        self
    }

    /// Set the delay between connection attempts.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the per-operation timeout.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Choose acknowledged or unacknowledged command writes.
    pub fn with_write_with_response(mut self, with_response: bool) -> Self {
        self.write_with_response = with_response;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ThermometerConfig::default();
        assert_eq!(config.generation, ProtocolGeneration::Float);
        assert_eq!(config.connect_attempts, 3);
        assert_eq!(config.reconnect_delay, Duration::from_secs(1));
        assert!(config.write_with_response);
    }

    #[test]
    fn test_builders() {
        let config = ThermometerConfig::default()
            .with_connect_attempts(0)
            .with_operation_timeout(Duration::from_millis(250))
            .with_write_with_response(false);
        assert_eq!(config.connect_attempts, 1);
        assert_eq!(config.operation_timeout, Duration::from_millis(250));
        assert!(!config.write_with_response);
    }
}
