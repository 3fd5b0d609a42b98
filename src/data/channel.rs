//! Measurement channel identifiers.

/// One of the thermometer's two thermocouple inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    /// Channel 1, always enabled.
    One,
    /// Channel 2, enabled through Device Config.
    Two,
}

impl Channel {
    /// Both channels in order.
    pub const ALL: [Channel; 2] = [Channel::One, Channel::Two];

    /// Zero-based index (0 or 1).
    pub fn index(&self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// One-based channel number as printed on the device.
    pub fn number(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Channel {}", self.number())
    }
}
