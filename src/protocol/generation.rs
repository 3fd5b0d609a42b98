//! Firmware protocol generations.

/// Wire-format generation of the thermometer firmware.
///
/// Chosen once per connection and passed to every decoder whose layout
/// depends on it (channel data and trim).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtocolGeneration {
    /// Temperatures are little-endian `f32` (NaN = no probe) and trim entries
    /// carry a day/month/year stamp.
    #[default]
    Float,
    /// Temperatures are big-endian `u32` in 1/32 degree steps
    /// (`0xFFFFFFFF` = sensor error) and trim stamps are opaque.
    FixedPoint,
}

impl ProtocolGeneration {
    /// Check if channel data is fixed-point.
    pub fn is_fixed_point(&self) -> bool {
        matches!(self, Self::FixedPoint)
    }

    /// Check if trim entries carry a calibration date.
    pub fn has_dated_trim(&self) -> bool {
        matches!(self, Self::Float)
    }

    /// Get a human-readable name for this generation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Float => "Float",
            Self::FixedPoint => "Fixed Point",
        }
    }
}

impl std::fmt::Display for ProtocolGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
