//! Utility functions for the thermaq-rust-ble crate.

/// Extract a 4-bit field from a byte.
///
/// Nibble 0 is the low four bits, nibble 1 the high four bits. Any other
/// index returns 0.
///
/// # Example
///
/// ```
/// use thermaq_rust_ble::utils::nibble;
///
/// assert_eq!(nibble(0x21, 0), 1);
/// assert_eq!(nibble(0x21, 1), 2);
/// ```
#[inline]
pub fn nibble(byte: u8, index: u8) -> u8 {
    match index {
        0 => byte & 0x0F,
        1 => byte >> 4,
        _ => 0,
    }
}

/// Pack two 4-bit fields into a byte, low nibble first.
///
/// Bits above the fourth are discarded from each input.
#[inline]
pub fn pack_nibbles(low: u8, high: u8) -> u8 {
    (low & 0x0F) | ((high & 0x0F) << 4)
}

/// Convert Celsius to Fahrenheit.
///
/// # Example
///
/// ```
/// use thermaq_rust_ble::celsius_to_fahrenheit;
///
/// let fahrenheit = celsius_to_fahrenheit(100.0);
/// assert!((fahrenheit - 212.0).abs() < 0.001);
/// ```
#[inline]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert Fahrenheit to Celsius.
///
/// # Example
///
/// ```
/// use thermaq_rust_ble::fahrenheit_to_celsius;
///
/// let celsius = fahrenheit_to_celsius(212.0);
/// assert!((celsius - 100.0).abs() < 0.001);
/// ```
#[inline]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble() {
        assert_eq!(nibble(0x11, 0), 1);
        assert_eq!(nibble(0x11, 1), 1);
        assert_eq!(nibble(0xF0, 0), 0);
        assert_eq!(nibble(0xF0, 1), 0x0F);
        assert_eq!(nibble(0xAB, 2), 0);
    }

    #[test]
    fn test_pack_nibbles() {
        assert_eq!(pack_nibbles(1, 2), 0x21);
        assert_eq!(pack_nibbles(0x1F, 0x12), 0x2F);
        let byte = pack_nibbles(7, 9);
        assert_eq!((nibble(byte, 0), nibble(byte, 1)), (7, 9));
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert!((celsius_to_fahrenheit(0.0) - 32.0).abs() < 0.001);
        assert!((celsius_to_fahrenheit(100.0) - 212.0).abs() < 0.001);
        assert!((celsius_to_fahrenheit(-40.0) - (-40.0)).abs() < 0.001);
    }

    #[test]
    fn test_fahrenheit_to_celsius() {
        assert!((fahrenheit_to_celsius(32.0) - 0.0).abs() < 0.001);
        assert!((fahrenheit_to_celsius(212.0) - 100.0).abs() < 0.001);
    }
}
