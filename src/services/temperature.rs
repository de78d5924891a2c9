//! Celsius to Fahrenheit and Kelvin conversion.

use crate::models::TemperatureReading;

/// Offset applied for Kelvin. Reported values use the whole-degree offset.
pub const KELVIN_OFFSET: f64 = 273.0;

/// Derive the Fahrenheit and Kelvin values for a Celsius temperature
pub fn convert(celsius: f64) -> TemperatureReading {
    TemperatureReading {
        celsius,
        fahrenheit: celsius * 1.8 + 32.0,
        kelvin: celsius + KELVIN_OFFSET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freezing_point() {
        let reading = convert(0.0);
        assert_eq!(reading.celsius, 0.0);
        assert_eq!(reading.fahrenheit, 32.0);
        assert_eq!(reading.kelvin, 273.0);
    }

    #[test]
    fn test_boiling_point() {
        let reading = convert(100.0);
        assert_eq!(reading.fahrenheit, 212.0);
        assert_eq!(reading.kelvin, 373.0);
    }

    #[test]
    fn test_negative_temperature() {
        let reading = convert(-40.0);
        assert!((reading.fahrenheit - -40.0).abs() < 1e-9);
        assert_eq!(reading.kelvin, 233.0);
    }
}
