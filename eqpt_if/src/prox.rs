//! # Proximity Sensor Interface
//!
//! Single shot distance measurement from a forward facing ultrasonic ranger.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Echo time for sound to travel one centimetre, in microseconds.
pub const US_PER_CM: f64 = 29.1;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A proximity sensor giving single shot distance readings.
pub trait ProxSensor {
    /// Take one distance measurement. A failed measurement (e.g. echo timeout) shall return a
    /// value which [`ProxSensor::is_valid_reading`] rejects.
    fn measure_distance_cm(&mut self) -> f64;

    /// Plausibility filter for a reading.
    fn is_valid_reading(&self, distance_cm: f64) -> bool;

    /// True if a valid reading places an object within `threshold_cm`.
    ///
    /// An invalid reading is reported as no object.
    fn is_object_within(&mut self, threshold_cm: f64) -> bool {
        let distance_cm = self.measure_distance_cm();
        self.is_valid_reading(distance_cm) && distance_cm <= threshold_cm
    }
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Range of distances a sensor can report reliably.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProxRange {
    pub min_cm: f64,
    pub max_cm: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ProxRange {
    /// True if the reading lies within the range, inclusive. NaN is never contained.
    pub fn contains(&self, distance_cm: f64) -> bool {
        distance_cm >= self.min_cm && distance_cm <= self.max_cm
    }
}

impl Default for ProxRange {
    /// Usable range of an HC-SR04 style ultrasonic ranger.
    fn default() -> Self {
        Self {
            min_cm: 2.0,
            max_cm: 400.0,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Convert a round trip echo time into a distance.
///
/// A timed out pulse is reported as 0 us and therefore maps to 0 cm.
pub fn echo_to_distance_cm(echo_us: f64) -> f64 {
    (echo_us / 2.0) / US_PER_CM
}

#[cfg(test)]
mod test {
    use super::*;

    struct Fixed {
        distance_cm: f64,
        range: ProxRange,
    }

    impl ProxSensor for Fixed {
        fn measure_distance_cm(&mut self) -> f64 {
            self.distance_cm
        }

        fn is_valid_reading(&self, distance_cm: f64) -> bool {
            self.range.contains(distance_cm)
        }
    }

    #[test]
    fn test_object_within() {
        let mut s = Fixed { distance_cm: 10.0, range: ProxRange::default() };
        assert!(s.is_object_within(15.0));
        assert!(s.is_object_within(10.0));
        assert!(!s.is_object_within(9.9));

        // Timed out reading is not an object, however small the distance
        s.distance_cm = 0.0;
        assert!(!s.is_object_within(15.0));

        s.distance_cm = std::f64::NAN;
        assert!(!s.is_object_within(15.0));

        // Beyond the sensor's range
        s.distance_cm = 500.0;
        assert!(!s.is_object_within(1000.0));
    }

    #[test]
    fn test_echo_conversion() {
        assert_eq!(echo_to_distance_cm(0.0), 0.0);
        assert!((echo_to_distance_cm(582.0) - 10.0).abs() < 1e-9);
        assert!((echo_to_distance_cm(2328.0) - 40.0).abs() < 1e-9);
    }
}
