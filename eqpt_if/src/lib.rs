//! # Equipment interface crate.
//!
//! Provides the interfaces of all equipment the navigation controller drives or samples: the
//! drive actuators, the proximity and color sensors, the line correction behaviour, the zone
//! handler and the clock.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Clock and blocking delays
pub mod clock;

/// Color classification labels and the classifier interface
pub mod color;

/// Drive actuator commands and interface
pub mod drive;

/// Line correction behaviour interface
pub mod line;

/// Proximity (ultrasonic) sensor interface
pub mod prox;

/// Pickup and dropoff zone handling
pub mod zone;
