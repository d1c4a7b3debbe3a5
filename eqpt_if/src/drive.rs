//! # Drive Actuator Interface
//!
//! The robot is a differential drive platform. Straight motion and stopping take effect
//! immediately and persist until the next command. Turns spin the robot on the spot and block the
//! caller for the whole turn duration; there is no way to cancel a turn once started.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// Motor speed as a PWM magnitude, 0 (stopped) to 255 (full speed).
pub type Speed = u8;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Directional drive primitives.
pub trait DriveActuator {
    /// Drive both motors forward at the given speed.
    fn forward(&mut self, speed: Speed);

    /// Drive both motors backward at the given speed.
    fn backward(&mut self, speed: Speed);

    /// Spin left on the spot for `duration_ms`. Blocking.
    fn turn_left(&mut self, speed: Speed, duration_ms: u64);

    /// Spin right on the spot for `duration_ms`. Blocking.
    fn turn_right(&mut self, speed: Speed, duration_ms: u64);

    /// Stop both motors.
    fn stop(&mut self);

    /// Spin in the given direction for `duration_ms`. Blocking.
    fn turn(&mut self, dir: TurnDir, speed: Speed, duration_ms: u64) {
        match dir {
            TurnDir::Left => self.turn_left(speed, duration_ms),
            TurnDir::Right => self.turn_right(speed, duration_ms),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Direction of an on-the-spot turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDir {
    Left,
    Right,
}

/// A single command issued to a [`DriveActuator`], as recorded by simulated or logging drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveCmd {
    Forward(Speed),
    Backward(Speed),
    Turn {
        dir: TurnDir,
        speed: Speed,
        duration_ms: u64,
    },
    Stop,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TurnDir {
    /// The mirror image of this direction.
    pub fn opposite(self) -> Self {
        match self {
            TurnDir::Left => TurnDir::Right,
            TurnDir::Right => TurnDir::Left,
        }
    }
}

impl DriveCmd {
    pub fn is_turn(&self) -> bool {
        matches!(self, DriveCmd::Turn { .. })
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, DriveCmd::Stop)
    }
}
