//! # Line Correction Interface

use crate::{color::ColorLabel, drive::DriveActuator};

/// A line correction behaviour, stepped once per controller cycle while the robot follows the
/// course line.
///
/// Implementations take their own sensor readings and issue their own drive commands, and must
/// return without blocking.
pub trait LineFollow {
    /// Perform one correction step towards the line of the `target` color.
    fn follow_step(&mut self, target: ColorLabel, drive: &mut dyn DriveActuator);
}
