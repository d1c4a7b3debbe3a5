//! # NavCtrl Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use eqpt_if::drive::{Speed, TurnDir};
use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the navigation controller.
///
/// All durations are open loop calibrations, tied to the speed of the robot at the given PWM
/// values and to the footprint of the obstacle (approximately 9 cm x 9 cm). Missing fields in a
/// parameter file take their [`Default`] value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavCtrlParams {

    // ---- SPEEDS ----

    /// Speed used while following the line.
    pub follow_speed: Speed,

    /// Speed of the on-the-spot 90 degree turns.
    pub turn_speed: Speed,

    /// Speed of the timed legs of the dodge.
    pub dodge_speed: Speed,

    /// Speed while searching for the line at the end of a dodge.
    pub search_speed: Speed,

    // ---- TIMINGS ----

    /// Duration of a 90 degree turn at `turn_speed`.
    ///
    /// Units: milliseconds
    pub turn_90_ms: u64,

    /// Duration to drive past the width of the obstacle.
    ///
    /// Units: milliseconds
    pub dodge_side_ms: u64,

    /// Duration to drive past the length of the obstacle.
    ///
    /// Units: milliseconds
    pub dodge_length_ms: u64,

    /// Delay after each color sample while searching for the line.
    ///
    /// Units: milliseconds
    pub sensor_delay_ms: u64,

    /// Pause after every stop which ends a dodge leg, letting the robot settle.
    ///
    /// Units: milliseconds
    pub settle_ms: u64,

    /// Duration of the hold performed by the default zone handler.
    ///
    /// Units: milliseconds
    pub zone_hold_ms: u64,

    /// Search time after which a warning is logged that the line has not been found. The search
    /// carries on regardless.
    ///
    /// Units: milliseconds
    pub find_line_warn_ms: u64,

    // ---- OBSTACLES ----

    /// Distance below which an obstacle triggers a dodge.
    ///
    /// Units: centimetres
    pub obstacle_threshold_cm: f64,

    /// Side on which obstacles are passed.
    pub dodge_side: TurnDir,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for NavCtrlParams {
    fn default() -> Self {
        Self {
            follow_speed: 150,
            turn_speed: 120,
            dodge_speed: 140,
            search_speed: 100,
            turn_90_ms: 500,
            dodge_side_ms: 400,
            dodge_length_ms: 600,
            sensor_delay_ms: 30,
            settle_ms: 100,
            zone_hold_ms: 300,
            find_line_warn_ms: 5000,
            obstacle_threshold_cm: 15.0,
            dodge_side: TurnDir::Right,
        }
    }
}
