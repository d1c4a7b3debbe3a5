//! # Navigation states and transitions

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;
use std::fmt::Display;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// State of the navigation controller.
///
/// The `Dodge*` states form a linear sequence which drives a rectangle around an obstacle:
///
/// ```text
/// TurnAway -> PassSide -> TurnParallel -> PassLength -> TurnTowardLine -> FindLine -> Realign
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NavState {
    /// Following the course line, watching for markers and obstacles
    FollowLine,
    /// First zone marker
    PickupZone,
    /// Every later zone marker
    DropoffZone,
    DodgeTurnAway,
    /// Timed, drives past the width of the obstacle
    DodgePassSide,
    DodgeTurnParallel,
    /// Timed, drives past the length of the obstacle
    DodgePassLength,
    DodgeTurnTowardLine,
    /// Drives until the line is seen again
    DodgeFindLine,
    DodgeRealign,
    /// Terminal, the course end marker was reached
    Complete,
}

/// Result of a state's step function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Remain in the current state
    None,

    /// Move to the given state
    To(NavState),
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Start time of a timed dodge leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManeuverTimer {
    start_ms: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl NavState {
    /// True for the states which drive a leg of fixed duration.
    pub fn is_timed_leg(&self) -> bool {
        matches!(self, NavState::DodgePassSide | NavState::DodgePassLength)
    }

    /// True for any state of the dodge sequence.
    pub fn is_dodge(&self) -> bool {
        matches!(
            self,
            NavState::DodgeTurnAway
                | NavState::DodgePassSide
                | NavState::DodgeTurnParallel
                | NavState::DodgePassLength
                | NavState::DodgeTurnTowardLine
                | NavState::DodgeFindLine
                | NavState::DodgeRealign
        )
    }

    pub fn is_zone(&self) -> bool {
        matches!(self, NavState::PickupZone | NavState::DropoffZone)
    }
}

impl Display for NavState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavState::FollowLine => write!(f, "NavState::FollowLine"),
            NavState::PickupZone => write!(f, "NavState::PickupZone"),
            NavState::DropoffZone => write!(f, "NavState::DropoffZone"),
            NavState::DodgeTurnAway => write!(f, "NavState::DodgeTurnAway"),
            NavState::DodgePassSide => write!(f, "NavState::DodgePassSide"),
            NavState::DodgeTurnParallel => write!(f, "NavState::DodgeTurnParallel"),
            NavState::DodgePassLength => write!(f, "NavState::DodgePassLength"),
            NavState::DodgeTurnTowardLine => write!(f, "NavState::DodgeTurnTowardLine"),
            NavState::DodgeFindLine => write!(f, "NavState::DodgeFindLine"),
            NavState::DodgeRealign => write!(f, "NavState::DodgeRealign"),
            NavState::Complete => write!(f, "NavState::Complete"),
        }
    }
}

impl Transition {
    pub fn is_some(&self) -> bool {
        !matches!(self, Transition::None)
    }
}

impl ManeuverTimer {
    /// Start a timer at the given clock time.
    pub fn start(now_ms: u64) -> Self {
        Self { start_ms: now_ms }
    }

    /// Milliseconds since the timer was started.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_ms)
    }

    /// True once at least `duration_ms` has elapsed.
    pub fn is_elapsed(&self, now_ms: u64, duration_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= duration_ms
    }
}
