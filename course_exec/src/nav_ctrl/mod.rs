//! # Navigation Controller
//!
//! This module implements the [`NavCtrl`] state machine which drives the robot around the
//! obstacle course. The controller is stepped once per cycle by the host loop, and on each step it
//! samples the sensors itself, performs at most one state transition and issues the drive commands
//! for the current state.
//!
//! - `FollowLine` - The line correction behaviour keeps the robot on the red line. Each cycle the
//!   course end marker, zone markers and obstacles are checked, in that order.
//! - `PickupZone`, `DropoffZone` - The zone handler is invoked, then line following resumes.
//! - `Dodge*` - A rectangular path is driven around an obstacle, ending when the line is found
//!   again.
//! - `Complete` - The course is finished, the robot is held stopped.
//!
//! Turns, settle pauses and zone holds block the step they are issued in. Nothing is sensed while
//! they run.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod dodge;
mod follow;
mod params;
mod state;
pub mod tm;
mod zone;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use eqpt_if::{
    clock::Clock,
    color::{ColorClassifier, ColorLabel},
    drive::DriveActuator,
    line::LineFollow,
    prox::ProxSensor,
    zone::{HoldZoneHandler, ZoneAction, ZoneHandler},
};
use log::{debug, error, info};

pub use self::{
    params::NavCtrlParams,
    state::{ManeuverTimer, NavState, Transition},
    tm::NavTm,
    zone::ZoneCounter,
};
use self::dodge::LineSearch;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Color of the course line.
pub const LINE_COLOR: ColorLabel = ColorLabel::Red;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// All equipment the controller drives and samples directly.
pub trait Platform: DriveActuator + ProxSensor + ColorClassifier + Clock {}

impl<T> Platform for T where T: DriveActuator + ProxSensor + ColorClassifier + Clock {}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Navigation Controller
///
/// Owns the platform, the line correction behaviour and the zone handler, along with all state of
/// a course run. Nothing outside the controller can change its state.
pub struct NavCtrl<P: Platform> {
    params: NavCtrlParams,

    platform: P,

    line_follow: Box<dyn LineFollow>,

    zone_handler: Box<dyn ZoneHandler>,

    state: NavState,

    zone_counter: ZoneCounter,

    /// Start of the current timed dodge leg, only armed while in a timed leg.
    timer: Option<ManeuverTimer>,

    /// Progress of the line search, only set while in `DodgeFindLine`.
    search: Option<LineSearch>,

    /// Set once the completion banner has been logged.
    complete_reported: bool,

    tm: NavTm,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur in the navigation controller.
///
/// All of these are fatal to a course run: the robot is stopped and the controller is forced into
/// [`NavState::Complete`].
#[derive(Debug, thiserror::Error)]
pub enum NavCtrlError {
    #[error("Timed leg {0} is running without an armed maneuver timer")]
    ManeuverTimerNotArmed(NavState),

    #[error("Line search step in {0} has no search in progress")]
    LineSearchNotStarted(NavState),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<P: Platform> NavCtrl<P> {
    /// Create a new controller. Zones are handled by a [`HoldZoneHandler`] holding for
    /// `params.zone_hold_ms`.
    ///
    /// [`NavCtrl::setup`] must be called before the first step.
    pub fn new(params: NavCtrlParams, platform: P, line_follow: Box<dyn LineFollow>) -> Self {
        let zone_handler = Box::new(HoldZoneHandler {
            hold_ms: params.zone_hold_ms,
        });

        Self {
            params,
            platform,
            line_follow,
            zone_handler,
            state: NavState::FollowLine,
            zone_counter: ZoneCounter::default(),
            timer: None,
            search: None,
            complete_reported: false,
            tm: NavTm::default(),
        }
    }

    /// Replace the zone handler, e.g. with a gripper driver.
    pub fn with_zone_handler(mut self, zone_handler: Box<dyn ZoneHandler>) -> Self {
        self.zone_handler = zone_handler;
        self
    }

    /// Reset the controller for the start of a course run and stop the robot.
    pub fn setup(&mut self) {
        self.state = NavState::FollowLine;
        self.zone_counter = ZoneCounter::default();
        self.timer = None;
        self.search = None;
        self.complete_reported = false;
        self.tm = NavTm::default();

        self.platform.stop();

        info!("NavCtrl initialised, following the {} line", LINE_COLOR);
    }

    /// Perform one cycle of the controller.
    pub fn step(&mut self) {
        let out = match self.state {
            NavState::FollowLine => self.step_follow_line(),
            NavState::PickupZone => self.step_zone(ZoneAction::Pickup),
            NavState::DropoffZone => self.step_zone(ZoneAction::Dropoff),
            NavState::DodgeTurnAway => self.step_dodge_turn_away(),
            NavState::DodgePassSide => self.step_dodge_pass_side(),
            NavState::DodgeTurnParallel => self.step_dodge_turn_parallel(),
            NavState::DodgePassLength => self.step_dodge_pass_length(),
            NavState::DodgeTurnTowardLine => self.step_dodge_turn_toward_line(),
            NavState::DodgeFindLine => self.step_dodge_find_line(),
            NavState::DodgeRealign => self.step_dodge_realign(),
            NavState::Complete => self.step_complete(),
        };

        // Errors cannot be recovered from, stop and end the run rather than guess
        let transition = match out {
            Ok(t) => t,
            Err(e) => {
                error!("{}", e);
                self.platform.stop();
                Transition::To(NavState::Complete)
            }
        };

        if let Transition::To(next) = transition {
            self.transition_to(next);
        }

        self.tm.state = self.state;
        self.tm.zone_count = self.zone_counter.get();
        self.tm.complete = self.is_complete();
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn zone_count(&self) -> u32 {
        self.zone_counter.get()
    }

    pub fn is_complete(&self) -> bool {
        self.state == NavState::Complete
    }

    pub fn params(&self) -> &NavCtrlParams {
        &self.params
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access to the platform, for the host loop to feed simulated sensor data.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn get_tm(&self) -> NavTm {
        self.tm.clone()
    }

    /// Apply a state change. This is the only place `self.state` changes outside of `setup`.
    fn transition_to(&mut self, next: NavState) {
        info!("NavCtrl state change: {} -> {}", self.state, next);

        let now_ms = self.platform.now_ms();

        self.timer = match next.is_timed_leg() {
            true => Some(ManeuverTimer::start(now_ms)),
            false => None,
        };

        self.search = match next {
            NavState::DodgeFindLine => Some(LineSearch::start(now_ms)),
            _ => None,
        };

        if next == NavState::DodgeTurnAway {
            self.tm.num_obstacles_dodged += 1;
        }

        self.tm.num_transitions += 1;
        self.state = next;
    }

    /// The course is complete, hold the robot stopped.
    fn step_complete(&mut self) -> Result<Transition, NavCtrlError> {
        self.platform.stop();

        if !self.complete_reported {
            info!("=== OBSTACLE COURSE COMPLETE ===");
            self.complete_reported = true;
        }
        else {
            debug!("Course complete, holding stopped");
        }

        Ok(Transition::None)
    }
}
