//! # Zone Handling Interface
//!
//! Pickup and dropoff zones are marked on the course. What the robot does inside a zone is left to
//! the [`ZoneHandler`]; the navigation controller only invokes it and waits for it to return.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::clock::Clock;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Action performed when the robot stops in a zone. Blocking.
pub trait ZoneHandler {
    fn handle(&mut self, action: ZoneAction, clock: &mut dyn Clock) -> Result<(), ZoneError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Placeholder handler which holds the robot still for a fixed time.
#[derive(Debug, Clone, Copy)]
pub struct HoldZoneHandler {
    pub hold_ms: u64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneAction {
    Pickup,
    Dropoff,
}

#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("Zone action {0} could not be completed: {1}")]
    ActionFailed(ZoneAction, String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Display for ZoneAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneAction::Pickup => write!(f, "pickup"),
            ZoneAction::Dropoff => write!(f, "dropoff"),
        }
    }
}

impl ZoneHandler for HoldZoneHandler {
    fn handle(&mut self, action: ZoneAction, clock: &mut dyn Clock) -> Result<(), ZoneError> {
        info!("No {} mechanism fitted, holding for {} ms", action, self.hold_ms);
        clock.delay_ms(self.hold_ms);
        Ok(())
    }
}
