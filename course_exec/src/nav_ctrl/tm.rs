//! # Defines Telemetry Pack for Navigation

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use serde::Serialize;

use super::NavState;

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct NavTm {
    pub state: NavState,
    pub zone_count: u32,
    pub num_transitions: u64,
    pub num_obstacles_dodged: u32,
    pub complete: bool,
}

impl Default for NavTm {
    fn default() -> Self {
        Self {
            state: NavState::FollowLine,
            zone_count: 0,
            num_transitions: 0,
            num_obstacles_dodged: 0,
            complete: false,
        }
    }
}
