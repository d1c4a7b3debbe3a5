//! # `FollowLine` state

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;

use super::{NavCtrl, NavCtrlError, NavState, Platform, Transition, LINE_COLOR};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<P: Platform> NavCtrl<P> {
    /// Follow the line, checking for (first match wins):
    ///
    /// 1. the course end marker,
    /// 2. a zone marker,
    /// 3. an obstacle within the detection threshold.
    ///
    /// Each check takes its own sensor reading. If nothing is found the line correction behaviour
    /// is stepped once.
    pub(super) fn step_follow_line(&mut self) -> Result<Transition, NavCtrlError> {
        if self.platform.is_black() {
            info!("Course end marker detected");
            self.platform.stop();
            return Ok(Transition::To(NavState::Complete));
        }

        if self.platform.is_blue() {
            self.platform.stop();
            let count = self.zone_counter.increment();
            info!("Zone marker detected (#{})", count);

            return Ok(Transition::To(self.zone_counter.zone_state()));
        }

        if self.platform.is_object_within(self.params.obstacle_threshold_cm) {
            info!(
                "Obstacle within {} cm, starting dodge",
                self.params.obstacle_threshold_cm
            );
            self.platform.stop();
            return Ok(Transition::To(NavState::DodgeTurnAway));
        }

        self.line_follow.follow_step(LINE_COLOR, &mut self.platform);

        Ok(Transition::None)
    }
}
