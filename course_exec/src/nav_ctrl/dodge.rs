//! # Dodge states
//!
//! The dodge drives a rectangle around an obstacle sat on the line, passing it on the side given
//! by [`NavCtrlParams::dodge_side`](super::NavCtrlParams):
//!
//! 1. turn 90 degrees away from the line,
//! 2. drive past the width of the obstacle (timed),
//! 3. turn back parallel to the line,
//! 4. drive past the length of the obstacle (timed),
//! 5. turn 90 degrees towards the line,
//! 6. drive slowly until the line is seen,
//! 7. turn back onto the line's heading.
//!
//! The timed legs stand in for distance, so their durations are calibrated against the robot's
//! speed at `dodge_speed`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use eqpt_if::drive::TurnDir;
use log::{info, warn};

use super::{ManeuverTimer, NavCtrl, NavCtrlError, NavState, Platform, Transition};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Progress of the search for the line at the end of a dodge.
#[derive(Debug, Clone, Copy)]
pub(super) struct LineSearch {
    timer: ManeuverTimer,
    warned: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LineSearch {
    pub(super) fn start(now_ms: u64) -> Self {
        Self {
            timer: ManeuverTimer::start(now_ms),
            warned: false,
        }
    }
}

impl<P: Platform> NavCtrl<P> {
    pub(super) fn step_dodge_turn_away(&mut self) -> Result<Transition, NavCtrlError> {
        let dir = self.params.dodge_side;
        info!("Dodge: turning {:?} 90 degrees, away from the line", dir);

        Ok(self.dodge_turn(dir, NavState::DodgePassSide))
    }

    pub(super) fn step_dodge_pass_side(&mut self) -> Result<Transition, NavCtrlError> {
        let out = self.dodge_pass(self.params.dodge_side_ms, NavState::DodgeTurnParallel)?;

        if out.is_some() {
            info!("Dodge: cleared obstacle width");
        }

        Ok(out)
    }

    pub(super) fn step_dodge_turn_parallel(&mut self) -> Result<Transition, NavCtrlError> {
        let dir = self.params.dodge_side.opposite();
        info!("Dodge: turning {:?} 90 degrees, parallel to the line", dir);

        Ok(self.dodge_turn(dir, NavState::DodgePassLength))
    }

    pub(super) fn step_dodge_pass_length(&mut self) -> Result<Transition, NavCtrlError> {
        let out = self.dodge_pass(self.params.dodge_length_ms, NavState::DodgeTurnTowardLine)?;

        if out.is_some() {
            info!("Dodge: cleared obstacle length");
        }

        Ok(out)
    }

    pub(super) fn step_dodge_turn_toward_line(&mut self) -> Result<Transition, NavCtrlError> {
        let dir = self.params.dodge_side.opposite();
        info!("Dodge: turning {:?} 90 degrees, toward the line", dir);

        let out = self.dodge_turn(dir, NavState::DodgeFindLine);
        info!("Dodge: searching for the line");

        Ok(out)
    }

    /// Creep forward, sampling the color sensor once per step, until the line is found.
    ///
    /// There is no limit on how long the search may run.
    pub(super) fn step_dodge_find_line(&mut self) -> Result<Transition, NavCtrlError> {
        let mut search = self
            .search
            .ok_or(NavCtrlError::LineSearchNotStarted(self.state))?;

        self.platform.forward(self.params.search_speed);

        let out = if self.platform.is_red() {
            self.platform.stop();
            self.platform.delay_ms(self.params.settle_ms);
            info!(
                "Dodge: line found after {} ms",
                search.timer.elapsed_ms(self.platform.now_ms())
            );
            Transition::To(NavState::DodgeRealign)
        }
        else {
            let elapsed_ms = search.timer.elapsed_ms(self.platform.now_ms());
            if !search.warned && elapsed_ms >= self.params.find_line_warn_ms {
                warn!("Dodge: line not found after {} ms, still searching", elapsed_ms);
                search.warned = true;
                self.search = Some(search);
            }
            Transition::None
        };

        self.platform.delay_ms(self.params.sensor_delay_ms);

        Ok(out)
    }

    pub(super) fn step_dodge_realign(&mut self) -> Result<Transition, NavCtrlError> {
        let dir = self.params.dodge_side;
        info!("Dodge: turning {:?} 90 degrees, realigning with the line", dir);

        let out = self.dodge_turn(dir, NavState::FollowLine);
        info!("Dodge complete, resuming line follow");

        Ok(out)
    }

    /// Blocking 90 degree turn, followed by a stop and settle, always moving on to `next`.
    fn dodge_turn(&mut self, dir: TurnDir, next: NavState) -> Transition {
        self.platform
            .turn(dir, self.params.turn_speed, self.params.turn_90_ms);
        self.platform.stop();
        self.platform.delay_ms(self.params.settle_ms);

        Transition::To(next)
    }

    /// Drive forward until the current leg's timer reaches `leg_ms`, then stop and settle before
    /// moving on to `next`.
    fn dodge_pass(&mut self, leg_ms: u64, next: NavState) -> Result<Transition, NavCtrlError> {
        let timer = self
            .timer
            .ok_or(NavCtrlError::ManeuverTimerNotArmed(self.state))?;

        self.platform.forward(self.params.dodge_speed);

        if timer.is_elapsed(self.platform.now_ms(), leg_ms) {
            self.platform.stop();
            self.platform.delay_ms(self.params.settle_ms);
            Ok(Transition::To(next))
        }
        else {
            Ok(Transition::None)
        }
    }
}

#[cfg(test)]
mod test {
    use crate::nav_ctrl::{test_util::sim_ctrl, NavCtrl, NavCtrlParams, NavState};
    use crate::sim::{OpenLoopLineFollow, SimPlatform};
    use eqpt_if::{
        clock::Clock,
        color::ColorLabel,
        drive::{DriveCmd, TurnDir},
    };

    /// Step until the state changes, advancing the simulated clock by `cycle_ms` between steps.
    /// Returns the number of steps taken.
    fn step_until_change(ctrl: &mut NavCtrl<SimPlatform>, cycle_ms: u64, max_steps: usize) -> usize {
        let start = ctrl.state();
        for n in 1..=max_steps {
            ctrl.step();
            if ctrl.state() != start {
                return n;
            }
            ctrl.platform_mut().advance_ms(cycle_ms);
        }
        panic!("{} did not change state within {} steps", start, max_steps);
    }

    fn turn(dir: TurnDir) -> DriveCmd {
        DriveCmd::Turn {
            dir,
            speed: 120,
            duration_ms: 500,
        }
    }

    #[test]
    fn test_full_dodge_sequence() {
        let mut ctrl = sim_ctrl();
        ctrl.platform_mut().set_color(ColorLabel::White);
        ctrl.platform_mut().set_distance_cm(10.0);

        ctrl.step();
        assert_eq!(ctrl.state(), NavState::DodgeTurnAway);

        // Obstacle is no longer ahead once the robot has turned away
        ctrl.platform_mut().set_no_echo();
        let first_transition = ctrl.get_tm().num_transitions;

        let expected = [
            NavState::DodgePassSide,
            NavState::DodgeTurnParallel,
            NavState::DodgePassLength,
            NavState::DodgeTurnTowardLine,
            NavState::DodgeFindLine,
            NavState::DodgeRealign,
            NavState::FollowLine,
        ];

        let mut visited = Vec::new();
        while ctrl.state() != NavState::FollowLine {
            // Put the line under the sensor once the search starts
            if ctrl.state() == NavState::DodgeFindLine {
                ctrl.platform_mut().set_color(ColorLabel::Red);
            }
            step_until_change(&mut ctrl, 1000, 5);
            visited.push(ctrl.state());
        }

        assert_eq!(visited, expected);
        assert_eq!(ctrl.get_tm().num_transitions - first_transition, 7);
    }

    #[test]
    fn test_dodge_turn_pattern() {
        let mut ctrl = sim_ctrl();
        ctrl.platform_mut().set_distance_cm(10.0);
        ctrl.step();
        ctrl.platform_mut().set_no_echo();

        while ctrl.state() != NavState::FollowLine {
            if ctrl.state() == NavState::DodgeFindLine {
                ctrl.platform_mut().set_color(ColorLabel::Red);
            }
            ctrl.step();
            ctrl.platform_mut().advance_ms(1000);
        }

        let turns: Vec<DriveCmd> = ctrl
            .platform()
            .drive_cmds()
            .iter()
            .copied()
            .filter(|c| c.is_turn())
            .collect();

        assert_eq!(
            turns,
            vec![
                turn(TurnDir::Right),
                turn(TurnDir::Left),
                turn(TurnDir::Left),
                turn(TurnDir::Right),
            ]
        );
    }

    #[test]
    fn test_left_dodge_mirrors_turns() {
        let params = NavCtrlParams {
            dodge_side: TurnDir::Left,
            ..Default::default()
        };
        let line_follow = Box::new(OpenLoopLineFollow::new(params.follow_speed));
        let mut ctrl = NavCtrl::new(params, SimPlatform::default(), line_follow);
        ctrl.setup();

        ctrl.platform_mut().set_distance_cm(10.0);
        ctrl.step();
        ctrl.step();

        assert_eq!(ctrl.state(), NavState::DodgePassSide);
        assert!(ctrl.platform().drive_cmds().contains(&turn(TurnDir::Left)));
        assert!(!ctrl.platform().drive_cmds().contains(&turn(TurnDir::Right)));
    }

    #[test]
    fn test_turn_is_blocking_with_settle() {
        let mut ctrl = sim_ctrl();
        ctrl.platform_mut().set_distance_cm(10.0);
        ctrl.step();
        ctrl.platform_mut().clear_drive_log();

        let before_ms = ctrl.platform().now_ms();
        ctrl.step();

        // 500 ms turn, then 100 ms settle
        assert_eq!(ctrl.platform().now_ms() - before_ms, 600);
        assert_eq!(
            ctrl.platform().drive_cmds(),
            &[turn(TurnDir::Right), DriveCmd::Stop]
        );
    }

    #[test]
    fn test_pass_side_waits_for_timer() {
        let mut ctrl = sim_ctrl();
        ctrl.platform_mut().set_distance_cm(10.0);
        ctrl.step();
        ctrl.step();
        assert_eq!(ctrl.state(), NavState::DodgePassSide);
        ctrl.platform_mut().clear_drive_log();

        // 400 ms leg stepped every 100 ms: four driving steps, the fifth completes it
        let steps = step_until_change(&mut ctrl, 100, 10);
        assert_eq!(steps, 5);
        assert_eq!(ctrl.state(), NavState::DodgeTurnParallel);

        let cmds = ctrl.platform().drive_cmds();
        assert_eq!(cmds.len(), 6);
        assert!(cmds[..5].iter().all(|c| *c == DriveCmd::Forward(140)));
        assert_eq!(cmds[5], DriveCmd::Stop);
    }

    #[test]
    fn test_pass_length_rearms_timer() {
        let mut ctrl = sim_ctrl();
        ctrl.platform_mut().set_distance_cm(10.0);
        ctrl.step();
        ctrl.platform_mut().set_no_echo();

        // Turn away, pass side in one long step, turn parallel
        ctrl.step();
        ctrl.platform_mut().advance_ms(400);
        ctrl.step();
        ctrl.step();
        assert_eq!(ctrl.state(), NavState::DodgePassLength);

        // The length leg is timed from its own start, not the side leg's
        let steps = step_until_change(&mut ctrl, 100, 20);
        assert_eq!(steps, 7);
    }

    #[test]
    fn test_find_line_never_times_out() {
        let mut ctrl = sim_ctrl();
        ctrl.platform_mut().set_distance_cm(10.0);
        ctrl.step();
        ctrl.platform_mut().set_no_echo();
        ctrl.platform_mut().set_color(ColorLabel::White);

        while ctrl.state() != NavState::DodgeFindLine {
            ctrl.step();
            ctrl.platform_mut().advance_ms(1000);
        }

        // Ten simulated minutes without a line
        for _ in 0..600 {
            ctrl.step();
            ctrl.platform_mut().advance_ms(1000);
            assert_eq!(ctrl.state(), NavState::DodgeFindLine);
        }

        assert_eq!(ctrl.platform().drive_cmds().last(), Some(&DriveCmd::Forward(100)));

        // Zone and end markers are ignored while searching
        ctrl.platform_mut().set_color(ColorLabel::Black);
        ctrl.step();
        assert_eq!(ctrl.state(), NavState::DodgeFindLine);

        ctrl.platform_mut().set_color(ColorLabel::Red);
        ctrl.step();
        assert_eq!(ctrl.state(), NavState::DodgeRealign);
    }

    #[test]
    fn test_find_line_sensor_delay() {
        let mut ctrl = sim_ctrl();
        ctrl.platform_mut().set_distance_cm(10.0);
        ctrl.step();
        ctrl.platform_mut().set_no_echo();

        while ctrl.state() != NavState::DodgeFindLine {
            ctrl.step();
            ctrl.platform_mut().advance_ms(1000);
        }

        let before_ms = ctrl.platform().now_ms();
        ctrl.step();
        assert_eq!(ctrl.platform().now_ms() - before_ms, 30);

        // Found: stop, settle, then the sample delay
        ctrl.platform_mut().set_color(ColorLabel::Red);
        let before_ms = ctrl.platform().now_ms();
        ctrl.step();
        assert_eq!(ctrl.platform().now_ms() - before_ms, 130);
    }
}
