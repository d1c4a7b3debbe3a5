//! # Simulation
//!
//! A simulated robot for running the navigation controller without hardware. The world is not
//! modelled; instead sensor readings are set directly, either by tests or by a [`CourseScript`]
//! replayed against the simulated clock.
//!
//! Simulated time only moves when the controller blocks (turns, delays) or when the host loop
//! calls [`SimPlatform::advance_ms`].

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod script;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use eqpt_if::{
    clock::Clock,
    color::{ColorClassifier, ColorLabel},
    drive::{DriveActuator, DriveCmd, Speed, TurnDir},
    line::LineFollow,
    prox::{echo_to_distance_cm, ProxRange, ProxSensor},
};
use log::{debug, trace};

use crate::nav_ctrl::NavCtrl;

pub use self::script::{CourseScript, PendingEvents, ScriptError, SimEvent};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated platform implementing all of the controller's equipment.
#[derive(Debug, Clone)]
pub struct SimPlatform {
    now_ms: u64,

    color: ColorLabel,

    /// Distance to the nearest object, or `None` if no echo would return.
    distance_cm: Option<f64>,

    range: ProxRange,

    drive_cmds: Vec<DriveCmd>,

    color_reads: u64,
}

/// Line correction without line sensors: drives straight ahead at a fixed speed.
#[derive(Debug, Clone, Copy)]
pub struct OpenLoopLineFollow {
    speed: Speed,
}

/// What happened during one simulated host cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Number of script events applied before stepping.
    pub num_events: usize,

    /// True if the script has no more events.
    pub end_of_script: bool,

    /// Simulated time spent blocked inside the controller step.
    ///
    /// Units: milliseconds
    pub blocked_ms: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimPlatform {
    pub fn new(range: ProxRange) -> Self {
        Self {
            now_ms: 0,
            color: ColorLabel::None,
            distance_cm: None,
            range,
            drive_cmds: Vec::new(),
            color_reads: 0,
        }
    }

    /// Let simulated time pass.
    pub fn advance_ms(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    pub fn set_color(&mut self, color: ColorLabel) {
        self.color = color;
    }

    pub fn set_distance_cm(&mut self, distance_cm: f64) {
        self.distance_cm = Some(distance_cm);
    }

    /// Nothing in front of the sensor, so every measurement times out.
    pub fn set_no_echo(&mut self) {
        self.distance_cm = None;
    }

    /// Apply a scripted event to the sensor readings.
    pub fn apply_event(&mut self, event: &SimEvent) {
        debug!("Sim event at {} ms: {:?}", self.now_ms, event);

        match *event {
            SimEvent::Color(c) => self.set_color(c),
            SimEvent::DistanceCm(d) => self.set_distance_cm(d),
            SimEvent::NoEcho => self.set_no_echo(),
        }
    }

    /// All drive commands issued since creation or the last [`SimPlatform::clear_drive_log`].
    pub fn drive_cmds(&self) -> &[DriveCmd] {
        &self.drive_cmds
    }

    pub fn count_cmds<F>(&self, pred: F) -> usize
    where
        F: Fn(&DriveCmd) -> bool,
    {
        self.drive_cmds.iter().filter(|c| pred(*c)).count()
    }

    pub fn clear_drive_log(&mut self) {
        self.drive_cmds.clear();
    }

    /// Number of color classifications performed.
    pub fn color_reads(&self) -> u64 {
        self.color_reads
    }

    fn record(&mut self, cmd: DriveCmd) {
        trace!("Sim drive at {} ms: {:?}", self.now_ms, cmd);
        self.drive_cmds.push(cmd);
    }
}

impl Default for SimPlatform {
    fn default() -> Self {
        Self::new(ProxRange::default())
    }
}

impl Clock for SimPlatform {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn delay_ms(&mut self, ms: u64) {
        self.advance_ms(ms)
    }
}

impl DriveActuator for SimPlatform {
    fn forward(&mut self, speed: Speed) {
        self.record(DriveCmd::Forward(speed))
    }

    fn backward(&mut self, speed: Speed) {
        self.record(DriveCmd::Backward(speed))
    }

    fn turn_left(&mut self, speed: Speed, duration_ms: u64) {
        self.record(DriveCmd::Turn {
            dir: TurnDir::Left,
            speed,
            duration_ms,
        });
        self.advance_ms(duration_ms);
    }

    fn turn_right(&mut self, speed: Speed, duration_ms: u64) {
        self.record(DriveCmd::Turn {
            dir: TurnDir::Right,
            speed,
            duration_ms,
        });
        self.advance_ms(duration_ms);
    }

    fn stop(&mut self) {
        self.record(DriveCmd::Stop)
    }
}

impl ProxSensor for SimPlatform {
    fn measure_distance_cm(&mut self) -> f64 {
        match self.distance_cm {
            Some(d) => d,
            // A missing echo reads as a zero length pulse
            None => echo_to_distance_cm(0.0),
        }
    }

    fn is_valid_reading(&self, distance_cm: f64) -> bool {
        self.range.contains(distance_cm)
    }
}

impl ColorClassifier for SimPlatform {
    fn dominant_color(&mut self) -> ColorLabel {
        self.color_reads += 1;
        self.color
    }
}

impl OpenLoopLineFollow {
    pub fn new(speed: Speed) -> Self {
        Self { speed }
    }
}

impl LineFollow for OpenLoopLineFollow {
    fn follow_step(&mut self, _target: ColorLabel, drive: &mut dyn DriveActuator) {
        drive.forward(self.speed)
    }
}

/// Run one host cycle against a script: apply the events that are due, then step the controller.
pub fn run_cycle(ctrl: &mut NavCtrl<SimPlatform>, script: &mut CourseScript) -> CycleReport {
    let mut report = CycleReport::default();

    match script.pending_events(ctrl.platform().now_ms()) {
        PendingEvents::None => (),
        PendingEvents::Some(events) => {
            report.num_events = events.len();
            for e in events.iter() {
                ctrl.platform_mut().apply_event(e);
            }
        }
        PendingEvents::EndOfScript => report.end_of_script = true,
    }

    let start_ms = ctrl.platform().now_ms();
    ctrl.step();
    report.blocked_ms = ctrl.platform().now_ms() - start_ms;

    report
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_turns_block_sim_time() {
        let mut sim = SimPlatform::default();
        sim.turn_left(120, 500);
        sim.forward(150);
        sim.turn(TurnDir::Right, 120, 250);
        sim.delay_ms(30);

        assert_eq!(sim.now_ms(), 780);
        assert_eq!(sim.count_cmds(|c| c.is_turn()), 2);
        assert_eq!(sim.drive_cmds()[1], DriveCmd::Forward(150));
    }

    #[test]
    fn test_prox_readings() {
        let mut sim = SimPlatform::default();

        sim.set_no_echo();
        let d = sim.measure_distance_cm();
        assert!(!sim.is_valid_reading(d));

        sim.apply_event(&SimEvent::DistanceCm(12.0));
        assert!(sim.is_object_within(15.0));

        sim.apply_event(&SimEvent::NoEcho);
        assert!(!sim.is_object_within(15.0));
    }

    #[test]
    fn test_run_cycle_report() {
        let mut ctrl = crate::nav_ctrl::test_util::sim_ctrl();
        let mut script = CourseScript::parse(
            "0.0: {\"Color\": \"Red\"};\n0.0: {\"DistanceCm\": 10.0};\n"
        ).unwrap();

        // Both events land before the step, so the obstacle is seen straight away
        let report = run_cycle(&mut ctrl, &mut script);
        assert_eq!(report.num_events, 2);
        assert!(!report.end_of_script);
        assert_eq!(ctrl.state(), crate::nav_ctrl::NavState::DodgeTurnAway);

        // The turn away blocks for the turn and the settle
        let report = run_cycle(&mut ctrl, &mut script);
        assert_eq!(report.num_events, 0);
        assert!(report.end_of_script);
        assert_eq!(report.blocked_ms, 600);
        assert!(ctrl.state().is_dodge());
    }

    #[test]
    fn test_open_loop_line_follow() {
        let mut sim = SimPlatform::default();
        let mut lf = OpenLoopLineFollow::new(150);

        lf.follow_step(ColorLabel::Red, &mut sim);

        assert_eq!(sim.drive_cmds(), &[DriveCmd::Forward(150)]);
    }
}
