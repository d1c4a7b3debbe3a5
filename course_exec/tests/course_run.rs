//! Full course runs of the navigation controller against scripted courses.

use course_lib::{
    nav_ctrl::{NavCtrl, NavCtrlParams, NavState},
    sim::{run_cycle, CourseScript, OpenLoopLineFollow, SimPlatform},
};
use eqpt_if::{clock::Clock, drive::{DriveCmd, TurnDir}};

const CYCLE_PERIOD_MS: u64 = 50;
const MAX_RUN_TIME_MS: u64 = 60_000;

/// Run a script until the course is complete or the time limit is hit, returning the controller
/// and the sequence of states it went through.
fn run_course(script: &str) -> (NavCtrl<SimPlatform>, Vec<NavState>) {
    let params = NavCtrlParams::default();
    let line_follow = Box::new(OpenLoopLineFollow::new(params.follow_speed));
    let mut ctrl = NavCtrl::new(params, SimPlatform::default(), line_follow);
    ctrl.setup();

    let mut script = CourseScript::parse(script).unwrap();
    let mut states = vec![ctrl.state()];

    while !ctrl.is_complete() && ctrl.platform().now_ms() < MAX_RUN_TIME_MS {
        run_cycle(&mut ctrl, &mut script);

        if states.last() != Some(&ctrl.state()) {
            states.push(ctrl.state());
        }

        ctrl.platform_mut().advance_ms(CYCLE_PERIOD_MS);
    }

    (ctrl, states)
}

#[test]
fn test_demo_course() {
    let (ctrl, states) = run_course(include_str!("../../scripts/obstacle_course.course"));

    assert_eq!(
        states,
        vec![
            NavState::FollowLine,
            NavState::PickupZone,
            NavState::FollowLine,
            NavState::DodgeTurnAway,
            NavState::DodgePassSide,
            NavState::DodgeTurnParallel,
            NavState::DodgePassLength,
            NavState::DodgeTurnTowardLine,
            NavState::DodgeFindLine,
            NavState::DodgeRealign,
            NavState::FollowLine,
            NavState::DropoffZone,
            NavState::FollowLine,
            NavState::Complete,
        ]
    );

    let tm = ctrl.get_tm();
    assert!(tm.complete);
    assert_eq!(tm.zone_count, 2);
    assert_eq!(tm.num_obstacles_dodged, 1);
    assert_eq!(tm.num_transitions, 13);

    // The dodge is the only source of turns: right, left, left, right
    let turns: Vec<TurnDir> = ctrl
        .platform()
        .drive_cmds()
        .iter()
        .filter_map(|c| match c {
            DriveCmd::Turn { dir, .. } => Some(*dir),
            _ => None,
        })
        .collect();
    assert_eq!(turns, vec![TurnDir::Right, TurnDir::Left, TurnDir::Left, TurnDir::Right]);

    // The robot is left stopped
    assert_eq!(ctrl.platform().drive_cmds().last(), Some(&DriveCmd::Stop));
}

#[test]
fn test_three_zones() {
    let script = r#"
        0.0: {"Color": "Red"};
        1.0: {"Color": "Blue"};
        1.05: {"Color": "Red"};
        3.0: {"Color": "Blue"};
        3.05: {"Color": "Red"};
        5.0: {"Color": "Blue"};
        5.05: {"Color": "Red"};
        7.0: {"Color": "Black"};
    "#;

    let (ctrl, states) = run_course(script);

    // Every zone after the first is a dropoff
    let zones: Vec<NavState> = states.into_iter().filter(|s| s.is_zone()).collect();
    assert_eq!(
        zones,
        vec![NavState::PickupZone, NavState::DropoffZone, NavState::DropoffZone]
    );
    assert_eq!(ctrl.zone_count(), 3);
    assert!(ctrl.is_complete());
}

#[test]
fn test_far_and_invalid_readings_are_ignored() {
    let script = r#"
        0.0: {"Color": "Red"};
        0.5: {"DistanceCm": 40.0};
        1.0: {"DistanceCm": 1.0};
        1.5: {"DistanceCm": 500.0};
        2.0: "NoEcho";
        3.0: {"Color": "Black"};
    "#;

    let (ctrl, states) = run_course(script);

    assert_eq!(states, vec![NavState::FollowLine, NavState::Complete]);
    assert_eq!(ctrl.get_tm().num_obstacles_dodged, 0);
    assert_eq!(ctrl.platform().count_cmds(|c| c.is_turn()), 0);
}

#[test]
fn test_lost_line_times_out_run() {
    // The line is never found again after the dodge, the controller keeps searching
    let script = r#"
        0.0: {"Color": "Red"};
        0.5: {"DistanceCm": 8.0};
        1.0: "NoEcho";
        1.0: {"Color": "White"};
    "#;

    let (ctrl, _) = run_course(script);

    assert!(!ctrl.is_complete());
    assert_eq!(ctrl.state(), NavState::DodgeFindLine);
    assert!(ctrl.platform().now_ms() >= MAX_RUN_TIME_MS);
}
