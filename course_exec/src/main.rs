//! Main course executable entry point.
//!
//! # Architecture
//!
//! The executable runs the navigation controller against a simulated robot whose sensor readings
//! are driven by a course script:
//!
//!     - Initialise session, logging and parameters
//!     - Load the course script
//!     - Main loop:
//!         - Apply script events which have become due
//!         - Step the navigation controller
//!         - Advance simulated time by one cycle (and sleep, in realtime mode)
//!     - Write the final telemetry to the session directory
//!
//! The loop ends when the course is complete or the maximum run time has been reached.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::fs::File;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use course_lib::{
    nav_ctrl::{NavCtrl, NavCtrlParams},
    params::{validate_run_time, CourseExecParams},
    sim::{run_cycle, CourseScript, OpenLoopLineFollow, SimPlatform},
};
use eqpt_if::clock::Clock;
use util::{
    logger::logger_init,
    session::Session,
    time::{millis_to_seconds, seconds_to_millis},
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Drive the obstacle course navigation controller through a scripted course.
#[derive(Debug, StructOpt)]
#[structopt(name = "course_exec")]
struct Opts {
    /// Path to the course script
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Override the maximum run time from the parameter file (seconds)
    #[structopt(long = "max-time-s")]
    max_time_s: Option<f64>,

    /// Pace the simulation with the wall clock
    #[structopt(long)]
    realtime: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "course_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Parameters are needed before the logger so the log level can be set
    let exec_params: CourseExecParams = util::params::load(
        "course_exec.toml"
    ).wrap_err("Could not load course_exec params")?;

    exec_params.validate().wrap_err("Invalid course_exec params")?;
    let log_level = exec_params.log_level().wrap_err("Invalid course_exec params")?;

    // Initialise logger
    logger_init(log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Obstacle Course Executable\n");
    info!("Session directory: {:?}\n", session.root());
    debug!("CLI options: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let nav_params: NavCtrlParams = util::params::load(
        "nav_ctrl.toml"
    ).wrap_err("Could not load nav_ctrl params")?;

    info!("Exec parameters loaded");

    let cycle_period_ms = seconds_to_millis(exec_params.cycle_period_s);
    let max_run_time_s = opts.max_time_s.unwrap_or(exec_params.max_run_time_s);
    validate_run_time(max_run_time_s).wrap_err("Invalid maximum run time")?;
    let max_run_time_ms = seconds_to_millis(max_run_time_s);

    // ---- LOAD SCRIPT ----

    info!("Loading script from {:?}", &opts.script);

    let mut script = CourseScript::new(&opts.script)
        .wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} events\n",
        script.get_duration(),
        script.get_num_events()
    );

    // ---- INITIALISE CONTROLLER ----

    let platform = SimPlatform::new(exec_params.prox_range);
    let line_follow = Box::new(OpenLoopLineFollow::new(nav_params.follow_speed));

    let mut nav_ctrl = NavCtrl::new(nav_params, platform, line_follow);
    nav_ctrl.setup();

    info!("Initialisation complete, starting main loop (max run time {:.02} s)\n", max_run_time_s);

    // ---- MAIN LOOP ----

    let mut end_of_script_reported = false;
    let mut num_cycles: u64 = 0;

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        let report = run_cycle(&mut nav_ctrl, &mut script);
        num_cycles += 1;

        if report.num_events > 0 {
            debug!(
                "Applied {} script events at {} ms",
                report.num_events,
                nav_ctrl.platform().now_ms() - report.blocked_ms
            );
        }

        if report.end_of_script && !end_of_script_reported {
            info!("End of script reached, sensor readings are now fixed");
            end_of_script_reported = true;
        }

        if nav_ctrl.is_complete() {
            break;
        }

        if nav_ctrl.platform().now_ms() >= max_run_time_ms {
            warn!(
                "Course not completed within {:.02} s, stopping in state {}",
                max_run_time_s,
                nav_ctrl.state()
            );
            if nav_ctrl.state().is_dodge() {
                warn!("The line was not found again after the last obstacle");
            }
            break;
        }

        nav_ctrl.platform_mut().advance_ms(cycle_period_ms);

        // In realtime mode the cycle lasts as long as the simulated time it covered
        if opts.realtime {
            let target = Duration::from_millis(report.blocked_ms + cycle_period_ms);
            let cycle_dur = Instant::now() - cycle_start_instant;

            match target.checked_sub(cycle_dur) {
                Some(d) => thread::sleep(d),
                None => warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - target.as_secs_f64()
                ),
            }
        }
    }

    // ---- SHUTDOWN ----

    let tm = nav_ctrl.get_tm();

    let tm_path = session.nav_tm_path();

    let tm_file = File::create(&tm_path)
        .wrap_err("Could not create the telemetry file")?;
    serde_json::to_writer_pretty(tm_file, &tm)
        .wrap_err("Could not write the telemetry file")?;

    info!("Run summary:");
    info!("    Cycles: {}", num_cycles);
    info!("    Simulated time: {:.02} s", millis_to_seconds(nav_ctrl.platform().now_ms()));
    info!("    Final state: {}", tm.state);
    info!("    Zones passed: {}", tm.zone_count);
    info!("    Obstacles dodged: {}", tm.num_obstacles_dodged);
    info!("    Course complete: {}", tm.complete);
    info!("    Telemetry written to {:?}", tm_path);

    info!("End of execution");

    Ok(())
}
