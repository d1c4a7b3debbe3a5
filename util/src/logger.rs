//! # Logging
//!
//! Records go to stdout and to the session's log file, stamped with the seconds elapsed since the
//! session started:
//!
//! ```text
//! [  4.051203 INF] NavCtrl state change: NavState::FollowLine -> NavState::DodgeTurnAway
//! [  4.051377 DBG] course_lib::sim: Sim event at 4600 ms: NoEcho
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use colored::{ColoredString, Colorize};
use log::{info, Level, Record};
use std::{fmt, str::FromStr};
use thiserror::Error;

// Internal
use crate::session::{self, Session};

pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Quietest level the logger accepts. State changes and the run summary are logged at info, so
/// nothing quieter is allowed.
pub const QUIETEST_LEVEL: LevelFilter = LevelFilter::Info;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Log level `{0}` would hide the run's state changes, use info, debug or trace")]
    LevelTooQuiet(LevelFilter),

    #[error("Unrecognised log level name `{0}`")]
    UnknownLogLevel(String),

    #[error("Cannot open the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("Cannot install the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Install the logger for this process, writing to stdout and `session`'s log file.
///
/// Can only succeed once per process.
pub fn logger_init(min_level: LevelFilter, session: &Session) -> Result<(), LoggerInitError> {
    check_level(min_level)?;

    let log_file_path = session.log_file_path();
    let log_file = fern::log_file(&log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    fern::Dispatch::new()
        .format(format_record)
        .level(min_level)
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised at {:?}", min_level);
    info!("    Session started: {}", session.epoch());
    info!("    Log file: {:?}", log_file_path);

    Ok(())
}

/// Parse a log level name as found in an exec parameter file (e.g. `"debug"`). Levels quieter than
/// [`QUIETEST_LEVEL`] are rejected.
pub fn parse_level(name: &str) -> Result<LevelFilter, LoggerInitError> {
    let level = LevelFilter::from_str(name.trim())
        .map_err(|_| LoggerInitError::UnknownLogLevel(name.to_string()))?;

    check_level(level)?;

    Ok(level)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_level(level: LevelFilter) -> Result<(), LoggerInitError> {
    if level < QUIETEST_LEVEL {
        Err(LoggerInitError::LevelTooQuiet(level))
    }
    else {
        Ok(())
    }
}

/// Debug and trace records also show their target module.
fn format_record(out: fern::FormatCallback, message: &fmt::Arguments, record: &Record) {
    let stamp = session::get_elapsed_seconds();
    let tag = level_tag(record.level());

    if record.level() > Level::Info {
        out.finish(format_args!("[{:10.6} {}] {}: {}", stamp, tag, record.target(), message))
    }
    else {
        out.finish(format_args!("[{:10.6} {}] {}", stamp, tag, message))
    }
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info  => "INF".normal(),
        Level::Warn  => "WRN".yellow(),
        Level::Error => "ERR".red().bold()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level(" INFO ").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("trace").unwrap(), LevelFilter::Trace);
        assert!(matches!(
            parse_level("loud"),
            Err(LoggerInitError::UnknownLogLevel(_))
        ));
    }

    #[test]
    fn test_quiet_levels_rejected() {
        for name in ["off", "error", "warn"].iter() {
            assert!(matches!(
                parse_level(name),
                Err(LoggerInitError::LevelTooQuiet(_))
            ));
        }
    }
}
