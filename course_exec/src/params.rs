//! # Course executable parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use eqpt_if::prox::ProxRange;
use serde::Deserialize;
use thiserror::Error;
use util::logger::{parse_level, LevelFilter, LoggerInitError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the course executable's host loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CourseExecParams {
    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Run time after which the executable gives up if the course hasn't been completed. Can be
    /// overridden from the command line.
    ///
    /// Units: seconds
    pub max_run_time_s: f64,

    /// Minimum level of messages written to the log: `"info"`, `"debug"` or `"trace"`.
    pub log_level: String,

    /// Range of distances the ultrasonic ranger reports reliably.
    pub prox_range: ProxRange,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ExecParamsError {
    #[error("cycle_period_s must be a positive number of seconds, found {0}")]
    InvalidCyclePeriod(f64),

    #[error("max_run_time_s must be a positive number of seconds, found {0}")]
    InvalidMaxRunTime(f64),

    #[error("Invalid log_level: {0}")]
    InvalidLogLevel(#[from] LoggerInitError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CourseExecParams {
    /// Check the parameters can drive a run. Simulated time only moves forward with the cycle
    /// period, so a zero or negative period would never reach the end of the run.
    pub fn validate(&self) -> Result<(), ExecParamsError> {
        validate_run_time(self.max_run_time_s)?;

        if !(self.cycle_period_s > 0.0 && self.cycle_period_s.is_finite()) {
            return Err(ExecParamsError::InvalidCyclePeriod(self.cycle_period_s));
        }

        // Periods shorter than a millisecond round to zero
        if util::time::seconds_to_millis(self.cycle_period_s) == 0 {
            return Err(ExecParamsError::InvalidCyclePeriod(self.cycle_period_s));
        }

        self.log_level()?;

        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter, ExecParamsError> {
        Ok(parse_level(&self.log_level)?)
    }
}

/// Check a maximum run time, either from the parameter file or the command line.
pub fn validate_run_time(max_run_time_s: f64) -> Result<(), ExecParamsError> {
    if max_run_time_s > 0.0 && max_run_time_s.is_finite() {
        Ok(())
    }
    else {
        Err(ExecParamsError::InvalidMaxRunTime(max_run_time_s))
    }
}

impl Default for CourseExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.05,
            max_run_time_s: 120.0,
            log_level: String::from("debug"),
            prox_range: ProxRange::default(),
        }
    }
}
