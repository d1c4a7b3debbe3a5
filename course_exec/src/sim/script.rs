//! # Course script interpreter
//!
//! A course script describes what the simulated sensors see over time. Each entry has the form
//! `<time_s>: <event>;` where the event is JSON:
//!
//! ```text
//! # Line under the sensor from the start
//! 0.0: {"Color": "Red"};
//! 2.5: {"Color": "Blue"};
//! 2.8: {"Color": "Red"};
//! 4.0: {"DistanceCm": 10.0};
//! 4.2: "NoEcho";
//! 12.0: {"Color": "Black"};
//! ```
//!
//! Readings persist until changed by a later event. Lines which are not entries, such as
//! comments, are ignored.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use eqpt_if::color::ColorLabel;
use util::time::{millis_to_seconds, seconds_to_millis};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// An event which is scripted to occur at a specific time.
#[derive(Debug, Clone, PartialEq)]
struct TimedEvent {
    /// Simulation time at which the event occurs
    time_ms: u64,

    event: SimEvent,
}

/// A course script interpreter.
///
/// After loading the script use [`CourseScript::pending_events`] with the current simulation
/// time to acquire the events which have become due.
#[derive(Debug, Clone)]
pub struct CourseScript {
    _script_path: Option<PathBuf>,
    events: VecDeque<TimedEvent>,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// A change to what the simulated sensors see.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum SimEvent {
    /// The color classifier sees this color from now on
    Color(ColorLabel),

    /// The nearest object ahead is at this distance
    DistanceCm(f64),

    /// Nothing ahead, echoes time out
    NoEcho,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not build the script pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script entry at {0} s is earlier than the entry before it")]
    OutOfOrder(f64),

    #[error("Script contains an invalid event at {0} s: {1}")]
    InvalidEvent(f64, serde_json::Error),
}

pub enum PendingEvents {
    None,
    Some(Vec<SimEvent>),
    EndOfScript,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl CourseScript {

    /// Load a script from the given path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        let path = PathBuf::from(script_path.as_ref());

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        let script = fs::read_to_string(&path).map_err(ScriptError::ScriptLoadError)?;

        let mut cs = Self::parse(&script)?;
        cs._script_path = Some(path);

        Ok(cs)
    }

    /// Parse a script from its text.
    pub fn parse(script: &str) -> Result<Self, ScriptError> {

        let mut events: VecDeque<TimedEvent> = VecDeque::new();

        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()?;

        for cap in re.captures_iter(script) {
            let time_str = &cap[1];
            let time_s: f64 = time_str
                .parse()
                .map_err(|_| ScriptError::InvalidTimestamp(time_str.to_string()))?;

            let event: SimEvent = serde_json::from_str(&cap[3])
                .map_err(|e| ScriptError::InvalidEvent(time_s, e))?;

            let time_ms = seconds_to_millis(time_s);

            if let Some(last) = events.back() {
                if time_ms < last.time_ms {
                    return Err(ScriptError::OutOfOrder(time_s));
                }
            }

            events.push_back(TimedEvent { time_ms, event });
        }

        if events.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        Ok(Self {
            _script_path: None,
            events,
        })
    }

    /// Return the events due at or before `now_ms`, removing them from the script.
    pub fn pending_events(&mut self, now_ms: u64) -> PendingEvents {

        // If the queue is empty the script is over
        if self.events.is_empty() {
            return PendingEvents::EndOfScript;
        }

        let mut due = vec![];

        while let Some(e) = self.events.front() {
            if e.time_ms > now_ms {
                break;
            }
            if let Some(e) = self.events.pop_front() {
                due.push(e.event);
            }
        }

        if due.is_empty() {
            PendingEvents::None
        }
        else {
            PendingEvents::Some(due)
        }
    }

    /// Get the number of events remaining in the script
    pub fn get_num_events(&self) -> usize {
        self.events.len()
    }

    /// Get the time of the last event in seconds
    pub fn get_duration(&self) -> f64 {
        match self.events.back() {
            Some(e) => millis_to_seconds(e.time_ms),
            None => 0f64,
        }
    }
}
