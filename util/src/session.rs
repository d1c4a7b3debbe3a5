//! # Run sessions
//!
//! Every execution of a course executable is a session. A session owns a directory under
//! `$COURSE_SW_ROOT/<sessions_dir>/<exec>_<timestamp>` which receives the log file and any
//! telemetry written at the end of the run. The start time of the session is the epoch used to
//! stamp log records.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

/// Start time of the session in this process, set once by [`Session::new`].
static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Format of the timestamp in a session directory name, e.g. `20261016_120000`.
const DIR_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the navigation telemetry file written into the session directory.
pub const NAV_TM_FILE_NAME: &str = "nav_tm.json";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Directory and files of one run.
#[derive(Clone, Debug)]
pub struct Session {
    exec_name: String,

    root: PathBuf,

    epoch: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (COURSE_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("A session has already been started by this process")]
    AlreadyStarted,

    #[error("Cannot create the session directory {0:?}: {1}")]
    CannotCreateDir(PathBuf, std::io::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start the session of this process in `$COURSE_SW_ROOT/<sessions_dir>`.
    ///
    /// Only one session may be started per process, since its start time stamps every log record.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = crate::host::get_course_sw_root().map_err(|_| SessionError::SwRootNotSet)?;

        let epoch = Utc::now();
        SESSION_EPOCH
            .try_init_once(|| epoch)
            .map_err(|_| SessionError::AlreadyStarted)?;

        Self::create_in(&root.join(sessions_dir), exec_name, epoch)
    }

    /// Create the directory of a session starting at `epoch` inside `sessions_dir`, without
    /// touching the process epoch.
    pub fn create_in(
        sessions_dir: &Path,
        exec_name: &str,
        epoch: DateTime<Utc>
    ) -> Result<Self, SessionError> {
        let root = sessions_dir.join(format!(
            "{}_{}",
            exec_name,
            epoch.format(DIR_TIMESTAMP_FORMAT)
        ));

        fs::create_dir_all(&root).map_err(|e| SessionError::CannotCreateDir(root.clone(), e))?;

        Ok(Self {
            exec_name: exec_name.to_string(),
            root,
            epoch,
        })
    }

    /// The session directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// Log file of the executable, `<exec>.log`.
    pub fn log_file_path(&self) -> PathBuf {
        self.file_path(&format!("{}.log", self.exec_name))
    }

    /// Where the navigation telemetry of the run is written.
    pub fn nav_tm_path(&self) -> PathBuf {
        self.file_path(NAV_TM_FILE_NAME)
    }

    /// Path of a file with the given name in the session directory.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Seconds since the session of this process started, or `0.0` if no session has been started
/// (tests and tools which log without one).
pub fn get_elapsed_seconds() -> f64 {
    match SESSION_EPOCH.get() {
        Some(e) => time::duration_to_seconds(Utc::now() - *e).unwrap_or(std::f64::NAN),
        None => 0.0,
    }
}

/// Start time of the session of this process, if one has been started.
pub fn get_epoch() -> Option<&'static DateTime<Utc>> {
    SESSION_EPOCH.get()
}
