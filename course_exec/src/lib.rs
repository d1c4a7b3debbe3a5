//! # Course library.
//!
//! This library allows other crates in the workspace (and the integration tests) to access items
//! defined inside the course executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Navigation controller - the obstacle course state machine
pub mod nav_ctrl;

/// Simulation - a simulated platform driven by course scripts
pub mod sim;

/// Executable parameters
pub mod params;
