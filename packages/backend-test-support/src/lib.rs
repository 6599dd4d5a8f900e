//! Shared helpers for the BlitzQuest backend tests: one-time logging setup,
//! problem-details assertions and unique test names.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
