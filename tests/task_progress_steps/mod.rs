//! Step definitions for task progress scenarios.

mod given;
mod then;
mod when;
