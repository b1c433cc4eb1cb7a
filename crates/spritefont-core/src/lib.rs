//! Spritefont Core
//!
//! Logging and profiling services shared by the spritefont crates.

pub mod logging;
pub mod profiling;
