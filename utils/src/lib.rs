//! Shared utilities for the flow governance engine.

pub mod logging;
pub mod stats;
pub mod time;

pub use logging::{init_logging, LogFormat, LogFormatParseError};
pub use stats::Counters;
pub use time::format_period;
