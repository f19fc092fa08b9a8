//! Shared utilities

pub mod logger;
mod timer;

pub use logger::{init_logger, LogLevel, LogTarget};
pub use timer::Timer;
