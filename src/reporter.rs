//! Failure reporting handed to [`crate::SolarResource`] instead of a global logger.

use log::Level;
use std::fmt::Debug;

/// Receives one message per failed load.
pub trait Reporter: Send + Sync + Debug {
    fn report(&self, level: Level, message: &str);
}

/// Forwards reports to the `log` facade under the `solar_resource` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, level: Level, message: &str) {
        log::log!(target: "solar_resource", level, "{}", message);
    }
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _level: Level, _message: &str) {}
}
