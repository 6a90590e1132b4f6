//! `LogObserver` — bridges `SimObserver` to a [`Logger`].

use ks_core::Tick;
use ks_sim::{AgentView, SimObserver};

use crate::{Logger, OutputError, OutputResult};

/// A [`SimObserver`] that logs a state row on every snapshot and finishes
/// the logger when the run ends.
///
/// The logging interval is the simulation's `snapshot_interval_ticks`.
/// Write errors are stored because observer hooks have no return value;
/// check them with [`take_error`][Self::take_error] after the run.
pub struct LogObserver {
    logger:     Logger,
    last_error: Option<OutputError>,
}

impl LogObserver {
    pub fn new(logger: Logger) -> Self {
        Self { logger, last_error: None }
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    pub fn into_logger(self) -> Logger {
        self.logger
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl SimObserver for LogObserver {
    fn on_snapshot(&mut self, _tick: Tick, time_secs: f64, agents: &[AgentView]) {
        let result = self.logger.log_views(time_secs, agents);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.logger.finish();
        self.store_err(result);
    }
}
