//! `ks-output` — per-trial CSV logs for the kilosim simulator.
//!
//! A [`Logger`] owns one directory per trial, `<dir>/trial_<n>/`, holding:
//!
//! | File          | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | `time.csv`    | one simulated time (seconds) per logged state         |
//! | `<name>.csv`  | one row per logged state for each named aggregator:   |
//! |               | `time, v0, v1, …`                                     |
//! | `params.csv`  | `key,value` pairs of the scenario configuration       |
//!
//! Aggregators are plain functions from the agents' current views to a
//! vector of numbers; [`aggregate`] has the common ones.
//!
//! [`LogObserver`] implements `ks_sim::SimObserver` and writes a state row on
//! every simulation snapshot.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ks_output::{aggregate, LogObserver, Logger};
//!
//! let mut logger = Logger::new("out", 0, false)?;
//! logger.add_aggregator("mean_battery", aggregate::mean_battery)?;
//! logger.log_params(&parser.params())?;
//! let mut obs = LogObserver::new(logger);
//! sim.run_until(600.0, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("log error: {e}");
//! }
//! ```

pub mod aggregate;
pub mod error;
pub mod logger;
pub mod observer;

#[cfg(test)]
mod tests;

pub use aggregate::Aggregator;
pub use error::{OutputError, OutputResult};
pub use logger::Logger;
pub use observer::LogObserver;
