//! Simulation observer trait for progress reporting and data collection.

use ks_core::Tick;

use crate::AgentView;

/// Callbacks invoked by [`Simulation::run_ticks`][crate::Simulation::run_ticks]
/// and [`Simulation::run_until`][crate::Simulation::run_until] around each tick.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, executed: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: {executed} controllers ran");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before any phase of the tick runs.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the tick's last phase.
    ///
    /// `executed` is the number of controllers that ran this tick.
    fn on_tick_end(&mut self, _tick: Tick, _executed: usize) {}

    /// Called after a tick whenever the number of completed ticks is a
    /// multiple of `config.snapshot_interval_ticks`.  `tick` is that count
    /// and `time_secs` the simulated time it corresponds to.
    fn on_snapshot(&mut self, _tick: Tick, _time_secs: f64, _agents: &[AgentView]) {}

    /// Called once when `run_until` finishes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
