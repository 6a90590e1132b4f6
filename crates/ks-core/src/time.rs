//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  The mapping to
//! simulated seconds is held in `SimClock`:
//!
//!   time_secs = tick / tick_rate
//!
//! The default rate is 32 ticks per second, the control-loop frequency of
//! the robots being modelled.  Using an integer tick as the canonical unit
//! keeps rate gates (`tick % comm_rate`) exact.

use std::fmt;
use std::path::PathBuf;

use crate::{KsError, KsResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// `true` on ticks that fall on a multiple of `every` (`every == 0` never
    /// matches).
    #[inline]
    pub fn is_every(self, every: u64) -> bool {
        every != 0 && self.0 % every == 0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
///
/// Only the simulation advances its clock; collaborators read it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Ticks per simulated second.
    pub tick_rate: u16,
    /// The current tick — advanced by `SimClock::advance()` after each step.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_rate: u16) -> Self {
        Self { tick_rate, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Seconds represented by one tick.
    #[inline]
    pub fn tick_duration(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }

    /// Simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 / self.tick_rate as f64
    }

    /// How many ticks span `secs` seconds (rounds up).
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        (secs * self.tick_rate as f64).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Startup parameters of one simulation instance.
///
/// Usually built from a JSON scenario file by the application and passed to
/// the simulation builder.  All fields are fixed for the lifetime of the run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Arena width in mm.
    pub arena_width: f64,

    /// Arena height in mm.
    pub arena_height: f64,

    /// Ticks per simulated second.  Default: 32.
    pub tick_rate: u16,

    /// Messages are exchanged on ticks that are a multiple of this.
    /// Default: 3 (≈10 rounds per second at 32 ticks/s).
    pub comm_rate: u64,

    /// Probability that an agent's controller runs on a given tick.
    /// Default: 0.99.
    pub p_exec: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count for the `parallel` feature.  `None` uses Rayon's
    /// global pool.
    pub num_threads: Option<usize>,

    /// Image file used as the ambient light field.  `None` means darkness.
    pub light_pattern: Option<PathBuf>,

    /// Call `SimObserver::on_snapshot` every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena_width:             1200.0,
            arena_height:            1200.0,
            tick_rate:               32,
            comm_rate:               3,
            p_exec:                  0.99,
            seed:                    0,
            num_threads:             None,
            light_pattern:           None,
            snapshot_interval_ticks: 0,
        }
    }
}

impl SimConfig {
    /// A default configuration for an arena of the given size.
    pub fn with_arena(arena_width: f64, arena_height: f64) -> Self {
        Self { arena_width, arena_height, ..Self::default() }
    }

    /// Seconds represented by one tick.
    #[inline]
    pub fn tick_duration(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_rate)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> KsResult<()> {
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(KsError::Config(format!(
                "arena dimensions must be positive, got {} x {}",
                self.arena_width, self.arena_height
            )));
        }
        if self.tick_rate == 0 {
            return Err(KsError::Config("tick_rate must be at least 1".into()));
        }
        if self.comm_rate == 0 {
            return Err(KsError::Config("comm_rate must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.p_exec) {
            return Err(KsError::Config(format!(
                "p_exec must lie in [0, 1], got {}",
                self.p_exec
            )));
        }
        Ok(())
    }
}
