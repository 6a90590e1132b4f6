//! Battery accounting.
//!
//! A battery is either unlimited or a finite charge that drains by a fixed
//! amount on every executed control step in which a motor is running.  It is
//! never recharged.

use ks_core::AgentRng;

/// Charge removed per moving tick.
pub const DRAIN_PER_TICK: f64 = 0.5;

/// Nominal charge for two hours of continuous movement at `tick_rate`.
pub fn two_hours(tick_rate: u16) -> f64 {
    2.0 * 3600.0 * tick_rate as f64
}

/// Remaining charge of one agent.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Battery {
    /// Never drains.
    #[default]
    Infinite,
    /// Remaining charge; the agent dies once this is `<= 0`.
    Finite(f64),
}

impl Battery {
    /// Remove one tick's worth of charge.  Returns `true` when the battery
    /// is (now) depleted.
    #[inline]
    pub fn drain(&mut self) -> bool {
        match self {
            Battery::Infinite => false,
            Battery::Finite(level) => {
                *level -= DRAIN_PER_TICK;
                *level <= 0.0
            }
        }
    }

    /// `true` for a finite battery at or below zero.
    #[inline]
    pub fn is_depleted(&self) -> bool {
        matches!(self, Battery::Finite(level) if *level <= 0.0)
    }

    /// Remaining charge, `None` when infinite.
    #[inline]
    pub fn level(&self) -> Option<f64> {
        match self {
            Battery::Infinite => None,
            Battery::Finite(level) => Some(*level),
        }
    }
}

/// How an agent's battery is chosen when it is initialised.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BatterySpec {
    Infinite,
    /// Exactly this charge.
    Fixed(f64),
    /// `(1 + N(0, 1) / 5) * nominal`, floored at zero.
    Randomized { nominal: f64 },
}

impl BatterySpec {
    /// Draw the initial battery from the agent's own RNG stream.
    pub fn realize(&self, rng: &mut AgentRng) -> Battery {
        match *self {
            BatterySpec::Infinite => Battery::Infinite,
            BatterySpec::Fixed(level) => Battery::Finite(level),
            BatterySpec::Randomized { nominal } => {
                let factor = 1.0 + rng.standard_normal() / 5.0;
                Battery::Finite((factor * nominal).max(0.0))
            }
        }
    }
}
