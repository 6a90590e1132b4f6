//! Per-agent speed calibration.
//!
//! Physical robots of the same model never move at exactly the same speed.
//! Each agent gets a fixed bias on its forward and turning speed, drawn once
//! at initialisation:
//!
//!   speed = nominal + e,   e ~ N(0, (0.1 * nominal)^2),  |e| <= 1.1 * std
//!
//! Samples outside the bound are redrawn.  The loop is capped at
//! [`MAX_ATTEMPTS`]; if every draw is rejected the last one is clamped to
//! the bound instead.

use ks_core::AgentRng;
use tracing::warn;

/// Standard deviation of the bias as a fraction of the nominal speed.
pub const NOISE_FRACTION: f64 = 0.1;

/// Samples larger than this multiple of the standard deviation are redrawn.
pub const CLAMP_FACTOR: f64 = 1.1;

/// Redraw budget before falling back to clamping.
pub const MAX_ATTEMPTS: usize = 64;

/// Calibrated speeds of one agent.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calibration {
    /// mm/s when driving straight.
    pub forward_speed: f64,
    /// rad/s when turning in place.
    pub turn_speed: f64,
}

impl Calibration {
    /// Exact nominal speeds, no noise.
    pub fn nominal(forward_speed: f64, turn_speed: f64) -> Self {
        Self { forward_speed, turn_speed }
    }

    /// Nominal speeds with independent clamped noise.  Turn speed is drawn
    /// first.
    pub fn sample(forward_speed: f64, turn_speed: f64, rng: &mut AgentRng) -> Self {
        let turn_bias = clamped_noise(turn_speed * NOISE_FRACTION, rng);
        let forward_bias = clamped_noise(forward_speed * NOISE_FRACTION, rng);
        Self {
            forward_speed: forward_speed + forward_bias,
            turn_speed:    turn_speed + turn_bias,
        }
    }

    /// A dead agent cannot move.
    pub fn zeroed() -> Self {
        Self { forward_speed: 0.0, turn_speed: 0.0 }
    }
}

/// Gaussian sample with standard deviation `std`, rejection-filtered to
/// `|e| <= CLAMP_FACTOR * std`.
pub fn clamped_noise(std: f64, rng: &mut AgentRng) -> f64 {
    clamped_from(std, || rng.standard_normal())
}

/// The rejection filter behind [`clamped_noise`], fed by `draw` (unit-variance
/// samples).  After [`MAX_ATTEMPTS`] rejections the last sample is clamped.
pub fn clamped_from(std: f64, mut draw: impl FnMut() -> f64) -> f64 {
    let std = std.abs();
    if std == 0.0 {
        return 0.0;
    }
    let limit = std * CLAMP_FACTOR;
    let mut sample = 0.0;
    for _ in 0..MAX_ATTEMPTS {
        sample = draw() * std;
        if sample.abs() <= limit {
            return sample;
        }
    }
    warn!(std, attempts = MAX_ATTEMPTS, "calibration noise never fell inside bound; clamping");
    sample.clamp(-limit, limit)
}
