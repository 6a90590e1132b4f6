//! The robot's on-board tick counter.

use ks_core::AgentRng;

/// On-board clock seen by controllers.
///
/// It advances once per executed control step, but the oscillator is
/// imprecise: 5% of the time it stays put and 5% of the time it jumps two.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KiloClock {
    pub ticks: u32,
}

impl KiloClock {
    pub fn advance(&mut self, rng: &mut AgentRng) {
        let jitter: f64 = rng.random();
        let step: u32 = if jitter < 0.05 {
            0
        } else if jitter < 0.1 {
            2
        } else {
            1
        };
        self.ticks = self.ticks.wrapping_add(step);
    }
}
