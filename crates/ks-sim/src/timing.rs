//! Wall-clock time spent in each pipeline phase.

use std::fmt;
use std::time::Duration;

/// Pipeline phase, in execution order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Controllers,
    Communicate,
    Candidates,
    Classify,
    Resolve,
}

impl Phase {
    pub const ALL: [Phase; 5] =
        [Phase::Controllers, Phase::Communicate, Phase::Candidates, Phase::Classify, Phase::Resolve];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Controllers => "controllers",
            Phase::Communicate => "communicate",
            Phase::Candidates => "candidates",
            Phase::Classify => "classify",
            Phase::Resolve => "resolve",
        }
    }
}

/// Accumulated time per phase since the simulation was built.
#[derive(Clone, Debug, Default)]
pub struct PhaseTimers {
    totals: [Duration; 5],
    ticks:  u64,
}

impl PhaseTimers {
    #[inline]
    pub fn record(&mut self, phase: Phase, elapsed: Duration) {
        self.totals[phase as usize] += elapsed;
    }

    #[inline]
    pub(crate) fn finish_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn total(&self, phase: Phase) -> Duration {
        self.totals[phase as usize]
    }

    /// Sum over all phases.
    pub fn step_total(&self) -> Duration {
        self.totals.iter().sum()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for PhaseTimers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.step_total().as_secs_f64();
        for phase in Phase::ALL {
            let secs = self.total(phase).as_secs_f64();
            let share = if total > 0.0 { 100.0 * secs / total } else { 0.0 };
            writeln!(f, "{:<12} {:>10.4} s  {:>5.1}%", phase.name(), secs, share)?;
        }
        write!(f, "{:<12} {:>10.4} s  over {} ticks", "step", total, self.ticks)
    }
}
