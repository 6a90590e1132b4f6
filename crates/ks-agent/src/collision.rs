//! Collision classification result and the sticky turn-direction state
//! machine that drives an agent's response to bumping into a neighbour.

use ks_core::AgentRng;

/// Per-tick result of collision detection for one agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionOutcome {
    /// Candidate pose is clear.
    #[default]
    None,
    /// Candidate centre is within one radius of an arena wall.
    Wall,
    /// Candidate centre is within two radii of another agent's candidate.
    Agent,
}

/// Which way an agent rotates while pushing against a neighbour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnDirection {
    /// Counter-clockwise (theta increases).  Flag value 0.
    Ccw,
    /// Clockwise (theta decreases).  Flag value 1.
    Cw,
}

impl TurnDirection {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            TurnDirection::Ccw => TurnDirection::Cw,
            TurnDirection::Cw => TurnDirection::Ccw,
        }
    }

    /// +1 for CCW, -1 for CW.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            TurnDirection::Ccw => 1.0,
            TurnDirection::Cw => -1.0,
        }
    }
}

/// Sticky collision-response state of one agent.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionState {
    pub turn_dir: TurnDirection,
    /// Consecutive agent-collision ticks spent turning in `turn_dir`.
    pub timer: u32,
    /// Once `timer` exceeds this, `turn_dir` flips.
    pub max_timer: u32,
}

impl CollisionState {
    /// Random direction and a timeout of 10–30 seconds.
    pub fn random(tick_rate: u16, rng: &mut AgentRng) -> Self {
        let turn_dir = if rng.gen_range(0..=1u8) == 0 {
            TurnDirection::Ccw
        } else {
            TurnDirection::Cw
        };
        let max_timer = rng.gen_range(10..=30u32) * tick_rate as u32;
        Self { turn_dir, timer: 0, max_timer }
    }

    /// Called on a clear tick.
    #[inline]
    pub fn clear(&mut self) {
        self.timer = 0;
    }

    /// Called on an agent-collision tick.  Returns the direction to turn this
    /// tick; the flip (if the timeout elapsed) applies from the next tick.
    pub fn register_contact(&mut self) -> TurnDirection {
        let dir = self.turn_dir;
        self.timer += 1;
        if self.timer > self.max_timer {
            self.turn_dir = dir.flipped();
            self.timer = 0;
        }
        dir
    }
}
