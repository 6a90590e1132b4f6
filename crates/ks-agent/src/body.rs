//! `Body`: everything the engine tracks about one physical agent.

use ks_core::{AgentRng, Pose};
use tracing::debug;

use crate::battery::Battery;
use crate::calibration::Calibration;
use crate::clock::KiloClock;
use crate::collision::CollisionState;
use crate::motor::{Motor, MotorDriver};
use crate::params::AgentParams;

/// LED colour, each channel in `[0, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const OFF: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    /// Shown by an agent whose battery ran out.
    pub const DEAD: Rgb = Rgb { r: 0.3, g: 0.3, b: 0.3 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Decode the robots' 2-bit-per-channel colour byte (`0bBBGGRR`).
    pub fn from_rgb2(packed: u8) -> Self {
        let ch = |shift: u8| ((packed >> shift) & 0b11) as f64 / 3.0;
        Self { r: ch(0), g: ch(2), b: ch(4) }
    }
}

/// Physical state of one agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub pose:        Pose,
    pub motor:       Motor,
    pub calibration: Calibration,
    pub radius:      f64,
    pub comm_range:  f64,
    pub battery:     Battery,
    pub collision:   CollisionState,
    pub color:       Rgb,
    pub dead:        bool,
    pub driver:      MotorDriver,
    pub clock:       KiloClock,
}

impl Body {
    /// Build a body at `pose`, drawing its per-agent randomness.
    ///
    /// Draw order is fixed (turn direction, collision timeout, turn-speed
    /// noise, forward-speed noise, battery) so that a seed always yields
    /// the same agent.
    pub fn init(params: &AgentParams, pose: Pose, tick_rate: u16, rng: &mut AgentRng) -> Self {
        let collision = CollisionState::random(tick_rate, rng);
        let calibration = if params.calibration_noise {
            Calibration::sample(params.forward_speed, params.turn_speed, rng)
        } else {
            Calibration::nominal(params.forward_speed, params.turn_speed)
        };
        let battery = params.battery.realize(rng);
        Self {
            pose,
            motor: Motor::Stop,
            calibration,
            radius: params.radius,
            comm_range: params.comm_range,
            battery,
            collision,
            color: Rgb::OFF,
            dead: false,
            driver: MotorDriver::default(),
            clock: KiloClock::default(),
        }
    }

    /// Charge one tick of movement against the battery; kills the agent
    /// when it runs out.  Stationary agents and dead agents pay nothing.
    pub fn consume_energy(&mut self) {
        if self.dead || !self.motor.is_moving() {
            return;
        }
        if self.battery.drain() {
            self.kill();
        }
    }

    /// Permanently disable the agent.
    pub fn kill(&mut self) {
        if !self.dead {
            debug!(x = self.pose.x, y = self.pose.y, "agent battery depleted");
        }
        self.calibration = Calibration::zeroed();
        self.motor = Motor::Stop;
        self.driver.halt();
        self.color = Rgb::DEAD;
        self.dead = true;
    }

    /// Centre-to-centre distance to another body.
    #[inline]
    pub fn distance_to(&self, other: &Body) -> f64 {
        self.pose.distance_to(&other.pose)
    }
}
