//! Emulated robot hardware exposed to controllers.

use ks_agent::{Battery, Body, Rgb};
use ks_core::{AgentId, AgentRng};
use ks_spatial::LightPattern;

use crate::Motion;

/// What a controller can see and touch during one callback.
///
/// Motor settings take effect when the simulation resolves them after
/// [`Controller::tick`][crate::Controller::tick] returns: both motors must
/// be spun up and set to their calibrated duty cycle to drive forward, one
/// motor alone turns the robot.
pub struct ControlIo<'a> {
    id:    AgentId,
    body:  &'a mut Body,
    rng:   &'a mut AgentRng,
    light: &'a LightPattern,
}

impl<'a> ControlIo<'a> {
    pub fn new(id: AgentId, body: &'a mut Body, rng: &'a mut AgentRng, light: &'a LightPattern) -> Self {
        Self { id, body, rng, light }
    }

    /// This agent's id, stable for the whole run.
    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The robot's on-board clock (about `tick_rate` per simulated second).
    #[inline]
    pub fn kilo_ticks(&self) -> u32 {
        self.body.clock.ticks
    }

    /// Overcome static friction on both motors.
    pub fn spinup_motors(&mut self) {
        self.body.driver.spinup();
    }

    /// Set raw duty cycles.
    pub fn set_motors(&mut self, left: u8, right: u8) {
        self.body.driver.set_motors(left, right);
    }

    /// Spin up and set duty cycles for `motion` in one call.
    pub fn set_motion(&mut self, motion: Motion) {
        let (left, right) = motion.duties();
        if motion != Motion::Stop {
            self.spinup_motors();
        }
        self.set_motors(left, right);
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.body.color = color;
    }

    /// Set the LED from the robots' packed 2-bit-per-channel byte
    /// (`0bBBGGRR`, each channel 0..=3).
    pub fn set_color_packed(&mut self, packed: u8) {
        self.set_color(Rgb::from_rgb2(packed));
    }

    pub fn color(&self) -> Rgb {
        self.body.color
    }

    /// 10-bit ambient light reading at the robot's front edge.
    pub fn ambient_light(&self) -> u16 {
        let (x, y) = self.body.pose.ahead(self.body.radius);
        self.light.ambient_light(x.trunc(), y.trunc())
    }

    /// Uniform random byte from the agent's own stream.
    pub fn rand_byte(&mut self) -> u8 {
        self.rng.random()
    }

    /// The agent's RNG, for anything beyond a random byte.
    pub fn rng(&mut self) -> &mut AgentRng {
        &mut *self.rng
    }

    pub fn battery(&self) -> Battery {
        self.body.battery
    }
}

/// Distance in whole millimetres, saturating at 255.
pub fn estimate_distance(distance: f64) -> u8 {
    distance.clamp(0.0, 255.0) as u8
}
