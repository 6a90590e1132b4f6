//! One simulated robot: physical body, control program, and RNG stream.

use ks_agent::{Battery, Body, CollisionOutcome, Motor, Rgb};
use ks_behavior::{ControlIo, Controller, Message};
use ks_core::{AgentId, AgentRng, Pose};
use ks_spatial::LightPattern;

/// An agent owned by a [`Simulation`][crate::Simulation].
///
/// Agents live in a dense `Vec` indexed by [`AgentId`]; a slot is never
/// reused or removed during a run.  Each agent carries its own RNG so that
/// every per-agent phase can run on any thread without changing results.
pub struct Agent<C: Controller> {
    pub(crate) id:         AgentId,
    pub(crate) body:       Body,
    pub(crate) controller: C,
    pub(crate) rng:        AgentRng,
    pub(crate) outcome:    CollisionOutcome,
}

impl<C: Controller> Agent<C> {
    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        self.body.pose
    }

    #[inline]
    pub fn controller(&self) -> &C {
        &self.controller
    }

    #[inline]
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.body.radius
    }

    /// Classification from the most recent tick.
    #[inline]
    pub fn last_outcome(&self) -> CollisionOutcome {
        self.outcome
    }

    #[inline]
    pub fn distance_to(&self, other: &Agent<C>) -> f64 {
        self.body.distance_to(&other.body)
    }

    /// Phase ①.  Returns `true` if the controller ran.
    ///
    /// The execution draw is made even for dead agents so that an agent's
    /// random stream does not depend on when it died.
    pub(crate) fn control_step(&mut self, p_exec: f64, light: &LightPattern) -> bool {
        if !self.rng.gen_bool(p_exec) || self.body.dead {
            return false;
        }
        let mut io = ControlIo::new(self.id, &mut self.body, &mut self.rng, light);
        self.controller.tick(&mut io);
        self.body.motor = self.body.driver.resolve();
        self.body.clock.advance(&mut self.rng);
        self.body.consume_energy();
        true
    }

    pub(crate) fn setup(&mut self, light: &LightPattern) {
        let mut io = ControlIo::new(self.id, &mut self.body, &mut self.rng, light);
        self.controller.setup(&mut io);
    }

    /// Tentative pose after one tick of `dt` seconds.
    #[inline]
    pub fn compute_candidate_pose(&self, dt: f64) -> Pose {
        ks_motion::candidate_pose(&self.body.pose, self.body.motor, &self.body.calibration, self.body.radius, dt)
    }

    /// Commit `candidate` according to `outcome` (phase ⑤).
    pub fn apply_resolved_pose(&mut self, candidate: &Pose, outcome: CollisionOutcome, dt: f64) {
        ks_motion::resolve(&mut self.body, candidate, outcome, dt);
        self.outcome = outcome;
    }

    /// Whether this agent can exchange a message over `distance` mm.
    #[inline]
    pub fn accepts_range(&self, distance: f64) -> bool {
        self.controller.accepts_range(distance, self.body.comm_range)
    }

    /// The message offered this round.  Dead agents never transmit.
    pub fn take_outbound_message(&mut self) -> Option<Message> {
        if self.body.dead {
            return None;
        }
        self.controller.message_tx()
    }

    pub fn deliver_message(&mut self, message: &Message, distance: f64) {
        self.controller.message_rx(message, distance);
    }

    pub fn notify_transmit_success(&mut self) {
        self.controller.message_tx_success();
    }

    /// Plain-data snapshot for loggers and renderers.
    pub fn view(&self) -> AgentView {
        AgentView {
            id:              self.id,
            pose:            self.body.pose,
            radius:          self.body.radius,
            motor:           self.body.motor,
            color:           self.body.color,
            battery:         self.body.battery,
            dead:            self.body.dead,
            outcome:         self.outcome,
            collision_timer: self.body.collision.timer,
            kilo_ticks:      self.body.clock.ticks,
        }
    }
}

/// Read-only copy of the externally interesting part of one agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentView {
    pub id:              AgentId,
    pub pose:            Pose,
    pub radius:          f64,
    pub motor:           Motor,
    pub color:           Rgb,
    pub battery:         Battery,
    pub dead:            bool,
    pub outcome:         CollisionOutcome,
    pub collision_timer: u32,
    pub kilo_ticks:      u32,
}
