//! The `Controller` trait — the main extension point for user code.

use crate::{ControlIo, Message};

/// Pluggable per-agent control program.
///
/// One instance runs on each agent.  The simulation calls the hooks in a
/// fixed order every tick:
///
/// 1. [`tick`][Self::tick] (skipped on the rare ticks the agent's clock
///    misses, and never once the battery is dead);
/// 2. on communication rounds, [`message_tx`][Self::message_tx] to collect
///    at most one outbound message, then [`message_rx`][Self::message_rx] on
///    every agent in range of a sender and
///    [`message_tx_success`][Self::message_tx_success] on the sender, once
///    per receiver.
///
/// Only [`tick`][Self::tick] is required.
///
/// # Thread safety
///
/// With the `parallel` feature the simulation runs `tick` for different
/// agents on different threads, so implementations must be `Send`.  Each
/// instance is only ever touched by one thread at a time.
///
/// # Example
///
/// ```rust,ignore
/// struct Blink { on: bool }
///
/// impl Controller for Blink {
///     fn tick(&mut self, io: &mut ControlIo<'_>) {
///         if io.kilo_ticks() % 32 == 0 {
///             self.on = !self.on;
///             io.set_color(if self.on { Rgb::new(1.0, 0.0, 0.0) } else { Rgb::OFF });
///         }
///     }
/// }
/// ```
pub trait Controller: Send + 'static {
    /// Called once when the agent is added to a simulation.
    fn setup(&mut self, _io: &mut ControlIo<'_>) {}

    /// Called once per executed control step.
    fn tick(&mut self, io: &mut ControlIo<'_>);

    /// The message to broadcast this round, if any.
    fn message_tx(&mut self) -> Option<Message> {
        None
    }

    /// A message arrived from an agent `distance` mm away.
    fn message_rx(&mut self, _message: &Message, _distance: f64) {}

    /// The last `message_tx` result reached one receiver.
    fn message_tx_success(&mut self) {}

    /// Whether this agent can exchange a message over `distance` mm.
    ///
    /// Both the sender and the receiver must accept the same distance for a
    /// message to be delivered.  Override to model asymmetric or noisy
    /// ranges.  Default: a disk of radius `nominal_range`.
    fn accepts_range(&self, distance: f64, nominal_range: f64) -> bool {
        distance <= nominal_range
    }
}

impl Controller for Box<dyn Controller> {
    fn setup(&mut self, io: &mut ControlIo<'_>) {
        (**self).setup(io)
    }

    fn tick(&mut self, io: &mut ControlIo<'_>) {
        (**self).tick(io)
    }

    fn message_tx(&mut self) -> Option<Message> {
        (**self).message_tx()
    }

    fn message_rx(&mut self, message: &Message, distance: f64) {
        (**self).message_rx(message, distance)
    }

    fn message_tx_success(&mut self) {
        (**self).message_tx_success()
    }

    fn accepts_range(&self, distance: f64, nominal_range: f64) -> bool {
        (**self).accepts_range(distance, nominal_range)
    }
}
