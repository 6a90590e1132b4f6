//! A controller that does nothing.

use crate::{ControlIo, Controller};

/// Never moves, never transmits, ignores everything it receives.
///
/// Useful as a placeholder in tests or for static obstacles.
pub struct NoopController;

impl Controller for NoopController {
    fn tick(&mut self, _io: &mut ControlIo<'_>) {}
}
