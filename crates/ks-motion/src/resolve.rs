//! Commit a candidate pose according to its collision outcome.

use ks_agent::{Body, CollisionOutcome};
use ks_core::{Pose, wrap_angle};

/// Apply `candidate` to `body` given how it was classified.
///
/// - `None`: take the candidate pose; the collision timer resets.
/// - `Agent`: stay put and turn in place by `turn_speed·dt` in the agent's
///   current turn direction, advancing the collision timer.
/// - `Wall`: stay put but take the candidate heading.
pub fn resolve(body: &mut Body, candidate: &Pose, outcome: CollisionOutcome, dt: f64) {
    let theta = match outcome {
        CollisionOutcome::None => {
            body.pose.x = candidate.x;
            body.pose.y = candidate.y;
            body.collision.clear();
            candidate.theta
        }
        CollisionOutcome::Agent => {
            let dir = body.collision.register_contact();
            body.pose.theta + dir.sign() * body.calibration.turn_speed * dt
        }
        CollisionOutcome::Wall => candidate.theta,
    };
    body.pose.theta = wrap_angle(theta);
}
