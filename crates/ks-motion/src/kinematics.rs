//! Per-tick motion model.
//!
//! | Command     | Motion                                                       |
//! |-------------|--------------------------------------------------------------|
//! | `Forward`   | straight along the heading at `forward_speed`                |
//! | `RotateCw`  | turn by `-turn_speed·dt` about an off-centre pivot           |
//! | `RotateCcw` | turn by `+turn_speed·dt` about an off-centre pivot           |
//! | `Stop`      | none                                                         |
//!
//! The robots turn by running one of their two legs, so they pivot about a
//! point on the rim rather than their centre.  For a rotation of `phi` the
//! new heading is `theta' = theta + phi` and, with `(c, s)` the rim offset at
//! `theta' + offset`,
//!
//!   x' = x + c - c·cos(phi) + s·sin(phi)
//!   y' = y + s - c·sin(phi) - s·cos(phi)
//!
//! where `offset` is 4π/3 for clockwise turns and 2π/3 for counter-clockwise.

use std::f64::consts::PI;

use ks_agent::{Calibration, Motor};
use ks_core::{Pose, wrap_angle};

const CW_PIVOT: f64 = 4.0 * PI / 3.0;
const CCW_PIVOT: f64 = 2.0 * PI / 3.0;

/// Where an agent would be after one tick of `dt` seconds.
pub fn candidate_pose(pose: &Pose, motor: Motor, calibration: &Calibration, radius: f64, dt: f64) -> Pose {
    match motor {
        Motor::Stop => *pose,
        Motor::Forward => {
            let (x, y) = pose.ahead(calibration.forward_speed * dt);
            Pose { x, y, theta: pose.theta }
        }
        Motor::RotateCw => pivot(pose, -calibration.turn_speed * dt, CW_PIVOT, radius),
        Motor::RotateCcw => pivot(pose, calibration.turn_speed * dt, CCW_PIVOT, radius),
    }
}

fn pivot(pose: &Pose, phi: f64, offset: f64, radius: f64) -> Pose {
    let theta = pose.theta + phi;
    let c = radius * (theta + offset).cos();
    let s = radius * (theta + offset).sin();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Pose {
        x:     pose.x + c - c * cos_phi + s * sin_phi,
        y:     pose.y + s - c * sin_phi - s * cos_phi,
        theta: wrap_angle(theta),
    }
}
