//! Planar pose of a disk-shaped agent.
//!
//! Positions are in millimetres with the origin at the arena's lower-left
//! corner.  `theta` is the heading in radians, 0 along +x and increasing
//! counter-clockwise, and is kept in `[0, 2π)`.

use std::f64::consts::TAU;

/// Wrap an angle into `[0, 2π)`.
///
/// `rem_euclid` can round a tiny negative input up to exactly `2π`; that case
/// folds back to 0.
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Position and heading of one agent.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub x:     f64,
    pub y:     f64,
    pub theta: f64,
}

impl Pose {
    /// Build a pose, normalizing `theta`.
    #[inline]
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta: wrap_angle(theta) }
    }

    /// Squared Euclidean distance between the two centres.
    #[inline]
    pub fn distance_sq(&self, other: &Pose) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance between the two centres.
    #[inline]
    pub fn distance_to(&self, other: &Pose) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Same position, heading replaced (and normalized).
    #[inline]
    pub fn with_theta(self, theta: f64) -> Self {
        Self { theta: wrap_angle(theta), ..self }
    }

    /// Point `dist` millimetres ahead of the centre along the heading.
    #[inline]
    pub fn ahead(&self, dist: f64) -> (f64, f64) {
        (self.x + dist * self.theta.cos(), self.y + dist * self.theta.sin())
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.4} rad)", self.x, self.y, self.theta)
    }
}
