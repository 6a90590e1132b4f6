//! Initial agent placement.

use std::f64::consts::TAU;

use anyhow::{Result, bail};
use ks_core::{Pose, SimRng};

/// Clearance kept between neighbouring bodies and from the walls, in mm.
const GAP: f64 = 1.0;

/// `n` poses on a grid covering the arena, each jittered inside its cell and
/// given a random heading.  Bodies never overlap and never touch a wall.
pub fn jittered_grid(n: usize, width: f64, height: f64, radius: f64, rng: &mut SimRng) -> Result<Vec<Pose>> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let cols = ((n as f64 * width / height).sqrt().ceil() as usize).max(1);
    let rows = n.div_ceil(cols);
    let (cell_w, cell_h) = (width / cols as f64, height / rows as f64);

    let needed = 2.0 * (radius + GAP);
    if cell_w < needed || cell_h < needed {
        bail!(
            "{n} agents of radius {radius} mm do not fit in a {width} x {height} mm arena \
             ({cols} x {rows} cells of {cell_w:.1} x {cell_h:.1} mm)"
        );
    }
    let slack_x = (cell_w - needed) / 2.0;
    let slack_y = (cell_h - needed) / 2.0;

    let poses = (0..n)
        .map(|i| {
            let cx = (i % cols) as f64 * cell_w + cell_w / 2.0;
            let cy = (i / cols) as f64 * cell_h + cell_h / 2.0;
            let dx = if slack_x > 0.0 { rng.gen_range(-slack_x..=slack_x) } else { 0.0 };
            let dy = if slack_y > 0.0 { rng.gen_range(-slack_y..=slack_y) } else { 0.0 };
            Pose::new(cx + dx, cy + dy, rng.gen_range(0.0..TAU))
        })
        .collect();
    Ok(poses)
}
