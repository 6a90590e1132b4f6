//! Collision classification (phase ④).

use ks_agent::CollisionOutcome;
use ks_core::Pose;
use ks_spatial::CollisionGrid;

/// Label candidate `i`.
///
/// A candidate within one radius of any wall is `Wall` without looking for
/// neighbours.  Otherwise it is `Agent` if any other candidate centre is
/// closer than two radii, `None` if not.  `grid` must have been rebuilt
/// from `candidates`.
pub fn classify_one(
    i:          usize,
    candidates: &[Pose],
    grid:       &CollisionGrid,
    radius:     f64,
    width:      f64,
    height:     f64,
) -> CollisionOutcome {
    let p = candidates[i];
    if p.x <= radius || p.x >= width - radius || p.y <= radius || p.y >= height - radius {
        return CollisionOutcome::Wall;
    }
    let contact_sq = 4.0 * radius * radius;
    let hit = grid.query_neighbors(p.x, p.y, |j| j == i || candidates[j].distance_sq(&p) >= contact_sq);
    if hit { CollisionOutcome::Agent } else { CollisionOutcome::None }
}

/// Label every candidate into `out` (same length as `candidates`).
pub fn classify(
    candidates: &[Pose],
    grid:       &CollisionGrid,
    radius:     f64,
    (width, height): (f64, f64),
    out:        &mut [CollisionOutcome],
) {
    #[cfg(not(feature = "parallel"))]
    {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = classify_one(i, candidates, grid, radius, width, height);
        }
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        out.par_iter_mut().enumerate().for_each(|(i, slot)| {
            *slot = classify_one(i, candidates, grid, radius, width, height);
        });
    }
}
