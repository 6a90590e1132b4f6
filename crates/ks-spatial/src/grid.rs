//! Uniform-grid broad phase for agent–agent collision tests.
//!
//! # Layout
//!
//! The arena is cut into square cells whose side equals one body diameter,
//! `ceil(width / d)` by `ceil(height / d)` of them.  Every cell owns
//! [`SLOTS_PER_CELL`] slots in one flat `Vec`; a slot holds an agent index or
//! `EMPTY`.  Two disks of diameter `d` that touch must sit in the same or
//! adjacent cells, so a query only scans the 3×3 block around a point.
//!
//! Clearing is proportional to the number of agents, not the number of
//! cells: `rebuild` remembers which slots it filled and resets only those.
//!
//! A cell of side `d` can hold at most four non-overlapping disk centres, so
//! a fifth occupant is reported as [`SpatialError::CellOverflow`].

use tracing::trace;

use crate::{SpatialError, SpatialResult};

/// Slots reserved per grid cell.
pub const SLOTS_PER_CELL: usize = 4;

const EMPTY: u32 = u32::MAX;

/// Visit order for the 3×3 neighbourhood, centre cell first.
const NEIGHBORHOOD: [(i64, i64); 9] = [
    (0, 0),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Fixed-capacity spatial hash over the arena.
#[derive(Clone, Debug)]
pub struct CollisionGrid {
    diameter:   f64,
    bwidth:     usize,
    bheight:    usize,
    slots:      Vec<u32>,
    cells_used: Vec<usize>,
}

impl CollisionGrid {
    /// Grid covering a `width` × `height` arena with cells of side `diameter`.
    pub fn new(width: f64, height: f64, diameter: f64) -> SpatialResult<Self> {
        if !(diameter > 0.0 && width > 0.0 && height > 0.0) {
            return Err(SpatialError::Geometry(format!(
                "arena {width} x {height} with cell size {diameter}"
            )));
        }
        let bwidth = (width / diameter).ceil() as usize;
        let bheight = (height / diameter).ceil() as usize;
        Ok(Self {
            diameter,
            bwidth,
            bheight,
            slots: vec![EMPTY; SLOTS_PER_CELL * bwidth * bheight],
            cells_used: Vec::new(),
        })
    }

    /// Grid size in cells, `(columns, rows)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.bwidth, self.bheight)
    }

    /// Number of agents currently indexed.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells_used.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells_used.is_empty()
    }

    /// Cell containing `(x, y)`.  Points outside the arena are clamped to the
    /// border cells.
    #[inline]
    pub fn cell_of(&self, x: f64, y: f64) -> (usize, usize) {
        (
            Self::bin(x / self.diameter, self.bwidth),
            Self::bin(y / self.diameter, self.bheight),
        )
    }

    #[inline]
    fn bin(scaled: f64, count: usize) -> usize {
        // `as` saturates negatives and NaN to 0.
        (scaled.floor() as usize).min(count - 1)
    }

    /// Empty every slot filled by the previous `rebuild`.
    pub fn clear(&mut self) {
        for &slot in &self.cells_used {
            self.slots[slot] = EMPTY;
        }
        self.cells_used.clear();
    }

    /// Re-index all agents.  Agent `i` is the `i`-th position yielded.
    pub fn rebuild<I>(&mut self, positions: I) -> SpatialResult<()>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        self.clear();
        for (agent, (x, y)) in positions.into_iter().enumerate() {
            self.insert(agent, x, y)?;
        }
        trace!(agents = self.cells_used.len(), "collision grid rebuilt");
        Ok(())
    }

    fn insert(&mut self, agent: usize, x: f64, y: f64) -> SpatialResult<()> {
        let (cx, cy) = self.cell_of(x, y);
        let base = SLOTS_PER_CELL * (cy * self.bwidth + cx);
        let free = self.slots[base..base + SLOTS_PER_CELL]
            .iter()
            .position(|&s| s == EMPTY)
            .ok_or(SpatialError::CellOverflow { agent, cell_x: cx, cell_y: cy })?;
        self.slots[base + free] = agent as u32;
        self.cells_used.push(base + free);
        Ok(())
    }

    /// Call `visit` with every agent index in the 3×3 block of cells around
    /// `(x, y)`.  `visit` returns whether scanning should continue.
    ///
    /// Returns `true` if the scan was stopped early.
    pub fn query_neighbors<F>(&self, x: f64, y: f64, mut visit: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        let (cx, cy) = self.cell_of(x, y);
        for (dx, dy) in NEIGHBORHOOD {
            let bx = cx as i64 + dx;
            let by = cy as i64 + dy;
            if bx < 0 || by < 0 || bx >= self.bwidth as i64 || by >= self.bheight as i64 {
                continue;
            }
            let base = SLOTS_PER_CELL * (by as usize * self.bwidth + bx as usize);
            for &slot in &self.slots[base..base + SLOTS_PER_CELL] {
                if slot != EMPTY && !visit(slot as usize) {
                    return true;
                }
            }
        }
        false
    }

    /// Collect every candidate index around `(x, y)`.
    pub fn neighbors(&self, x: f64, y: f64) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_neighbors(x, y, |i| {
            out.push(i);
            true
        });
        out
    }
}
