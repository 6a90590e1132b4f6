//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `ks-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// More agents landed in one grid cell than it has slots for.  With the
    /// cell side equal to one body diameter this means bodies overlap badly.
    #[error("grid cell ({cell_x}, {cell_y}) is full; cannot place agent index {agent}")]
    CellOverflow { agent: usize, cell_x: usize, cell_y: usize },

    #[error("invalid grid geometry: {0}")]
    Geometry(String),

    #[error("light pattern image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
