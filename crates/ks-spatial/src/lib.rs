//! `ks-spatial` — spatial queries over the arena.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                      |
//! |-----------|---------------------------------------------------------------|
//! | [`grid`]  | `CollisionGrid`: fixed-capacity uniform grid for neighbour    |
//! |           | lookups during collision classification                       |
//! | [`light`] | `LightPattern`: ambient light field sampled from an image     |
//! | [`error`] | `SpatialError`, `SpatialResult<T>`                            |

pub mod error;
pub mod grid;
pub mod light;


pub use error::{SpatialError, SpatialResult};
pub use grid::{CollisionGrid, SLOTS_PER_CELL};
pub use light::LightPattern;
