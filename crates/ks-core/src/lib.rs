//! `ks-core` — foundational types for the `kilosim` swarm simulator.
//!
//! This crate is a dependency of every other `ks-*` crate.  It has no `ks-*`
//! dependencies and only a few external ones (`rand`, `rand_distr`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`pose`]        | `Pose`, `wrap_angle`                                  |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`error`]       | `KsError`, `KsResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod pose;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{KsError, KsResult};
pub use ids::AgentId;
pub use pose::{Pose, wrap_angle};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
