//! `ks-agent` — per-agent physical state for the `kilosim` simulator.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`body`]        | `Body` (everything the engine tracks per agent), `Rgb`    |
//! | [`params`]      | `AgentParams` (nominal values before noise)               |
//! | [`calibration`] | `Calibration`, clamped-Gaussian speed noise               |
//! | [`battery`]     | `Battery`, `BatterySpec`                                  |
//! | [`collision`]   | `CollisionOutcome`, `CollisionState`, `TurnDirection`     |
//! | [`motor`]       | `Motor`, `MotorDriver` (duty-cycle emulation)             |
//! | [`clock`]       | `KiloClock` (jittery on-board tick counter)               |
//!
//! Nothing here knows about other agents.  The simulation owns one `Body`
//! per slot and the motion crate turns bodies into candidate poses.

pub mod battery;
pub mod body;
pub mod calibration;
pub mod clock;
pub mod collision;
pub mod motor;
pub mod params;


pub use battery::{Battery, BatterySpec};
pub use body::{Body, Rgb};
pub use calibration::Calibration;
pub use clock::KiloClock;
pub use collision::{CollisionOutcome, CollisionState, TurnDirection};
pub use motor::{Motor, MotorDriver};
pub use params::AgentParams;
