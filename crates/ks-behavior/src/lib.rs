//! `ks-behavior` — the user-facing control surface.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`controller`] | `Controller` trait: per-tick control and message hooks     |
//! | [`io`]         | `ControlIo<'a>`: emulated robot hardware seen by a         |
//! |                | controller (motors, LED, clock, light sensor, RNG)         |
//! | [`message`]    | `Message` (9-byte payload + checksum), `Motion`            |
//! | [`noop`]       | `NoopController`: never moves, never talks                 |
//!
//! # Design notes
//!
//! A controller owns only its own algorithm state.  Everything physical
//! (pose, calibration, battery, motors) lives in the agent's
//! [`Body`][ks_agent::Body] and is reached through a short-lived
//! [`ControlIo`] borrowed for the duration of one callback.  Controllers
//! never see their own pose or any other agent; the only inputs are the
//! emulated sensors and received messages.

pub mod controller;
pub mod io;
pub mod message;
pub mod noop;


pub use controller::Controller;
pub use io::{ControlIo, estimate_distance};
pub use message::{MESSAGE_BYTES, Message, Motion};
pub use noop::NoopController;
