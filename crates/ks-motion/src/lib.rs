//! `ks-motion` — how agents move.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`kinematics`] | `candidate_pose`: tentative next pose from motor command  |
//! | [`resolve`]    | `resolve`: write back a pose given its collision outcome  |
//!
//! # Two-step motion
//!
//! Each tick the simulation first asks every agent where it *would* go
//! ([`candidate_pose`]), classifies all candidates together, and only then
//! commits each agent's new pose with [`resolve`].  Both functions are pure
//! over a single agent's state, so the simulation may run them in parallel.

pub mod kinematics;
pub mod resolve;


pub use kinematics::candidate_pose;
pub use resolve::resolve;
