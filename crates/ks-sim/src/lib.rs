//! `ks-sim` — tick loop orchestrator for the kilosim swarm simulator.
//!
//! # Five-phase tick pipeline
//!
//! ```text
//! step():
//!   ① Controllers — each agent's controller runs with probability p_exec;
//!                   motor duty cycles resolve to a motion command and the
//!                   battery is charged for movement.
//!   ② Messaging   — on ticks where tick % comm_rate == 0, every outbound
//!                   message is offered to every other agent; delivery needs
//!                   both ends to accept the measured distance.
//!   ③ Candidates  — tentative next pose per agent.
//!   ④ Classify    — rebuild the collision grid from all candidates, then
//!                   label each agent None / Wall / Agent.
//!   ⑤ Resolve     — commit poses according to the labels.
//!   then tick += 1
//! ```
//!
//! No phase starts before the previous one has finished for every agent.
//! Phases ①, ③, ④ and ⑤ touch only one agent's state per work item and run
//! on Rayon with the `parallel` feature; phase ② is always sequential.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the per-agent phases on Rayon's thread pool.      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ks_agent::AgentParams;
//! use ks_behavior::NoopController;
//! use ks_core::{Pose, SimConfig};
//! use ks_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::with_arena(1200.0, 1200.0))
//!     .agent(NoopController, Pose::new(100.0, 100.0, 0.0), AgentParams::default())
//!     .build()?;
//! sim.run_until(60.0, &mut NoopObserver)?;
//! ```

pub mod agent;
pub mod builder;
pub mod classify;
pub mod comm;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;
pub mod timing;

#[cfg(test)]
mod tests;

pub use agent::{Agent, AgentView};
pub use builder::SimBuilder;
pub use classify::{classify, classify_one};
pub use comm::CommRouter;
pub use config::{ConfigParser, ScenarioConfig};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Simulation;
pub use timing::{Phase, PhaseTimers};
