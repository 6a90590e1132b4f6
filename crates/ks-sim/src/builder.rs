//! Fluent builder for constructing a [`Simulation`].

use ks_agent::AgentParams;
use ks_behavior::Controller;
use ks_core::{Pose, SimConfig};
use ks_spatial::LightPattern;

use crate::{SimResult, Simulation};

/// Fluent builder for [`Simulation<C>`].
///
/// # Optional inputs
///
/// | Method                | Default                                          |
/// |-----------------------|--------------------------------------------------|
/// | `.light_pattern(l)`   | loaded from `config.light_pattern`, else dark    |
/// | `.agent(c, pose, p)`  | no agents                                        |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .agent(Wander::default(), Pose::new(100.0, 100.0, 0.0), AgentParams::default())
///     .agent(Wander::default(), Pose::new(200.0, 100.0, 0.0), AgentParams::default())
///     .build()?;
/// ```
pub struct SimBuilder<C: Controller> {
    config: SimConfig,
    light:  Option<LightPattern>,
    agents: Vec<(C, Pose, AgentParams)>,
}

impl<C: Controller> SimBuilder<C> {
    pub fn new(config: SimConfig) -> Self {
        Self { config, light: None, agents: Vec::new() }
    }

    /// Use `light` instead of loading `config.light_pattern`.
    pub fn light_pattern(mut self, light: LightPattern) -> Self {
        self.light = Some(light);
        self
    }

    /// Queue an agent.  Agents get ids in the order they are queued.
    pub fn agent(mut self, controller: C, pose: Pose, params: AgentParams) -> Self {
        self.agents.push((controller, pose, params));
        self
    }

    /// Queue several agents sharing `params`.
    pub fn agents<I>(mut self, agents: I, params: AgentParams) -> Self
    where
        I: IntoIterator<Item = (C, Pose)>,
    {
        self.agents.extend(agents.into_iter().map(|(c, p)| (c, p, params)));
        self
    }

    /// Validate the config, load the light pattern, and add every agent.
    pub fn build(self) -> SimResult<Simulation<C>> {
        let mut sim = match self.light {
            Some(light) => Simulation::with_light(self.config, light)?,
            None => Simulation::new(self.config)?,
        };
        for (controller, pose, params) in self.agents {
            sim.add_agent(controller, pose, &params)?;
        }
        Ok(sim)
    }
}
