//! The `Simulation` struct and its tick loop.

use std::path::Path;
#[cfg(feature = "parallel")]
use std::sync::Arc;
use std::time::Instant;

use ks_agent::{AgentParams, Body, CollisionOutcome};
use ks_behavior::Controller;
use ks_core::{AgentId, AgentRng, Pose, SimClock, SimConfig, Tick};
use ks_spatial::{CollisionGrid, LightPattern};
use tracing::{debug, error, info, warn};

use crate::{Agent, AgentView, CommRouter, Phase, PhaseTimers, SimError, SimObserver, SimResult, classify};

/// The main simulation runner.
///
/// `Simulation<C>` is the sole owner of every agent and of the tick
/// counter.  Agents are stored densely in insertion order and addressed by
/// [`AgentId`]; collaborators read them through [`get_agents`][Self::get_agents]
/// or [`agents`][Self::agents] and never hold references across a `step()`.
///
/// All agents must share one body radius.  The first agent added fixes it
/// and sizes the collision grid; later agents with a different radius are
/// forced to it (with a warning).
///
/// Create with [`Simulation::new`] or [`SimBuilder`][crate::SimBuilder].
pub struct Simulation<C: Controller> {
    config:     SimConfig,
    clock:      SimClock,
    agents:     Vec<Agent<C>>,
    radius:     Option<f64>,
    grid:       Option<CollisionGrid>,
    light:      LightPattern,
    router:     CommRouter,
    /// Phase ③ output, indexed like `agents`.
    candidates: Vec<Pose>,
    /// Phase ④ output, indexed like `agents`.
    outcomes:   Vec<CollisionOutcome>,
    deliveries: usize,
    timers:     PhaseTimers,
    poisoned:   bool,
    #[cfg(feature = "parallel")]
    pool:       Option<Arc<rayon::ThreadPool>>,
}

impl<C: Controller> Simulation<C> {
    // ── Construction ──────────────────────────────────────────────────────

    /// Validate `config` and load its light pattern (if any).
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let light = match &config.light_pattern {
            Some(path) => LightPattern::from_path(path, config.arena_width)?,
            None => LightPattern::dark(),
        };
        Self::with_light(config, light)
    }

    /// Default settings for a `width` × `height` arena with an optional light
    /// image and worker-thread hint.
    pub fn with_arena(
        width:       f64,
        height:      f64,
        light_image: Option<&Path>,
        num_threads: Option<usize>,
    ) -> SimResult<Self> {
        Self::new(SimConfig {
            light_pattern: light_image.map(Path::to_path_buf),
            num_threads,
            ..SimConfig::with_arena(width, height)
        })
    }

    /// Like [`new`][Self::new] but with an already-loaded light pattern;
    /// `config.light_pattern` is ignored.
    pub fn with_light(config: SimConfig, light: LightPattern) -> SimResult<Self> {
        config.validate()?;

        #[cfg(feature = "parallel")]
        let pool = match config.num_threads {
            Some(n) => Some(Arc::new(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::ThreadPool(e.to_string()))?,
            )),
            None => None,
        };

        info!(
            width = config.arena_width,
            height = config.arena_height,
            tick_rate = config.tick_rate,
            comm_rate = config.comm_rate,
            p_exec = config.p_exec,
            seed = config.seed,
            light = light.has_source(),
            "simulation created"
        );

        Ok(Self {
            clock: config.make_clock(),
            router: CommRouter::new(config.comm_rate),
            config,
            agents: Vec::new(),
            radius: None,
            grid: None,
            light,
            candidates: Vec::new(),
            outcomes: Vec::new(),
            deliveries: 0,
            timers: PhaseTimers::default(),
            poisoned: false,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    /// Add an agent at `pose` and run its controller's `setup`.
    ///
    /// Calibration noise, collision timeout and battery are drawn here from
    /// the agent's own RNG stream.  Nothing is rejected: an agent placed on
    /// top of another is only reported by [`check_validity`][Self::check_validity].
    pub fn add_agent(&mut self, controller: C, pose: Pose, params: &AgentParams) -> SimResult<AgentId> {
        let id = AgentId(self.agents.len() as u32);
        let pose = Pose::new(pose.x, pose.y, pose.theta);
        let mut rng = AgentRng::new(self.config.seed, id);
        let mut body = Body::init(params, pose, self.config.tick_rate, &mut rng);

        match self.radius {
            None => {
                let grid = CollisionGrid::new(self.config.arena_width, self.config.arena_height, 2.0 * params.radius)?;
                debug!(radius = params.radius, cells = ?grid.dimensions(), "collision grid sized");
                self.grid = Some(grid);
                self.radius = Some(params.radius);
            }
            Some(r) if r != params.radius => {
                warn!(agent = %id, expected = r, got = params.radius, "agent radius differs from the simulation's; using the simulation radius");
                body.radius = r;
            }
            Some(_) => {}
        }

        let mut agent = Agent { id, body, controller, rng, outcome: CollisionOutcome::None };
        agent.setup(&self.light);
        self.agents.push(agent);
        self.candidates.push(pose);
        self.outcomes.push(CollisionOutcome::None);
        Ok(id)
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance one tick: run all five phases, then increment the tick.
    ///
    /// A grid overflow is fatal: the error is returned and every later call
    /// returns [`SimError::Poisoned`].
    pub fn step(&mut self) -> SimResult<()> {
        self.step_counted().map(|_| ())
    }

    /// Run exactly `n` ticks, calling observer hooks around each.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step_observed(observer)?;
        }
        debug!(tick = self.clock.current_tick.0, "\n{}", self.timers);
        Ok(())
    }

    /// Step until simulated time reaches `seconds`, then call `on_sim_end`.
    pub fn run_until<O: SimObserver>(&mut self, seconds: f64, observer: &mut O) -> SimResult<()> {
        while self.get_time() < seconds {
            self.step_observed(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        debug!(tick = self.clock.current_tick.0, "\n{}", self.timers);
        Ok(())
    }

    fn step_observed<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let executed = self.step_counted()?;
        observer.on_tick_end(now, executed);

        let done = self.clock.current_tick;
        if done.is_every(self.config.snapshot_interval_ticks) {
            let views = self.get_agents();
            observer.on_snapshot(done, self.get_time(), &views);
        }
        Ok(())
    }

    fn step_counted(&mut self) -> SimResult<usize> {
        if self.poisoned {
            return Err(SimError::Poisoned);
        }

        #[cfg(feature = "parallel")]
        let result = match self.pool.clone() {
            Some(pool) => pool.install(|| self.process_tick()),
            None => self.process_tick(),
        };
        #[cfg(not(feature = "parallel"))]
        let result = self.process_tick();

        if let Err(e) = &result {
            error!(tick = self.clock.current_tick.0, error = %e, "fatal error; simulation halted");
            self.poisoned = true;
        }
        result
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self) -> SimResult<usize> {
        let now = self.clock.current_tick;
        let dt = self.clock.tick_duration();

        // ── Phase ①: controllers ─────────────────────────────────────────
        let t = Instant::now();
        let executed = self.run_controllers();
        self.timers.record(Phase::Controllers, t.elapsed());

        // ── Phase ②: communication ───────────────────────────────────────
        let t = Instant::now();
        self.deliveries = if self.router.is_round(now) { self.router.route(&mut self.agents) } else { 0 };
        self.timers.record(Phase::Communicate, t.elapsed());

        // ── Phase ③: candidate poses ─────────────────────────────────────
        let t = Instant::now();
        self.compute_candidates(dt);
        self.timers.record(Phase::Candidates, t.elapsed());

        // ── Phase ④: rebuild grid, classify ──────────────────────────────
        //
        // The grid exists once the first agent is added.
        let t = Instant::now();
        if let (Some(grid), Some(radius)) = (self.grid.as_mut(), self.radius) {
            grid.rebuild(self.candidates.iter().map(|p| (p.x, p.y)))?;
            let dims = (self.config.arena_width, self.config.arena_height);
            classify(&self.candidates, grid, radius, dims, &mut self.outcomes);
        }
        self.timers.record(Phase::Classify, t.elapsed());

        // ── Phase ⑤: resolve ─────────────────────────────────────────────
        let t = Instant::now();
        self.resolve_all(dt);
        self.timers.record(Phase::Resolve, t.elapsed());

        self.clock.advance();
        self.timers.finish_tick();
        Ok(executed)
    }

    fn run_controllers(&mut self) -> usize {
        let p_exec = self.config.p_exec;
        let light = &self.light;

        #[cfg(not(feature = "parallel"))]
        {
            self.agents.iter_mut().map(|a| a.control_step(p_exec, light) as usize).sum()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.agents.par_iter_mut().map(|a| a.control_step(p_exec, light) as usize).sum()
        }
    }

    fn compute_candidates(&mut self, dt: f64) {
        #[cfg(not(feature = "parallel"))]
        {
            for (agent, slot) in self.agents.iter().zip(self.candidates.iter_mut()) {
                *slot = agent.compute_candidate_pose(dt);
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // `par_iter_mut` keeps the bound at `C: Send`.
            self.agents
                .par_iter_mut()
                .zip(self.candidates.par_iter_mut())
                .for_each(|(agent, slot)| *slot = agent.compute_candidate_pose(dt));
        }
    }

    fn resolve_all(&mut self, dt: f64) {
        #[cfg(not(feature = "parallel"))]
        {
            for ((agent, candidate), &outcome) in
                self.agents.iter_mut().zip(&self.candidates).zip(&self.outcomes)
            {
                agent.apply_resolved_pose(candidate, outcome, dt);
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.agents
                .par_iter_mut()
                .zip(self.candidates.par_iter())
                .zip(self.outcomes.par_iter())
                .for_each(|((agent, candidate), &outcome)| {
                    agent.apply_resolved_pose(candidate, outcome, dt);
                });
        }
    }

    // ── Read accessors ────────────────────────────────────────────────────

    /// Simulated seconds elapsed.
    #[inline]
    pub fn get_time(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    /// Number of completed steps.
    #[inline]
    pub fn get_tick(&self) -> u64 {
        self.clock.current_tick.0
    }

    #[inline]
    pub fn tick(&self) -> Tick {
        self.clock.current_tick
    }

    /// Arena `(width, height)` in mm.
    #[inline]
    pub fn get_dimensions(&self) -> (f64, f64) {
        (self.config.arena_width, self.config.arena_height)
    }

    /// Snapshot of every agent, in id order.
    pub fn get_agents(&self) -> Vec<AgentView> {
        self.agents.iter().map(Agent::view).collect()
    }

    #[inline]
    pub fn agents(&self) -> &[Agent<C>] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> SimResult<&Agent<C>> {
        self.agents.get(id.index()).ok_or(SimError::AgentNotFound(id))
    }

    pub fn agent_mut(&mut self, id: AgentId) -> SimResult<&mut Agent<C>> {
        self.agents.get_mut(id.index()).ok_or(SimError::AgentNotFound(id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// The shared body radius, once an agent has been added.
    #[inline]
    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn light_pattern(&self) -> &LightPattern {
        &self.light
    }

    /// Messages delivered during the last tick (0 outside comm rounds).
    #[inline]
    pub fn last_deliveries(&self) -> usize {
        self.deliveries
    }

    #[inline]
    pub fn phase_timings(&self) -> &PhaseTimers {
        &self.timers
    }

    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    // ── Debug audit ───────────────────────────────────────────────────────

    /// O(n²) scan for agents whose centres are closer than two radii.
    ///
    /// Reports the first overlapping pair in id order; fixes nothing.
    pub fn check_validity(&self) -> SimResult<()> {
        let Some(radius) = self.radius else {
            return Ok(());
        };
        let contact = 2.0 * radius;
        for (i, a) in self.agents.iter().enumerate() {
            for b in &self.agents[i + 1..] {
                let distance = a.distance_to(b);
                if distance < contact {
                    warn!(a = %a.id, b = %b.id, distance, "overlapping agents");
                    return Err(SimError::Overlap { a: a.id, b: b.id, distance });
                }
            }
        }
        Ok(())
    }
}
