//! dispersion — random-walk swarm demo for the kilosim simulator.
//!
//! Every robot drives forward, turns left or turns right, picking a new
//! motion every 1–4 seconds.  Its LED shows the ambient light under its nose
//! (red channel) and whether a neighbour closer than `crowded_distance` was
//! heard since its last control step (green channel).  All robots broadcast
//! a beacon so they can hear each other.
//!
//! Usage: `dispersion [config.json]` (defaults to `demos/dispersion/dispersion.json`).
//! Set `RUST_LOG=debug` for per-phase timings.

mod placement;


use std::env;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ks_agent::{AgentParams, Rgb};
use ks_behavior::{ControlIo, Controller, Message, Motion, estimate_distance};
use ks_core::SimRng;
use ks_output::{LogObserver, Logger, aggregate};
use ks_sim::{ConfigParser, NoopObserver, ScenarioConfig, SimBuilder, Simulation};

use placement::jittered_grid;

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_CONFIG:  &str = "demos/dispersion/dispersion.json";
const MAX_LIGHT:       f64  = 1023.0;

// ── Controller ────────────────────────────────────────────────────────────────

struct Disperser {
    /// Motion period bounds in on-board ticks.
    period_min:  u32,
    period_max:  u32,
    crowded:     u8,
    next_switch: u32,
    nearest:     u8,
    beacon:      Message,
}

impl Disperser {
    fn new(period_secs: [f64; 2], tick_rate: u16, crowded_distance: f64) -> Self {
        let to_ticks = |s: f64| (s * tick_rate as f64).round().max(1.0) as u32;
        let period_min = to_ticks(period_secs[0]);
        Self {
            period_min,
            period_max:  to_ticks(period_secs[1]).max(period_min),
            crowded:     estimate_distance(crowded_distance),
            next_switch: 0,
            nearest:     u8::MAX,
            beacon:      Message::default(),
        }
    }
}

impl Controller for Disperser {
    fn setup(&mut self, io: &mut ControlIo<'_>) {
        let mut data = [0u8; 9];
        data[..4].copy_from_slice(&io.id().0.to_le_bytes());
        self.beacon = Message::new(data);
        io.set_motion(Motion::Forward);
    }

    fn tick(&mut self, io: &mut ControlIo<'_>) {
        let now = io.kilo_ticks();
        if now >= self.next_switch {
            let motion = match io.rand_byte() % 3 {
                0 => Motion::Forward,
                1 => Motion::Left,
                _ => Motion::Right,
            };
            io.set_motion(motion);
            self.next_switch = now + io.rng().gen_range(self.period_min..=self.period_max);
        }

        let light = io.ambient_light() as f64 / MAX_LIGHT;
        let crowded = if self.nearest <= self.crowded { 1.0 } else { 0.0 };
        io.set_color(Rgb::new(light, crowded, 0.0));
        self.nearest = u8::MAX;
    }

    fn message_tx(&mut self) -> Option<Message> {
        Some(self.beacon)
    }

    fn message_rx(&mut self, message: &Message, distance: f64) {
        if message.is_valid() {
            self.nearest = self.nearest.min(estimate_distance(distance));
        }
    }
}

// ── Trial summary ─────────────────────────────────────────────────────────────

struct TrialSummary {
    trial:        u32,
    alive:        usize,
    mean_battery: Option<f64>,
    mean_nearest: f64,
    crowded:      usize,
    wall_secs:    f64,
}

fn summarize(trial: u32, sim: &Simulation<Disperser>, wall_secs: f64) -> TrialSummary {
    let views = sim.get_agents();
    let nearest: Vec<f64> = views
        .iter()
        .map(|a| {
            views
                .iter()
                .filter(|b| b.id != a.id)
                .map(|b| a.pose.distance_to(&b.pose))
                .fold(f64::INFINITY, f64::min)
        })
        .filter(|d| d.is_finite())
        .collect();
    let mean_nearest = if nearest.is_empty() { 0.0 } else { nearest.iter().sum::<f64>() / nearest.len() as f64 };

    TrialSummary {
        trial,
        alive:        views.iter().filter(|a| !a.dead).count(),
        mean_battery: aggregate::mean_battery(&views).first().copied(),
        mean_nearest,
        crowded:      views.iter().filter(|a| a.color.g > 0.5).count(),
        wall_secs,
    }
}

// ── Trial setup ───────────────────────────────────────────────────────────────

/// Scenario-specific controller settings.
#[derive(Copy, Clone, Debug)]
struct Behavior {
    /// Bounds, in seconds, of the time between motion changes.
    period:           [f64; 2],
    crowded_distance: f64,
}

/// A ready-to-run simulation for `trial`: agents on a jittered grid, each
/// driven by a `Disperser`.
fn build_trial(
    scenario: &ScenarioConfig,
    trial:    u32,
    behavior: &Behavior,
    rng:      &mut SimRng,
) -> Result<Simulation<Disperser>> {
    let config = scenario.sim_config(trial);
    let params = AgentParams::default();
    let poses = jittered_grid(scenario.num_agents, config.arena_width, config.arena_height, params.radius, rng)?;

    let tick_rate = config.tick_rate;
    let agents = poses
        .into_iter()
        .map(move |pose| (Disperser::new(behavior.period, tick_rate, behavior.crowded_distance), pose));
    let sim = SimBuilder::new(config).agents(agents, params).build()?;
    sim.check_validity()?;
    Ok(sim)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_owned());
    let parser = ConfigParser::from_path(&path).with_context(|| format!("reading {path}"))?;
    let scenario = ScenarioConfig::from_parser(&parser)?;
    let behavior = Behavior {
        period:           parser.get_or("turn_period", [1.0, 4.0])?,
        crowded_distance: parser.get_or("crowded_distance", 64.0)?,
    };

    println!("=== dispersion — kilosim swarm demo ===");
    println!(
        "Agents: {}  |  Arena: {} x {} mm  |  Duration: {} s  |  Trials: {}  |  Seed: {}",
        scenario.num_agents,
        scenario.arena_width,
        scenario.arena_height,
        scenario.trial_duration,
        scenario.trials,
        scenario.seed,
    );
    println!();

    let mut summaries = Vec::new();
    let mut master_rng = SimRng::new(scenario.seed);

    for trial in 0..scenario.trials {
        let mut placement_rng = master_rng.child(trial as u64);
        let mut sim = build_trial(&scenario, trial, &behavior, &mut placement_rng)?;

        let t0 = Instant::now();
        match &scenario.log_file_dir {
            Some(dir) => {
                let mut logger = Logger::new(dir, trial, scenario.overwrite_log)?;
                logger.add_aggregator("color", aggregate::mean_color)?;
                logger.add_aggregator("battery", aggregate::mean_battery)?;
                logger.add_aggregator("alive", aggregate::alive_count)?;
                logger.log_params(&parser.params())?;
                logger.log_state(&sim)?;

                let mut obs = LogObserver::new(logger);
                sim.run_until(scenario.trial_duration, &mut obs)?;
                if let Some(e) = obs.take_error() {
                    warn!(trial, error = %e, "log output incomplete");
                }
            }
            None => sim.run_until(scenario.trial_duration, &mut NoopObserver)?,
        }
        let wall_secs = t0.elapsed().as_secs_f64();

        println!("Trial {trial}: {} ticks in {wall_secs:.3} s", sim.get_tick());
        println!("{}", sim.phase_timings());
        summaries.push(summarize(trial, &sim, wall_secs));
    }

    println!(
        "{:<6} {:>6} {:>12} {:>14} {:>8} {:>9}",
        "Trial", "Alive", "Battery", "Nearest (mm)", "Crowded", "Wall (s)"
    );
    println!("{}", "-".repeat(60));
    for s in &summaries {
        let battery = s.mean_battery.map_or_else(|| "-".to_owned(), |b| format!("{b:.0}"));
        println!(
            "{:<6} {:>6} {:>12} {:>14.1} {:>8} {:>9.3}",
            s.trial, s.alive, battery, s.mean_nearest, s.crowded, s.wall_secs
        );
    }

    Ok(())
}
