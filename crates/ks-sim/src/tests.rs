//! Integration tests for ks-sim.

use std::f64::consts::PI;

use ks_agent::{AgentParams, BatterySpec};
use ks_behavior::{ControlIo, Controller, Message, Motion};
use ks_core::{Pose, SimConfig};

use crate::{SimBuilder, Simulation};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config() -> SimConfig {
    SimConfig { p_exec: 1.0, seed: 42, ..SimConfig::with_arena(1000.0, 1000.0) }
}

fn exact_params() -> AgentParams {
    AgentParams::default().without_noise().with_battery(BatterySpec::Infinite)
}

/// Scriptable controller that records everything it is told.
#[derive(Default)]
struct Probe {
    motion:       Option<Motion>,
    outbound:     Option<Message>,
    range:        Option<f64>,
    received:     Vec<(Message, f64)>,
    successes:    usize,
    ticks:        usize,
    setup_called: bool,
}

impl Probe {
    fn moving(motion: Motion) -> Self {
        Self { motion: Some(motion), ..Self::default() }
    }

    fn sending(data: u8) -> Self {
        Self { outbound: Some(Message::new([data; 9])), ..Self::default() }
    }
}

impl Controller for Probe {
    fn setup(&mut self, _io: &mut ControlIo<'_>) {
        self.setup_called = true;
    }

    fn tick(&mut self, io: &mut ControlIo<'_>) {
        self.ticks += 1;
        if let Some(m) = self.motion {
            io.set_motion(m);
        }
    }

    fn message_tx(&mut self) -> Option<Message> {
        self.outbound
    }

    fn message_rx(&mut self, message: &Message, distance: f64) {
        self.received.push((*message, distance));
    }

    fn message_tx_success(&mut self) {
        self.successes += 1;
    }

    fn accepts_range(&self, distance: f64, nominal_range: f64) -> bool {
        distance <= self.range.unwrap_or(nominal_range)
    }
}

/// Random walk: a new random motion every 16–80 on-board ticks.
#[derive(Default)]
struct Wander {
    next_change: u32,
}

impl Controller for Wander {
    fn tick(&mut self, io: &mut ControlIo<'_>) {
        if io.kilo_ticks() >= self.next_change {
            let motion = match io.rand_byte() % 3 {
                0 => Motion::Forward,
                1 => Motion::Left,
                _ => Motion::Right,
            };
            io.set_motion(motion);
            self.next_change = io.kilo_ticks() + 16 + (io.rand_byte() % 64) as u32;
        }
    }

    fn message_tx(&mut self) -> Option<Message> {
        Some(Message::new([0; 9]))
    }
}

/// `n` wandering agents on a 60 mm lattice, default (noisy) parameters.
fn wander_sim(config: SimConfig, n: usize) -> Simulation<Wander> {
    let per_row = 12;
    let agents = (0..n).map(|i| {
        let x = 100.0 + 60.0 * (i % per_row) as f64;
        let y = 100.0 + 60.0 * (i / per_row) as f64;
        (Wander::default(), Pose::new(x, y, i as f64 * 0.7))
    });
    SimBuilder::new(config)
        .agents(agents, AgentParams::default().with_battery(BatterySpec::Infinite))
        .build()
        .unwrap()
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use ks_core::AgentId;

    use super::*;
    use crate::SimError;

    #[test]
    fn builds_and_runs_setup() {
        let sim = SimBuilder::new(test_config())
            .agent(Probe::default(), Pose::new(100.0, 100.0, 0.0), exact_params())
            .agent(Probe::default(), Pose::new(200.0, 100.0, 0.0), exact_params())
            .build()
            .unwrap();
        assert_eq!(sim.len(), 2);
        assert_eq!(sim.radius(), Some(16.0));
        assert!(sim.agents().iter().all(|a| a.controller().setup_called));
        assert_eq!(sim.agents()[1].id(), AgentId(1));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimConfig { p_exec: 1.5, ..test_config() };
        assert!(matches!(Simulation::<Probe>::new(config), Err(SimError::Core(_))));
    }

    #[test]
    fn missing_light_image_fails_fast() {
        let result = Simulation::<Probe>::with_arena(
            1000.0,
            1000.0,
            Some(std::path::Path::new("/nonexistent/pattern.png")),
            None,
        );
        assert!(matches!(result, Err(SimError::Spatial(_))));
    }

    #[test]
    fn mismatched_radius_is_forced_to_first() {
        let mut sim = Simulation::new(test_config()).unwrap();
        sim.add_agent(Probe::default(), Pose::new(100.0, 100.0, 0.0), &exact_params()).unwrap();
        let id = sim
            .add_agent(Probe::default(), Pose::new(300.0, 100.0, 0.0), &exact_params().with_radius(10.0))
            .unwrap();
        assert_eq!(sim.agent(id).unwrap().radius(), 16.0);
    }

    #[test]
    fn unknown_agent() {
        let sim = Simulation::<Probe>::new(test_config()).unwrap();
        assert!(matches!(sim.agent(AgentId(3)), Err(SimError::AgentNotFound(AgentId(3)))));
    }

    #[test]
    fn theta_is_normalized_on_add() {
        let mut sim = Simulation::new(test_config()).unwrap();
        let id = sim.add_agent(Probe::default(), Pose { x: 100.0, y: 100.0, theta: -PI / 2.0 }, &exact_params()).unwrap();
        assert!((sim.agent(id).unwrap().pose().theta - 1.5 * PI).abs() < 1e-12);
    }
}

// ── Tick / time ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod clock_tests {
    use super::*;

    #[test]
    fn tick_and_time_advance() {
        let mut sim = Simulation::<Probe>::new(test_config()).unwrap();
        assert_eq!(sim.get_tick(), 0);
        for _ in 0..48 {
            sim.step().unwrap();
        }
        assert_eq!(sim.get_tick(), 48);
        assert!((sim.get_time() - 1.5).abs() < 1e-12);
        assert_eq!(sim.get_dimensions(), (1000.0, 1000.0));
        assert_eq!(sim.phase_timings().ticks(), 48);
    }

    #[test]
    fn p_exec_zero_never_runs_controllers() {
        let config = SimConfig { p_exec: 0.0, ..test_config() };
        let mut sim = SimBuilder::new(config)
            .agent(Probe::moving(Motion::Forward), Pose::new(500.0, 500.0, 0.0), exact_params())
            .build()
            .unwrap();
        for _ in 0..20 {
            sim.step().unwrap();
        }
        let a = &sim.agents()[0];
        assert_eq!(a.controller().ticks, 0);
        assert_eq!(a.pose(), Pose::new(500.0, 500.0, 0.0));
    }
}

// ── Collisions ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod collision_tests {
    use ks_agent::CollisionOutcome;

    use super::*;

    #[test]
    fn head_on_pair_freezes_and_counts() {
        let mut sim = SimBuilder::new(test_config())
            .agent(Probe::moving(Motion::Forward), Pose::new(483.5, 500.0, 0.0), exact_params())
            .agent(Probe::moving(Motion::Forward), Pose::new(516.5, 500.0, PI), exact_params())
            .build()
            .unwrap();

        sim.step().unwrap();
        let views = sim.get_agents();
        for (v, x) in views.iter().zip([483.5, 516.5]) {
            assert_eq!(v.outcome, CollisionOutcome::Agent);
            assert_eq!((v.pose.x, v.pose.y), (x, 500.0));
            assert_eq!(v.collision_timer, 1);
        }

        sim.step().unwrap();
        for v in sim.get_agents() {
            assert_eq!(v.outcome, CollisionOutcome::Agent);
            assert_eq!(v.collision_timer, 2);
        }
    }

    #[test]
    fn facing_wall_keeps_position() {
        let mut sim = SimBuilder::new(test_config())
            .agent(Probe::moving(Motion::Forward), Pose::new(16.0, 500.0, PI), exact_params())
            .build()
            .unwrap();
        sim.step().unwrap();
        let v = sim.get_agents()[0];
        assert_eq!(v.outcome, CollisionOutcome::Wall);
        assert_eq!((v.pose.x, v.pose.y), (16.0, 500.0));
        assert_eq!(v.pose.theta, PI);
    }

    #[test]
    fn wall_takes_candidate_heading() {
        let mut sim = SimBuilder::new(test_config())
            .agent(Probe::moving(Motion::Right), Pose::new(10.0, 500.0, PI), exact_params())
            .build()
            .unwrap();
        sim.step().unwrap();
        let v = sim.get_agents()[0];
        assert_eq!(v.outcome, CollisionOutcome::Wall);
        assert_eq!((v.pose.x, v.pose.y), (10.0, 500.0));
        assert!((v.pose.theta - (PI - 0.5 / 32.0)).abs() < 1e-12);
    }

    #[test]
    fn clear_path_accepts_candidate() {
        let mut sim = SimBuilder::new(test_config())
            .agent(Probe::moving(Motion::Forward), Pose::new(500.0, 500.0, 0.0), exact_params())
            .build()
            .unwrap();
        sim.step().unwrap();
        let v = sim.get_agents()[0];
        assert_eq!(v.outcome, CollisionOutcome::None);
        assert!((v.pose.x - 500.75).abs() < 1e-12);
        assert_eq!(v.collision_timer, 0);
    }

    /// Timer reset and wall containment over a long random run.
    #[test]
    fn invariants_hold_while_wandering() {
        let mut sim = wander_sim(test_config(), 120);
        let (w, h) = sim.get_dimensions();
        for _ in 0..600 {
            sim.step().unwrap();
            for v in sim.get_agents() {
                assert!((0.0..std::f64::consts::TAU).contains(&v.pose.theta));
                if v.outcome == CollisionOutcome::None {
                    assert_eq!(v.collision_timer, 0, "{}", v.id);
                }
                if v.outcome != CollisionOutcome::Wall {
                    assert!(v.pose.x >= v.radius && v.pose.x <= w - v.radius, "{} x = {}", v.id, v.pose.x);
                    assert!(v.pose.y >= v.radius && v.pose.y <= h - v.radius, "{} y = {}", v.id, v.pose.y);
                }
            }
        }
    }
}

// ── Communication ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod comm_tests {
    use super::*;

    #[test]
    fn message_delivered_once_per_receiver() {
        let mut sim = SimBuilder::new(test_config())
            .agent(Probe::sending(7), Pose::new(500.0, 500.0, 0.0), exact_params())
            .agent(Probe::default(), Pose::new(510.0, 500.0, 0.0), exact_params())
            .build()
            .unwrap();
        sim.step().unwrap();
        assert_eq!(sim.last_deliveries(), 1);

        let a = sim.agents()[0].controller();
        let b = sim.agents()[1].controller();
        assert_eq!(a.successes, 1);
        assert!(a.received.is_empty());
        assert_eq!(b.received.len(), 1);
        let (msg, d) = b.received[0];
        assert_eq!(msg.data, [7; 9]);
        assert!(msg.is_valid());
        assert!((d - 10.0).abs() < 1e-9);
    }

    #[test]
    fn success_fires_per_receiver() {
        let mut sim = SimBuilder::new(test_config())
            .agent(Probe::sending(1), Pose::new(500.0, 500.0, 0.0), exact_params())
            .agent(Probe::default(), Pose::new(550.0, 500.0, 0.0), exact_params())
            .agent(Probe::default(), Pose::new(450.0, 500.0, 0.0), exact_params())
            .agent(Probe::default(), Pose::new(500.0, 800.0, 0.0), exact_params())
            .build()
            .unwrap();
        sim.step().unwrap();
        assert_eq!(sim.agents()[0].controller().successes, 2);
        assert!(sim.agents()[3].controller().received.is_empty());
    }

    #[test]
    fn only_on_comm_rounds() {
        let mut sim = SimBuilder::new(test_config())
            .agent(Probe::sending(1), Pose::new(500.0, 500.0, 0.0), exact_params())
            .agent(Probe::default(), Pose::new(550.0, 500.0, 0.0), exact_params())
            .build()
            .unwrap();
        let mut per_tick = Vec::new();
        for _ in 0..7 {
            sim.step().unwrap();
            per_tick.push(sim.last_deliveries());
        }
        assert_eq!(per_tick, vec![1, 0, 0, 1, 0, 0, 1]);
        assert_eq!(sim.agents()[1].controller().received.len(), 3);
    }

    #[test]
    fn both_ends_must_accept() {
        let short = Probe { range: Some(20.0), ..Probe::sending(2) };
        let mut sim = SimBuilder::new(test_config())
            .agent(Probe::sending(1), Pose::new(500.0, 500.0, 0.0), exact_params())
            .agent(short, Pose::new(550.0, 500.0, 0.0), exact_params())
            .build()
            .unwrap();
        sim.step().unwrap();
        // 50 mm: agent 0 accepts, agent 1 does not.
        assert_eq!(sim.last_deliveries(), 0);
        assert!(sim.agents()[0].controller().received.is_empty());
        assert!(sim.agents()[1].controller().received.is_empty());
        assert_eq!(sim.agents()[0].controller().successes, 0);
    }

    #[test]
    fn dead_agents_do_not_transmit() {
        let params = AgentParams::default().without_noise().with_battery(BatterySpec::Fixed(0.5));
        let sender = Probe { motion: Some(Motion::Forward), ..Probe::sending(3) };
        let mut sim = SimBuilder::new(test_config())
            .agent(sender, Pose::new(500.0, 500.0, 0.0), params)
            .agent(Probe::default(), Pose::new(550.0, 500.0, 0.0), exact_params())
            .build()
            .unwrap();
        sim.step().unwrap();
        assert!(sim.agents()[0].body().dead);
        assert!(sim.agents()[1].controller().received.is_empty());
    }
}

// ── Battery ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod battery_tests {
    use ks_agent::{Battery, Motor, Rgb};

    use super::*;

    #[test]
    fn dies_after_200_moving_ticks() {
        let params = AgentParams::default().without_noise().with_battery(BatterySpec::Fixed(100.0));
        let mut sim = SimBuilder::new(test_config())
            .agent(Probe::moving(Motion::Forward), Pose::new(200.0, 500.0, 0.0), params)
            .build()
            .unwrap();

        let mut last = f64::INFINITY;
        for _ in 0..199 {
            sim.step().unwrap();
            let Battery::Finite(level) = sim.agents()[0].body().battery else { panic!("finite") };
            assert!(level < last);
            last = level;
        }
        assert!(!sim.agents()[0].body().dead);

        sim.step().unwrap();
        let body = sim.agents()[0].body().clone();
        assert!(body.dead);
        assert!(body.battery.is_depleted());
        assert_eq!(body.motor, Motor::Stop);
        assert_eq!(body.color, Rgb::DEAD);
        assert_eq!(body.calibration.forward_speed, 0.0);
        assert_eq!(body.calibration.turn_speed, 0.0);

        for _ in 0..50 {
            sim.step().unwrap();
            let now = sim.agents()[0].body();
            assert!(now.dead);
            assert_eq!(now.pose, body.pose);
            assert_eq!(now.battery, body.battery);
        }
    }

    #[test]
    fn stationary_agent_keeps_charge() {
        let params = AgentParams::default().without_noise().with_battery(BatterySpec::Fixed(10.0));
        let mut sim = SimBuilder::new(test_config())
            .agent(Probe::default(), Pose::new(200.0, 500.0, 0.0), params)
            .build()
            .unwrap();
        for _ in 0..100 {
            sim.step().unwrap();
        }
        assert_eq!(sim.agents()[0].body().battery, Battery::Finite(10.0));
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod determinism_tests {
    use super::*;

    fn trajectory(seed: u64) -> Vec<Pose> {
        let config = SimConfig { seed, p_exec: 0.99, ..test_config() };
        let mut sim = wander_sim(config, 80);
        let mut poses = Vec::new();
        for _ in 0..300 {
            sim.step().unwrap();
            poses.extend(sim.get_agents().iter().map(|v| v.pose));
        }
        poses
    }

    #[test]
    fn same_seed_same_trajectory() {
        assert_eq!(trajectory(9), trajectory(9));
    }

    #[test]
    fn different_seed_different_trajectory() {
        assert_ne!(trajectory(9), trajectory(10));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn thread_count_does_not_change_results() {
        let run = |threads| {
            let config = SimConfig { num_threads: Some(threads), p_exec: 0.99, ..test_config() };
            let mut sim = wander_sim(config, 80);
            for _ in 0..300 {
                sim.step().unwrap();
            }
            sim.get_agents()
        };
        assert_eq!(run(1), run(4));
    }
}

// ── Fatal conditions ──────────────────────────────────────────────────────────

#[cfg(test)]
mod validity_tests {
    use ks_core::AgentId;
    use ks_spatial::SpatialError;

    use super::*;
    use crate::SimError;

    #[test]
    fn overlap_is_reported() {
        let sim = SimBuilder::new(test_config())
            .agent(Probe::default(), Pose::new(100.0, 100.0, 0.0), exact_params())
            .agent(Probe::default(), Pose::new(300.0, 100.0, 0.0), exact_params())
            .agent(Probe::default(), Pose::new(320.0, 100.0, 0.0), exact_params())
            .build()
            .unwrap();
        match sim.check_validity() {
            Err(SimError::Overlap { a, b, distance }) => {
                assert_eq!((a, b), (AgentId(1), AgentId(2)));
                assert!((distance - 20.0).abs() < 1e-9);
            }
            other => panic!("expected overlap, got {other:?}"),
        }
    }

    #[test]
    fn separated_agents_are_valid() {
        let sim = wander_sim(test_config(), 30);
        assert!(sim.check_validity().is_ok());
    }

    #[test]
    fn grid_overflow_poisons() {
        let mut b = SimBuilder::new(test_config());
        for _ in 0..5 {
            b = b.agent(Probe::default(), Pose::new(500.0, 500.0, 0.0), exact_params());
        }
        let mut sim = b.build().unwrap();
        assert!(matches!(
            sim.step(),
            Err(SimError::Spatial(SpatialError::CellOverflow { .. }))
        ));
        assert!(sim.is_poisoned());
        assert!(matches!(sim.step(), Err(SimError::Poisoned)));
    }
}

// ── Observer hooks ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use ks_core::Tick;

    use super::*;
    use crate::{AgentView, NoopObserver, SimObserver};

    #[derive(Default)]
    struct Recorder {
        starts:    u64,
        ends:      u64,
        executed:  usize,
        snapshots: Vec<(Tick, f64, usize)>,
        finished:  Option<Tick>,
    }

    impl SimObserver for Recorder {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }

        fn on_tick_end(&mut self, _tick: Tick, executed: usize) {
            self.ends += 1;
            self.executed += executed;
        }

        fn on_snapshot(&mut self, tick: Tick, time_secs: f64, agents: &[AgentView]) {
            self.snapshots.push((tick, time_secs, agents.len()));
        }

        fn on_sim_end(&mut self, final_tick: Tick) {
            self.finished = Some(final_tick);
        }
    }

    #[test]
    fn run_until_calls_hooks() {
        let config = SimConfig { snapshot_interval_ticks: 16, ..test_config() };
        let mut sim = SimBuilder::new(config)
            .agent(Probe::default(), Pose::new(500.0, 500.0, 0.0), exact_params())
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run_until(2.0, &mut rec).unwrap();

        assert_eq!(sim.get_tick(), 64);
        assert_eq!((rec.starts, rec.ends), (64, 64));
        assert_eq!(rec.executed, 64);
        assert_eq!(rec.snapshots.len(), 4);
        assert_eq!(rec.snapshots[0], (Tick(16), 0.5, 1));
        assert_eq!(rec.finished, Some(Tick(64)));
    }

    #[test]
    fn run_ticks_does_not_end() {
        let mut sim = Simulation::<Probe>::new(test_config()).unwrap();
        let mut rec = Recorder::default();
        sim.run_ticks(10, &mut rec).unwrap();
        assert_eq!(rec.ends, 10);
        assert!(rec.finished.is_none());
        assert!(rec.snapshots.is_empty());
        sim.run_ticks(5, &mut NoopObserver).unwrap();
        assert_eq!(sim.get_tick(), 15);
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use std::io::Write;

    use crate::{ConfigParser, ScenarioConfig, SimError};

    const DOC: &str = r#"{
        "num_agents": 25,
        "arena_width": 800,
        "trial_duration": 30.5,
        "seed": 3,
        "log_interval": 2,
        "turn_period": [1, 4],
        "label": "demo"
    }"#;

    #[test]
    fn get_and_get_as() {
        let p = ConfigParser::parse(DOC).unwrap();
        assert_eq!(p.get("num_agents").and_then(|v| v.as_u64()), Some(25));
        assert_eq!(p.get_as::<Vec<u32>>("turn_period").unwrap(), vec![1, 4]);
        assert_eq!(p.get_as::<String>("label").unwrap(), "demo");
        assert!(p.get("nope").is_none());
        assert!(matches!(p.get_as::<u32>("nope"), Err(SimError::Config(_))));
        assert!(matches!(p.get_as::<u32>("label"), Err(SimError::Config(_))));
        assert_eq!(p.get_or("nope", 9u32).unwrap(), 9);
        assert!(p.raw().is_object());
    }

    #[test]
    fn non_object_rejected() {
        assert!(matches!(ConfigParser::parse("[1, 2]"), Err(SimError::Config(_))));
        assert!(matches!(ConfigParser::parse("{"), Err(SimError::Json(_))));
    }

    #[test]
    fn params_render_flat() {
        let p = ConfigParser::parse(r#"{"b": "x", "a": 1.5}"#).unwrap();
        assert_eq!(
            p.params(),
            vec![("a".to_string(), "1.5".to_string()), ("b".to_string(), "x".to_string())]
        );
    }

    #[test]
    fn scenario_defaults_and_overrides() {
        let p = ConfigParser::parse(DOC).unwrap();
        let s = ScenarioConfig::from_parser(&p).unwrap();
        assert_eq!(s.num_agents, 25);
        assert_eq!(s.arena_width, 800.0);
        assert_eq!(s.arena_height, 1200.0);
        assert_eq!(s.tick_rate, 32);
        assert_eq!(s.trial_duration, 30.5);

        let c = s.sim_config(2);
        assert_eq!(c.seed, 5);
        assert_eq!(c.snapshot_interval_ticks, 64);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(DOC.as_bytes()).unwrap();
        let p = ConfigParser::from_path(f.path()).unwrap();
        assert_eq!(p.source(), Some(f.path()));
        assert!(matches!(
            ConfigParser::from_path("/nonexistent/config.json"),
            Err(SimError::Io(_))
        ));
    }
}
