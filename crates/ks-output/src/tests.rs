//! Integration tests for ks-output.

use std::path::Path;

use ks_agent::{AgentParams, Battery, BatterySpec, Motor, Rgb};
use ks_behavior::NoopController;
use ks_core::{AgentId, Pose, SimConfig};
use ks_sim::{AgentView, SimBuilder, Simulation};
use tempfile::TempDir;

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .unwrap();
    rdr.records()
        .map(|r| r.unwrap().iter().map(str::to_owned).collect())
        .collect()
}

fn small_sim(snapshot_interval_ticks: u64) -> Simulation<NoopController> {
    let config = SimConfig { snapshot_interval_ticks, seed: 1, ..SimConfig::with_arena(500.0, 500.0) };
    SimBuilder::new(config)
        .agents(
            [
                (NoopController, Pose::new(100.0, 100.0, 0.0)),
                (NoopController, Pose::new(200.0, 100.0, 0.0)),
            ],
            AgentParams::default().without_noise().with_battery(BatterySpec::Fixed(50.0)),
        )
        .build()
        .unwrap()
}

fn view(id: u32, color: Rgb, battery: Battery, dead: bool) -> AgentView {
    AgentView {
        id: AgentId(id),
        pose: Pose::new(10.0 * id as f64, 5.0, 0.5),
        radius: 16.0,
        motor: Default::default(),
        color,
        battery,
        dead,
        outcome: Default::default(),
        collision_timer: id,
        kilo_ticks: 0,
    }
}

#[cfg(test)]
mod aggregate_tests {
    use super::*;
    use crate::aggregate;

    #[test]
    fn means_and_counts() {
        let agents = [
            view(0, Rgb::new(1.0, 0.0, 0.0), Battery::Finite(10.0), false),
            view(1, Rgb::new(0.0, 1.0, 0.0), Battery::Finite(30.0), true),
            view(2, Rgb::new(0.0, 0.0, 1.0), Battery::Infinite, false),
        ];
        let c = aggregate::mean_color(&agents);
        assert_eq!(c.len(), 3);
        assert!(c.iter().all(|v| (v - 1.0 / 3.0).abs() < 1e-12));
        assert_eq!(aggregate::mean_battery(&agents), vec![20.0]);
        assert_eq!(aggregate::alive_count(&agents), vec![2.0]);
        assert_eq!(aggregate::collision_timers(&agents), vec![0.0, 1.0, 2.0]);
        assert_eq!(aggregate::poses(&agents)[3..6], [10.0, 5.0, 0.5]);
    }

    #[test]
    fn motor_codes_per_agent() {
        let mut moving = view(1, Rgb::OFF, Battery::Infinite, false);
        moving.motor = Motor::RotateCcw;
        let agents = [view(0, Rgb::OFF, Battery::Infinite, false), moving];
        assert_eq!(aggregate::motor_codes(&agents), vec![0.0, 3.0]);
    }

    #[test]
    fn empty_swarm() {
        assert!(aggregate::mean_color(&[]).is_empty());
        assert!(aggregate::mean_battery(&[]).is_empty());
        assert_eq!(aggregate::alive_count(&[]), vec![0.0]);
    }
}

#[cfg(test)]
mod logger_tests {
    use super::*;
    use crate::{aggregate, Logger, OutputError};

    #[test]
    fn creates_trial_directory() {
        let dir = tmp();
        let logger = Logger::new(dir.path(), 3, false).unwrap();
        assert_eq!(logger.dir(), dir.path().join("trial_3"));
        assert_eq!(logger.trial(), 3);
        assert!(dir.path().join("trial_3/time.csv").exists());
    }

    #[test]
    fn existing_trial_needs_overwrite() {
        let dir = tmp();
        {
            let mut l = Logger::new(dir.path(), 0, false).unwrap();
            l.add_aggregator("old", aggregate::alive_count).unwrap();
            l.finish().unwrap();
        }
        assert!(matches!(
            Logger::new(dir.path(), 0, false),
            Err(OutputError::TrialExists(_))
        ));
        let _l = Logger::new(dir.path(), 0, true).unwrap();
        assert!(!dir.path().join("trial_0/old.csv").exists());
    }

    #[test]
    fn aggregator_names_checked() {
        let dir = tmp();
        let mut l = Logger::new(dir.path(), 0, false).unwrap();
        l.add_aggregator("alive", aggregate::alive_count).unwrap();
        assert!(matches!(
            l.add_aggregator("alive", aggregate::poses),
            Err(OutputError::DuplicateAggregator(_))
        ));
        for bad in ["", "time", "params", "a/b", "x y"] {
            assert!(matches!(l.add_aggregator(bad, aggregate::poses), Err(OutputError::InvalidName(_))), "{bad}");
        }
        assert_eq!(l.aggregator_names().collect::<Vec<_>>(), ["alive"]);
    }

    #[test]
    fn state_rows() {
        let dir = tmp();
        let mut l = Logger::new(dir.path(), 1, false).unwrap();
        l.add_aggregator("alive", aggregate::alive_count).unwrap();
        l.add_aggregator("pose", aggregate::poses).unwrap();

        let agents = [view(0, Rgb::OFF, Battery::Infinite, false), view(1, Rgb::OFF, Battery::Infinite, true)];
        l.log_views(0.0, &agents).unwrap();
        l.log_views(0.5, &agents[..1]).unwrap();
        l.finish().unwrap();
        assert_eq!(l.rows(), 2);

        let trial = dir.path().join("trial_1");
        assert_eq!(read_rows(&trial.join("time.csv")), [["0"], ["0.5"]]);
        assert_eq!(read_rows(&trial.join("alive.csv")), [["0", "1"], ["0.5", "1"]]);
        let pose = read_rows(&trial.join("pose.csv"));
        assert_eq!(pose[0].len(), 7);
        assert_eq!(pose[1].len(), 4);
        assert_eq!(pose[0][4], "10");
    }

    #[test]
    fn no_rows_after_finish() {
        let dir = tmp();
        let mut l = Logger::new(dir.path(), 0, false).unwrap();
        l.finish().unwrap();
        l.finish().unwrap();
        assert!(matches!(l.log_views(1.0, &[]), Err(OutputError::Finished)));
    }

    #[test]
    fn params_file() {
        let dir = tmp();
        let mut l = Logger::new(dir.path(), 0, false).unwrap();
        l.log_params(&[("seed".into(), "7".into()), ("label".into(), "a,b".into())]).unwrap();
        assert_eq!(
            read_rows(&dir.path().join("trial_0/params.csv")),
            [["key", "value"], ["seed", "7"], ["label", "a,b"]]
        );
    }

    #[test]
    fn logs_a_simulation() {
        let dir = tmp();
        let mut sim = small_sim(0);
        sim.step().unwrap();
        let mut l = Logger::new(dir.path(), 0, false).unwrap();
        l.add_aggregator("battery", aggregate::mean_battery).unwrap();
        l.log_state(&sim).unwrap();
        l.finish().unwrap();
        assert_eq!(
            read_rows(&dir.path().join("trial_0/battery.csv")),
            [[format!("{}", 1.0 / 32.0), "50".to_string()]]
        );
    }
}

#[cfg(test)]
mod observer_tests {
    use super::*;
    use crate::{aggregate, LogObserver, Logger};

    #[test]
    fn one_row_per_snapshot() {
        let dir = tmp();
        let mut logger = Logger::new(dir.path(), 0, false).unwrap();
        logger.add_aggregator("alive", aggregate::alive_count).unwrap();
        let mut obs = LogObserver::new(logger);

        let mut sim = small_sim(8);
        sim.run_until(1.0, &mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let logger = obs.into_logger();
        assert_eq!(logger.rows(), 4);
        let times = read_rows(&dir.path().join("trial_0/time.csv"));
        assert_eq!(times, [["0.25"], ["0.5"], ["0.75"], ["1"]]);
        assert_eq!(read_rows(&dir.path().join("trial_0/alive.csv"))[3], ["1", "2"]);
    }

    #[test]
    fn stores_first_error() {
        let dir = tmp();
        let mut logger = Logger::new(dir.path(), 0, false).unwrap();
        logger.finish().unwrap();
        let mut obs = LogObserver::new(logger);

        let mut sim = small_sim(4);
        sim.run_ticks(8, &mut obs).unwrap();
        assert!(matches!(obs.take_error(), Some(crate::OutputError::Finished)));
        assert!(obs.take_error().is_none());
    }
}
