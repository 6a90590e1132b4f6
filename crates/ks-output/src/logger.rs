//! The CSV trial logger.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use ks_behavior::Controller;
use ks_sim::{AgentView, Simulation};
use tracing::info;

use crate::aggregate::Aggregator;
use crate::{OutputError, OutputResult};

struct Series {
    name:   String,
    func:   Aggregator,
    writer: Writer<File>,
}

/// Writes the logs of one trial.
pub struct Logger {
    dir:      PathBuf,
    trial:    u32,
    time:     Writer<File>,
    series:   Vec<Series>,
    rows:     u64,
    finished: bool,
}

impl Logger {
    /// Create `<base_dir>/trial_<trial>/` and open `time.csv` in it.
    ///
    /// An existing trial directory is an error unless `overwrite` is set, in
    /// which case it is removed first.
    pub fn new(base_dir: impl AsRef<Path>, trial: u32, overwrite: bool) -> OutputResult<Self> {
        let dir = base_dir.as_ref().join(format!("trial_{trial}"));
        if dir.exists() {
            if !overwrite {
                return Err(OutputError::TrialExists(dir));
            }
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;

        let time = open(&dir, "time")?;
        info!(dir = %dir.display(), trial, "log trial opened");
        Ok(Self { dir, trial, time, series: Vec::new(), rows: 0, finished: false })
    }

    /// Register `func` under `name`; its rows go to `<name>.csv`.
    ///
    /// Names are limited to ASCII letters, digits, `_` and `-`, and must not
    /// collide with the reserved `time` and `params` files.
    pub fn add_aggregator(&mut self, name: &str, func: Aggregator) -> OutputResult<()> {
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && name != "time"
            && name != "params";
        if !valid {
            return Err(OutputError::InvalidName(name.to_owned()));
        }
        if self.series.iter().any(|s| s.name == name) {
            return Err(OutputError::DuplicateAggregator(name.to_owned()));
        }
        let writer = open(&self.dir, name)?;
        self.series.push(Series { name: name.to_owned(), func, writer });
        Ok(())
    }

    /// Log the current state of `sim`.
    pub fn log_state<C: Controller>(&mut self, sim: &Simulation<C>) -> OutputResult<()> {
        self.log_views(sim.get_time(), &sim.get_agents())
    }

    /// Append one row to `time.csv` and one `time, v0, v1, …` row per
    /// aggregator.
    pub fn log_views(&mut self, time: f64, agents: &[AgentView]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        self.time.write_record([time.to_string()])?;
        for s in &mut self.series {
            let values = (s.func)(agents);
            let row = std::iter::once(time).chain(values).map(|v| v.to_string());
            s.writer.write_record(row)?;
        }
        self.rows += 1;
        Ok(())
    }

    /// Write `params.csv` with a `key,value` header.  Replaces any earlier
    /// parameter file of this trial.
    pub fn log_params(&mut self, params: &[(String, String)]) -> OutputResult<()> {
        let mut w = Writer::from_path(self.dir.join("params.csv"))?;
        w.write_record(["key", "value"])?;
        for (k, v) in params {
            w.write_record([k, v])?;
        }
        w.flush()?;
        Ok(())
    }

    /// Flush every open file.  Idempotent; no rows can be logged afterwards.
    pub fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.time.flush()?;
        for s in &mut self.series {
            s.writer.flush()?;
        }
        info!(trial = self.trial, rows = self.rows, "log trial closed");
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn trial(&self) -> u32 {
        self.trial
    }

    /// Number of states logged so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Registered aggregator names, in registration order.
    pub fn aggregator_names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.name.as_str())
    }
}

// Row lengths differ between aggregators and may change as agents die.
fn open(dir: &Path, name: &str) -> OutputResult<Writer<File>> {
    Ok(WriterBuilder::new()
        .flexible(true)
        .from_path(dir.join(format!("{name}.csv")))?)
}
