//! JSON scenario files.
//!
//! A scenario file is a flat JSON object of startup parameters.  Programs
//! read well-known keys through [`ScenarioConfig`] and anything
//! scenario-specific through [`ConfigParser::get_as`]:
//!
//! ```json
//! {
//!   "num_agents": 100,
//!   "arena_width": 1200,
//!   "arena_height": 1200,
//!   "trial_duration": 600,
//!   "seed": 7,
//!   "log_file_dir": "out",
//!   "log_interval": 5,
//!   "turn_period": [1, 4]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use ks_core::SimConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{SimError, SimResult};

/// A parsed JSON configuration document.
#[derive(Clone, Debug)]
pub struct ConfigParser {
    source: Option<PathBuf>,
    doc:    Value,
}

impl ConfigParser {
    /// Read and parse `path`.  The top level must be an object.
    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut parser = Self::parse(&text)?;
        parser.source = Some(path.to_path_buf());
        Ok(parser)
    }

    /// Parse an in-memory document.
    pub fn parse(text: &str) -> SimResult<Self> {
        let doc: Value = serde_json::from_str(text)?;
        if !doc.is_object() {
            return Err(SimError::Config("configuration must be a JSON object".into()));
        }
        Ok(Self { source: None, doc })
    }

    /// The file this was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.doc.get(key)
    }

    /// `key` deserialized as `T`.  A missing key is an error.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> SimResult<T> {
        let value = self
            .get(key)
            .ok_or_else(|| SimError::Config(format!("missing configuration key `{key}`")))?;
        T::deserialize(value)
            .map_err(|e| SimError::Config(format!("configuration key `{key}`: {e}")))
    }

    /// `key` deserialized as `T`, or `default` if absent.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> SimResult<T> {
        match self.get(key) {
            Some(_) => self.get_as(key),
            None => Ok(default),
        }
    }

    /// The whole document.
    pub fn raw(&self) -> &Value {
        &self.doc
    }

    /// Top-level `(key, value)` pairs sorted by key, values rendered as
    /// compact JSON (strings without quotes).
    pub fn params(&self) -> Vec<(String, String)> {
        let Some(map) = self.doc.as_object() else {
            return Vec::new();
        };
        map.iter()
            .map(|(k, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect()
    }
}

/// The startup scalars every scenario shares.  Absent keys take the
/// defaults of [`SimConfig`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub num_agents:    usize,
    pub arena_width:   f64,
    pub arena_height:  f64,
    pub tick_rate:     u16,
    pub comm_rate:     u64,
    pub p_exec:        f64,
    pub seed:          u64,
    pub num_threads:   Option<usize>,
    pub light_pattern: Option<PathBuf>,
    /// Simulated seconds per trial.
    pub trial_duration: f64,
    /// Number of independent trials (seed is offset by the trial index).
    pub trials:        u32,
    pub log_file_dir:  Option<PathBuf>,
    /// Simulated seconds between log rows.
    pub log_interval:  f64,
    /// Replace an existing trial directory instead of failing.
    pub overwrite_log: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let sim = SimConfig::default();
        Self {
            num_agents:     0,
            arena_width:    sim.arena_width,
            arena_height:   sim.arena_height,
            tick_rate:      sim.tick_rate,
            comm_rate:      sim.comm_rate,
            p_exec:         sim.p_exec,
            seed:           sim.seed,
            num_threads:    None,
            light_pattern:  None,
            trial_duration: 60.0,
            trials:         1,
            log_file_dir:   None,
            log_interval:   1.0,
            overwrite_log:  false,
        }
    }
}

impl ScenarioConfig {
    /// Typed view of a parsed document.  Unknown keys are ignored.
    pub fn from_parser(parser: &ConfigParser) -> SimResult<Self> {
        Ok(Self::deserialize(parser.raw())?)
    }

    /// Simulation settings for trial `trial` (0-based).
    pub fn sim_config(&self, trial: u32) -> SimConfig {
        let snapshot_interval_ticks = (self.log_interval * self.tick_rate as f64).round().max(0.0) as u64;
        SimConfig {
            arena_width: self.arena_width,
            arena_height: self.arena_height,
            tick_rate: self.tick_rate,
            comm_rate: self.comm_rate,
            p_exec: self.p_exec,
            seed: self.seed.wrapping_add(trial as u64),
            num_threads: self.num_threads,
            light_pattern: self.light_pattern.clone(),
            snapshot_interval_ticks,
        }
    }
}
