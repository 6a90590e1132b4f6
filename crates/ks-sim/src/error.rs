use ks_core::{AgentId, KsError};
use ks_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] KsError),

    #[error("spatial index error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("{a} and {b} overlap: centres {distance:.3} mm apart")]
    Overlap { a: AgentId, b: AgentId, distance: f64 },

    #[error("{0} is not in this simulation")]
    AgentNotFound(AgentId),

    #[error("simulation aborted by an earlier fatal error; no further steps are possible")]
    Poisoned,

    #[error("could not build worker pool: {0}")]
    ThreadPool(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
