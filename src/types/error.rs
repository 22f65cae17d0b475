//! Errors raised outside the tick path (startup, scripts, host commands)

use thiserror::Error;

use crate::types::{CarId, CouplerId};

#[derive(Debug, Error)]
pub enum CouplingError {
    #[error("invalid coupler `{0}` (expected e.g. `3f` or `3r`)")]
    InvalidCoupler(String),

    #[error("line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("unknown car {0}")]
    UnknownCar(CarId),

    #[error("car {0} already exists")]
    DuplicateCar(CarId),

    #[error("coupler {0} is already coupled")]
    AlreadyCoupled(CouplerId),

    #[error("cannot couple {0} to itself")]
    SelfCoupling(CouplerId),

    #[error("asset bundle {path}: {source}")]
    AssetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("asset bundle {path} is malformed: {source}")]
    AssetFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("prefab `{0}` missing from asset bundle")]
    MissingPrefab(String),

    #[error("config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config {path} is malformed: {source}")]
    ConfigFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("script {path}: {source}")]
    ScriptIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server on {addr}: {source}")]
    Serve {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

impl CouplingError {
    /// Script error at a 1-based line
    pub fn script(line: usize, message: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: message.into(),
        }
    }

    /// True for errors caused by malformed user input rather than host state
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidCoupler(_) | Self::Script { .. })
    }
}
