//! Error types for catalog loading, configuration, input parsing and queries.

use thiserror::Error;

/// Raised while loading the static dataset. Fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse json '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate creature name '{0}'")]
    DuplicateCreature(String),

    #[error("multiplier table is not strictly increasing at level {0}")]
    MultiplierOrder(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },

    #[error("raid level {0} is not in the multiplier table")]
    InvalidRaidLevel(f64),

    #[error("at least one raid level must be configured")]
    EmptyRaidLevels,
}

/// Query-time failures. Each one is scoped to a single request.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("creature not recognized: {0}")]
    UnknownCreature(String),

    #[error("no stats available for {0} yet")]
    NoStats(String),

    #[error("type not recognized: {0}")]
    UnknownType(String),

    #[error("level {0} is not in the multiplier table")]
    UnknownLevel(f64),

    #[error("{stat} IV must be between 0 and 15, got {value}")]
    InvalidIv { stat: &'static str, value: u32 },
}

/// Input rejected before it reaches the solver.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("{field} must be an integer, got '{value}'")]
    NotAnInteger { field: &'static str, value: String },

    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("level {0} is not a half level between 1 and 40")]
    LevelOutOfRange(f64),

    #[error("IV {0} is outside 0..=15")]
    IvOutOfRange(u32),

    #[error("best stat filter '{0}' names none of a, d, s or h")]
    InvalidBestFilter(String),
}

/// Anything that stops the engine from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
