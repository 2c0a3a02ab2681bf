use termico_eval::EngineError;

use crate::config::ConfigError;
use crate::project::ProjectError;
use crate::telemetry::TelemetryError;

/// Anything that makes a command exit non-zero.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
