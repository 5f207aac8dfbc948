use thiserror::Error;

use crate::config::ConfigError;
use promise_client::ClientError;
use promise_client::readiness::SetupError;
use promise_model::CheckError;

/// The harness's top-level error hierarchy: one variant per crate boundary
/// from the error-handling design (setup, verification). A `Runner` never
/// returns a transport or shape error directly -- those are recorded onto
/// operations (transport) or folded into `Verification` once the checker
/// runs (shape, via `ModelError::UnexpectedOutputShape`).
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build client: {0}")]
    ClientBuild(#[from] ClientError),
    #[error("setup failed: {0}")]
    Setup(#[from] SetupError),
    #[error("a worker task panicked: {0}")]
    WorkerPanicked(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Verification(#[from] CheckError),
}
