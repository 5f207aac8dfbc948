use thiserror::Error;

/// Errors that can occur while building a [`crate::HttpClient`]. Per-call
/// transport failures are not an error variant here -- they are recorded
/// onto the `Operation` as `status = Fail, code = 0` (see `crate::adapter`),
/// since the reference model treats a failed call as "no information"
/// rather than a fatal condition (see the error-handling design's
/// transport-error kind).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}
