//! Workload generation, history recording, and the test runner that ties
//! the reference model and client adapter together into a runnable
//! correctness/load-testing harness (see the system overview's generator,
//! recorder, and test-runner components).

pub mod config;
pub mod error;
pub mod generator;
pub mod recorder;
pub mod reporter;
pub mod runner;

pub use config::{ConfigError, RunConfig};
pub use error::HarnessError;
pub use generator::{Generator, GeneratorConfig};
pub use recorder::{Recorder, RecorderHandle};
pub use runner::{RunOutcome, run};
