//! Spawns N concurrent workers, each drawing operations from the
//! [`Generator`], routing them through the [`ClientAdapter`] into the
//! [`Recorder`], then invokes the linearizability [`promise_model::check`]
//! once every worker has finished (see the test runner's contract).

use std::sync::Arc;
use std::time::{Duration, Instant};

use promise_client::ClientAdapter;
use promise_client::readiness::wait_until_ready;
use promise_model::CheckError;
use promise_types::Operation;
use tokio::task::JoinSet;

use crate::config::RunConfig;
use crate::error::HarnessError;
use crate::generator::{Generator, GeneratorConfig};
use crate::recorder::Recorder;

/// The outcome of one run: the recorded history (arrival order) plus the
/// checker's verdict. `check` is `Ok(())` when the history is linearizable
/// with respect to the reference model.
pub struct RunOutcome {
    pub history: Vec<Operation>,
    pub check: Result<(), CheckError>,
    pub elapsed: Duration,
}

/// Drives one full run: readiness probe, worker fan-out, recorder drain,
/// linearizability check. `generator_config` lets callers narrow the
/// operation mix (e.g. a timeout-only run) without touching the runner.
/// `readiness_window`/`readiness_poll` are exposed (rather than hardcoded)
/// so tests can drive the setup probe without waiting out the production
/// default (see `crate::config::READINESS_WINDOW`).
pub async fn run(
    config: &RunConfig,
    generator_config: GeneratorConfig,
    client: Arc<dyn ClientAdapter>,
    readiness_window: Duration,
    readiness_poll: Duration,
) -> Result<RunOutcome, HarnessError> {
    let start = Instant::now();

    tracing::info!(addr = %config.addr, "probing target readiness");
    wait_until_ready(&config.addr, readiness_window, readiness_poll)?;

    let generator = Generator::new(config.seed, generator_config);

    // Size the channel at least `clients * 2` so the recorder's backpressure
    // never artificially serializes otherwise-independent workers.
    let channel_capacity = (config.clients as usize * 2).max(2);
    let (recorder, recorder_handle) = Recorder::spawn(channel_capacity);

    let mut workers = JoinSet::new();
    for client_id in 0..config.clients {
        let ops = generator.generate_for_client(client_id);
        let client = Arc::clone(&client);
        let sender = recorder.sender();

        workers.spawn(async move {
            tracing::debug!(client_id, request_count = ops.len(), "worker starting");
            for op in ops {
                let api = op.api;
                let completed = client.invoke(op).await;
                tracing::trace!(client_id, %api, code = completed.code, status = ?completed.status, "invoked");
                if sender.send(completed).await.is_err() {
                    tracing::warn!(client_id, "recorder closed early; dropping remaining operations");
                    break;
                }
            }
            tracing::debug!(client_id, "worker finished");
        });
    }

    // Drop our own sender so the recorder's channel closes once every
    // worker's clone has also been dropped.
    drop(recorder);

    while let Some(result) = workers.join_next().await {
        result?;
    }

    let history = recorder_handle.finish().await;
    tracing::info!(operation_count = history.len(), "history recorded, running linearizability check");

    let check = promise_model::check(&history);

    Ok(RunOutcome {
        history,
        check,
        elapsed: start.elapsed(),
    })
}
