//! A bounded-channel sink that collects completed operations from every
//! worker into one ordered history (see the history recorder's contract:
//! single-producer-per-worker, single-consumer, no operation dropped,
//! arrival order rather than call-time order -- the checker sorts).

use promise_types::Operation;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Holds the live sender end; workers clone [`Recorder::sender`] and push
/// completed operations to it. Dropping every clone (including the one
/// held here) closes the channel, which is how the drain task in
/// [`RecorderHandle`] learns to stop and return the collected history.
pub struct Recorder {
    sender: mpsc::Sender<Operation>,
}

/// The consumer half: a background task draining the channel into an
/// append-only `Vec<Operation>`. `finish` awaits the drain task's
/// completion and returns the collected history -- the recorder's "Done"
/// signal from the component design.
pub struct RecorderHandle {
    drain: JoinHandle<Vec<Operation>>,
}

impl Recorder {
    /// `capacity` should be at least `clients * 2` to avoid artificial
    /// serialization from channel backpressure (see the backpressure
    /// design note).
    pub fn spawn(capacity: usize) -> (Self, RecorderHandle) {
        let (sender, mut receiver) = mpsc::channel(capacity.max(1));

        let drain = tokio::spawn(async move {
            let mut history = Vec::new();
            while let Some(op) = receiver.recv().await {
                history.push(op);
            }
            history
        });

        (Self { sender }, RecorderHandle { drain })
    }

    pub fn sender(&self) -> mpsc::Sender<Operation> {
        self.sender.clone()
    }
}

impl RecorderHandle {
    /// Awaits the drain task's completion. Callers must have dropped every
    /// `Recorder`/sender clone first, or this hangs waiting for the
    /// channel to close.
    pub async fn finish(self) -> Vec<Operation> {
        self.drain.await.expect("recorder drain task panicked")
    }
}
