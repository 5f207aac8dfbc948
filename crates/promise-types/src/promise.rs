use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Lifecycle state of a durable promise.
///
/// `RejectedTimedout` is never set by a client call; the service (and this
/// harness's reference model, see `promise-model`) assigns it implicitly once
/// wall-clock time passes a promise's `timeout`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromiseState {
    Pending,
    Resolved,
    Rejected,
    RejectedCanceled,
    RejectedTimedout,
}

impl PromiseState {
    /// Any state other than `Pending` is terminal, including the implicit timeout.
    pub fn is_terminal(self) -> bool {
        !matches!(self, PromiseState::Pending)
    }

    /// Whether this state falls in the "rejected family" that a Search query
    /// for `REJECTED` is meant to match (see the generator's search input and
    /// the Search verifier's state-query filter).
    pub fn is_rejected_family(self) -> bool {
        matches!(
            self,
            PromiseState::Rejected | PromiseState::RejectedCanceled | PromiseState::RejectedTimedout
        )
    }
}

/// The unit of state the target service manages: a caller-addressable,
/// durable future identified by `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Promise {
    pub id: String,
    pub state: PromiseState,
    #[serde(default)]
    pub param: Value,
    #[serde(default)]
    pub value: Value,
    pub timeout: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<i64>,
}

impl Promise {
    /// Whether `at_ms` (a call's wall-clock time in milliseconds) has passed
    /// this promise's deadline. Does not itself mutate `state`; callers apply
    /// the implicit-timeout rewrite (see `promise-model::state::refresh`).
    pub fn is_past_deadline(&self, at_ms: i64) -> bool {
        self.timeout <= at_ms
    }
}
