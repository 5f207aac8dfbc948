use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiKind;
use crate::promise::Promise;
use crate::value::Value;

/// Result-class tag for an `Operation`. `Invoke` marks a call that has not
/// yet returned; it should never appear in a recorded history (see
/// `Operation::status` invariant in the reference model).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Invoke,
    Ok,
    Fail,
}

/// The state query a `Search` accepts. `Rejected` is the catch-all matched
/// against any state in the rejected family (see `PromiseState::is_rejected_family`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchStateFilter {
    Pending,
    Resolved,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub id: String,
    pub state: SearchStateFilter,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateBody {
    pub id: String,
    pub param: Value,
    pub timeout: i64,
}

/// Body shared by `Cancel`, `Resolve`, and `Reject`; which terminal state is
/// desired is implied by the operation's `ApiKind`, not carried in the body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteBody {
    pub id: String,
    pub value: Value,
}

/// Per-API request payload. One variant per `ApiKind`; `Cancel`, `Resolve`,
/// and `Reject` all carry `Complete`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Input {
    Search(SearchParams),
    Get(String),
    Create(CreateBody),
    Complete(CompleteBody),
}

impl Input {
    pub fn as_search(&self) -> Option<&SearchParams> {
        match self {
            Input::Search(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_get(&self) -> Option<&str> {
        match self {
            Input::Get(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn as_create(&self) -> Option<&CreateBody> {
        match self {
            Input::Create(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_complete(&self) -> Option<&CompleteBody> {
        match self {
            Input::Complete(b) => Some(b),
            _ => None,
        }
    }
}

/// Per-API decoded response payload. Absent (`Operation::output = None`) when
/// the transport failed before a body could be decoded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Output {
    Search(Vec<Promise>),
    Get(Promise),
    Create(Promise),
    Complete(Promise),
}

impl Output {
    pub fn as_search(&self) -> Option<&[Promise]> {
        match self {
            Output::Search(ps) => Some(ps),
            _ => None,
        }
    }
}

/// One logical client action: a call paired with its (possibly failed) return.
///
/// Invariant: `call_event <= return_event`. `status = Ok` iff `code` is in
/// the api's accepted set (see the wire contract table); otherwise `Fail`,
/// or `Invoke` if a call has been recorded but not yet completed (which
/// should never reach the History — see `promise-harness::recorder`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub client_id: u32,
    pub api: ApiKind,
    pub input: Input,
    pub output: Option<Output>,
    pub call_event: DateTime<Utc>,
    pub return_event: DateTime<Utc>,
    pub status: Status,
    pub code: i32,
}

impl Operation {
    /// Construct the "call" half of an operation; `return_event` is set to
    /// `call_event`, `status` to `Invoke`, and `code` to -1 until the client
    /// adapter fills in the return.
    pub fn new_call(id: String, client_id: u32, api: ApiKind, input: Input, call_event: DateTime<Utc>) -> Self {
        Self {
            id,
            client_id,
            api,
            input,
            output: None,
            call_event,
            return_event: call_event,
            status: Status::Invoke,
            code: -1,
        }
    }
}
