use promise_types::{ApiKind, PromiseState};
use thiserror::Error;

/// A verifier's structured diagnosis of why a (call, return) pair could not
/// be reconciled with the model. Each variant names the offending operation,
/// the api, and the specific field (or shape) that did not match, per the
/// error-surface requirement in the design: "structured message naming the
/// offending operation, the model state, and the mismatched field".
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("{api} operation {operation_id} returned Ok but carried no decoded output")]
    MissingOutput { api: ApiKind, operation_id: String },

    #[error("{api} operation {operation_id} returned output of the wrong shape for this api")]
    UnexpectedOutputShape { api: ApiKind, operation_id: String },

    #[error(
        "{api} operation {operation_id} returned status={status:?} code={code}, which this api does not accept"
    )]
    UnexpectedStatus {
        api: ApiKind,
        operation_id: String,
        status: promise_types::Status,
        code: i32,
    },

    #[error(
        "search operation {operation_id}: server results did not match model results\n  expected: {expected}\n  observed: {observed}"
    )]
    SearchResultMismatch {
        operation_id: String,
        expected: String,
        observed: String,
    },

    #[error(
        "get operation {operation_id} for id '{id}': model expected {expected}, server returned {observed}"
    )]
    GetPromiseMismatch {
        operation_id: String,
        id: String,
        expected: String,
        observed: String,
    },

    #[error(
        "create operation {operation_id} for id '{id}' failed with code {code}, but the model has no prior promise with that id to conflict with"
    )]
    CreateConflictWithoutPriorPromise {
        operation_id: String,
        id: String,
        code: i32,
    },

    #[error(
        "create operation {operation_id} for id '{id}' succeeded but returned state {observed:?} instead of PENDING"
    )]
    CreateNotPending {
        operation_id: String,
        id: String,
        observed: PromiseState,
    },

    #[error(
        "{api} operation {operation_id} for id '{id}' failed with code {code}, but the model does not consider that promise already completed"
    )]
    CompleteForbiddenButNotTerminal {
        api: ApiKind,
        operation_id: String,
        id: String,
        code: i32,
    },

    #[error(
        "{api} operation {operation_id} for id '{id}' returned 404, but the model has a record of that promise"
    )]
    CompleteNotFoundButModelHasPromise {
        api: ApiKind,
        operation_id: String,
        id: String,
    },

    #[error(
        "{api} operation {operation_id} for id '{id}' succeeded but returned state {observed:?} instead of the api's terminal state {expected:?}"
    )]
    CompleteWrongTerminalState {
        api: ApiKind,
        operation_id: String,
        id: String,
        expected: PromiseState,
        observed: PromiseState,
    },
}
