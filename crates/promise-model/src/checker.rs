//! Drives a recorded history through the [`Model`] in linearization order
//! and reports the first inconsistency.
//!
//! This implements the **sequential-per-client** strategy from the
//! component design: events are paired into (call, return) by operation id,
//! sorted by call time with ties broken by operation id (see
//! `crate::events::make_events`), and fed to the model one pair at a time.
//! It is exact when concurrency is intra-client-sequential -- each client's
//! own operations run one at a time -- even though distinct clients run
//! concurrently (see `promise-harness::runner`).

use promise_types::Operation;
use thiserror::Error;

use crate::error::ModelError;
use crate::events::make_events;
use crate::model::Model;

/// The first offending `(operation, reason)`, surfaced with enough context
/// to diagnose without re-running: the operation id, its api kind, and the
/// model's structured explanation.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("linearizability check failed on operation {operation_id} ({api}): {source}")]
pub struct CheckError {
    pub operation_id: String,
    pub api: promise_types::ApiKind,
    #[source]
    pub source: ModelError,
}

/// Checks `history` against the reference model; `Ok(())` if every
/// (call, return) pair in tie-broken order is accepted, otherwise the first
/// error encountered.
pub fn check(history: &[Operation]) -> Result<(), CheckError> {
    let pairs = make_events(history);
    let model = Model::new();
    let mut state = model.init();
    let mut steps = 0usize;

    for (call, ret) in &pairs {
        tracing::trace!(
            operation_id = call.operation_id,
            api = %call.api,
            "checking operation against the reference model"
        );
        model.step(&mut state, call, ret).map_err(|source| CheckError {
            operation_id: call.operation_id.to_string(),
            api: call.api,
            source,
        })?;
        steps += 1;
    }

    tracing::debug!(operations = steps, "history is linearizable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use promise_types::{
        ApiKind, Clock, CompleteBody, CreateBody, FixedClock, Input, Output, Promise, PromiseState, Status, Value,
    };

    fn at(ms: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn promise(id: &str, state: PromiseState, timeout: i64) -> Promise {
        Promise {
            id: id.to_string(),
            state,
            param: Value::empty(),
            value: Value::empty(),
            timeout,
            tags: None,
            created_on: None,
            completed_on: None,
        }
    }

    fn create_op(id: &str, op_id: &str, call_ms: i64, ret_ms: i64, code: i32, returned: PromiseState) -> Operation {
        Operation {
            id: op_id.to_string(),
            client_id: 0,
            api: ApiKind::Create,
            input: Input::Create(CreateBody {
                id: id.to_string(),
                param: Value::empty(),
                timeout: 2_524_608_000_000,
            }),
            output: Some(Output::Create(promise(id, returned, 2_524_608_000_000))),
            call_event: at(call_ms),
            return_event: at(ret_ms),
            status: Status::Ok,
            code,
        }
    }

    fn get_op(id: &str, op_id: &str, call_ms: i64, ret_ms: i64, promise: Promise) -> Operation {
        Operation {
            id: op_id.to_string(),
            client_id: 0,
            api: ApiKind::Get,
            input: Input::Get(id.to_string()),
            output: Some(Output::Get(promise)),
            call_event: at(call_ms),
            return_event: at(ret_ms),
            status: Status::Ok,
            code: 200,
        }
    }

    // S1: Create then Get returns an equal promise.
    #[test]
    fn s1_create_then_get_round_trips() {
        let history = vec![
            create_op("0", "op1", 0, 1, 201, PromiseState::Pending),
            get_op("0", "op2", 2, 3, promise("0", PromiseState::Pending, 2_524_608_000_000)),
        ];
        assert!(check(&history).is_ok());
    }

    // S3: create, resolve, then a reject that should be rejected with 403.
    #[test]
    fn s3_complete_after_complete_is_forbidden() {
        let mut history = vec![create_op(
            "7",
            "op1",
            0,
            1,
            201,
            PromiseState::Pending,
        )];
        history.push(Operation {
            id: "op2".to_string(),
            client_id: 0,
            api: ApiKind::Resolve,
            input: Input::Complete(CompleteBody {
                id: "7".to_string(),
                value: Value::new("b2s=="),
            }),
            output: Some(Output::Complete(promise("7", PromiseState::Resolved, 2_524_608_000_000))),
            call_event: at(2),
            return_event: at(3),
            status: Status::Ok,
            code: 200,
        });
        history.push(Operation {
            id: "op3".to_string(),
            client_id: 0,
            api: ApiKind::Reject,
            input: Input::Complete(CompleteBody {
                id: "7".to_string(),
                value: Value::empty(),
            }),
            output: None,
            call_event: at(4),
            return_event: at(5),
            status: Status::Fail,
            code: 403,
        });
        assert!(check(&history).is_ok());
    }

    // S4: Get on a missing id accepts 404.
    #[test]
    fn s4_get_missing_accepts_404() {
        let history = vec![Operation {
            id: "op1".to_string(),
            client_id: 0,
            api: ApiKind::Get,
            input: Input::Get("does-not-exist".to_string()),
            output: None,
            call_event: at(0),
            return_event: at(1),
            status: Status::Fail,
            code: 404,
        }];
        assert!(check(&history).is_ok());
    }

    // S5: timeout fires, Get observes REJECTED_TIMEDOUT. Drives the crossing
    // deterministically with a `FixedClock` rather than sleeping on
    // wall-clock time (see the time-source design note).
    #[test]
    fn s5_implicit_timeout_is_accepted() {
        let clock = FixedClock::new(at(0));
        let create_time = clock.now();
        let timeout = create_time.timestamp_millis() + 1;

        clock.advance(chrono::Duration::milliseconds(5));
        let get_time = clock.now();

        let history = vec![
            Operation {
                id: "op1".to_string(),
                client_id: 0,
                api: ApiKind::Create,
                input: Input::Create(CreateBody {
                    id: "9".to_string(),
                    param: Value::empty(),
                    timeout,
                }),
                output: Some(Output::Create(promise("9", PromiseState::Pending, timeout))),
                call_event: create_time,
                return_event: create_time,
                status: Status::Ok,
                code: 201,
            },
            get_op(
                "9",
                "op2",
                get_time.timestamp_millis(),
                get_time.timestamp_millis() + 1,
                promise("9", PromiseState::RejectedTimedout, timeout),
            ),
        ];
        assert!(check(&history).is_ok());
    }

    #[test]
    fn detects_a_mismatched_get_as_a_checker_error() {
        let history = vec![
            create_op("0", "op1", 0, 1, 201, PromiseState::Pending),
            get_op("0", "op2", 2, 3, promise("0", PromiseState::Resolved, 2_524_608_000_000)),
        ];
        let err = check(&history).unwrap_err();
        assert_eq!(err.operation_id, "op2");
        assert_eq!(err.api, ApiKind::Get);
    }
}
