use promise_types::{ApiKind, Output, PromiseState, Status};

use crate::error::ModelError;
use crate::events::Event;
use crate::state::ModelState;

/// The terminal state a given "complete" api is meant to produce. Shared by
/// Cancel, Resolve, and Reject, which differ only in this mapping -- the
/// request body itself carries no target state (see `promise_types::operation`).
fn desired_terminal_state(api: ApiKind) -> PromiseState {
    match api {
        ApiKind::Resolve => PromiseState::Resolved,
        ApiKind::Reject => PromiseState::Rejected,
        ApiKind::Cancel => PromiseState::RejectedCanceled,
        _ => unreachable!("complete::verify is only dispatched for Cancel/Resolve/Reject"),
    }
}

pub(crate) fn verify(state: &mut ModelState, call: &Event<'_>, ret: &Event<'_>) -> Result<(), ModelError> {
    let body = call
        .input
        .and_then(|i| i.as_complete())
        .expect("Complete operation always carries a CompleteBody input");

    let at_ms = call.time.timestamp_millis();
    state.refresh(&body.id, at_ms);

    if ret.status == Status::Fail {
        return match ret.code {
            403 => match state.get(&body.id) {
                Some(existing) if existing.state.is_terminal() => Ok(()),
                _ => Err(ModelError::CompleteForbiddenButNotTerminal {
                    api: call.api,
                    operation_id: call.operation_id.to_string(),
                    id: body.id.clone(),
                    code: ret.code,
                }),
            },
            404 => {
                if state.contains(&body.id) {
                    Err(ModelError::CompleteNotFoundButModelHasPromise {
                        api: call.api,
                        operation_id: call.operation_id.to_string(),
                        id: body.id.clone(),
                    })
                } else {
                    Ok(())
                }
            }
            _ => Err(ModelError::UnexpectedStatus {
                api: call.api,
                operation_id: call.operation_id.to_string(),
                status: ret.status,
                code: ret.code,
            }),
        };
    }

    if ret.status != Status::Ok || !matches!(ret.code, 200 | 201) {
        return Err(ModelError::UnexpectedStatus {
            api: call.api,
            operation_id: call.operation_id.to_string(),
            status: ret.status,
            code: ret.code,
        });
    }

    let observed = match ret.output {
        None => {
            return Err(ModelError::MissingOutput {
                api: call.api,
                operation_id: call.operation_id.to_string(),
            });
        }
        Some(Output::Complete(p)) => p,
        Some(_) => {
            return Err(ModelError::UnexpectedOutputShape {
                api: call.api,
                operation_id: call.operation_id.to_string(),
            });
        }
    };

    let expected = desired_terminal_state(call.api);
    if observed.state != expected {
        return Err(ModelError::CompleteWrongTerminalState {
            api: call.api,
            operation_id: call.operation_id.to_string(),
            id: body.id.clone(),
            expected,
            observed: observed.state,
        });
    }

    state.insert(observed.clone());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use promise_types::{CompleteBody, Input, Promise, Value};

    fn promise(id: &str, state: PromiseState) -> Promise {
        Promise {
            id: id.to_string(),
            state,
            param: Value::empty(),
            value: Value::empty(),
            timeout: 2_524_608_000_000,
            tags: None,
            created_on: None,
            completed_on: None,
        }
    }

    fn events<'a>(
        api: ApiKind,
        id: &'a str,
        output: Option<&'a Output>,
        status: Status,
        code: i32,
    ) -> (Event<'a>, Event<'a>) {
        let input = Box::leak(Box::new(Input::Complete(CompleteBody {
            id: id.to_string(),
            value: Value::empty(),
        })));
        let time = Utc.timestamp_millis_opt(500).unwrap();
        let call = Event {
            kind: crate::events::EventKind::Call,
            time,
            operation_id: "op",
            client_id: 0,
            api,
            status: Status::Invoke,
            code: -1,
            input: Some(input),
            output: None,
        };
        let ret = Event {
            kind: crate::events::EventKind::Return,
            time,
            operation_id: "op",
            client_id: 0,
            api,
            status,
            code,
            input: None,
            output,
        };
        (call, ret)
    }

    #[test]
    fn resolve_success_overwrites_model() {
        let mut state = ModelState::new();
        state.insert(promise("7", PromiseState::Pending));
        let output = Output::Complete(promise("7", PromiseState::Resolved));
        let (call, ret) = events(ApiKind::Resolve, "7", Some(&output), Status::Ok, 200);
        assert!(verify(&mut state, &call, &ret).is_ok());
        assert_eq!(state.get("7").unwrap().state, PromiseState::Resolved);
    }

    #[test]
    fn reject_after_resolve_is_forbidden_and_accepted_as_403() {
        let mut state = ModelState::new();
        state.insert(promise("7", PromiseState::Resolved));
        let (call, ret) = events(ApiKind::Reject, "7", None, Status::Fail, 403);
        assert!(verify(&mut state, &call, &ret).is_ok());
        // already-terminal state is untouched by a rejected completion attempt
        assert_eq!(state.get("7").unwrap().state, PromiseState::Resolved);
    }

    #[test]
    fn forbidden_403_rejected_when_model_promise_is_still_pending() {
        let mut state = ModelState::new();
        state.insert(promise("7", PromiseState::Pending));
        let (call, ret) = events(ApiKind::Resolve, "7", None, Status::Fail, 403);
        assert!(matches!(
            verify(&mut state, &call, &ret),
            Err(ModelError::CompleteForbiddenButNotTerminal { .. })
        ));
    }

    #[test]
    fn not_found_404_accepted_when_model_has_no_promise() {
        let mut state = ModelState::new();
        let (call, ret) = events(ApiKind::Cancel, "missing", None, Status::Fail, 404);
        assert!(verify(&mut state, &call, &ret).is_ok());
    }

    #[test]
    fn not_found_404_rejected_when_model_has_promise() {
        let mut state = ModelState::new();
        state.insert(promise("7", PromiseState::Pending));
        let (call, ret) = events(ApiKind::Cancel, "7", None, Status::Fail, 404);
        assert!(matches!(
            verify(&mut state, &call, &ret),
            Err(ModelError::CompleteNotFoundButModelHasPromise { .. })
        ));
    }

    #[test]
    fn success_with_wrong_terminal_state_is_an_error() {
        let mut state = ModelState::new();
        state.insert(promise("7", PromiseState::Pending));
        let output = Output::Complete(promise("7", PromiseState::RejectedCanceled));
        let (call, ret) = events(ApiKind::Resolve, "7", Some(&output), Status::Ok, 200);
        assert!(matches!(
            verify(&mut state, &call, &ret),
            Err(ModelError::CompleteWrongTerminalState { .. })
        ));
    }
}
