use promise_types::{Output, PromiseState, Status};

use crate::error::ModelError;
use crate::events::Event;
use crate::state::{ModelState, promises_equal, summarize};

/// Possible outcomes, per the model: get a promise that exists and matches,
/// get a promise that does not exist (404 accepted), or anything else is a
/// verifier error. The implicit-timeout rewrite and clock-skew override (see
/// `crate::state::promises_equal`) both apply on the existing-promise path.
pub(crate) fn verify(state: &mut ModelState, call: &Event<'_>, ret: &Event<'_>) -> Result<(), ModelError> {
    let id = call
        .input
        .and_then(|i| i.as_get())
        .expect("Get operation always carries an id input")
        .to_string();

    let at_ms = call.time.timestamp_millis();
    state.refresh(&id, at_ms);

    match state.get(&id).cloned() {
        None => {
            if ret.status == Status::Fail && ret.code == 404 {
                Ok(())
            } else {
                Err(ModelError::UnexpectedStatus {
                    api: call.api,
                    operation_id: call.operation_id.to_string(),
                    status: ret.status,
                    code: ret.code,
                })
            }
        }
        Some(expected) => {
            if ret.status != Status::Ok || ret.code != 200 {
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
                Some(Output::Get(p)) => p,
                Some(_) => {
                    return Err(ModelError::UnexpectedOutputShape {
                        api: call.api,
                        operation_id: call.operation_id.to_string(),
                    });
                }
            };

            if !promises_equal(&expected, observed) {
                return Err(ModelError::GetPromiseMismatch {
                    operation_id: call.operation_id.to_string(),
                    id,
                    expected: summarize(&expected),
                    observed: summarize(observed),
                });
            }

            // Clock-skew accommodation: the server's clock is authoritative
            // for timeout, so adopt it even if the model had not yet
            // rewritten this promise via `refresh`.
            if observed.state == PromiseState::RejectedTimedout && expected.state != PromiseState::RejectedTimedout {
                let mut rewritten = expected;
                rewritten.state = PromiseState::RejectedTimedout;
                state.insert(rewritten);
            }

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use promise_types::{ApiKind, Input, Promise, Value};

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

    fn events<'a>(id: &'a str, output: Option<&'a Output>) -> (Event<'a>, Event<'a>) {
        let input = Box::leak(Box::new(Input::Get(id.to_string())));
        let time = Utc.timestamp_millis_opt(500).unwrap();
        let call = Event {
            kind: crate::events::EventKind::Call,
            time,
            operation_id: "op",
            client_id: 0,
            api: ApiKind::Get,
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
            api: ApiKind::Get,
            status: if output.is_some() { Status::Ok } else { Status::Fail },
            code: if output.is_some() { 200 } else { 404 },
            input: None,
            output,
        };
        (call, ret)
    }

    #[test]
    fn accepts_404_when_model_has_no_promise() {
        let mut state = ModelState::new();
        let (call, ret) = events("missing", None);
        assert!(verify(&mut state, &call, &ret).is_ok());
    }

    #[test]
    fn rejects_ok_when_model_has_no_promise() {
        let mut state = ModelState::new();
        let output = Output::Get(promise("missing", PromiseState::Pending, 1_000_000));
        let (call, ret) = events("missing", Some(&output));
        assert!(matches!(
            verify(&mut state, &call, &ret),
            Err(ModelError::UnexpectedStatus { .. })
        ));
    }

    #[test]
    fn accepts_matching_existing_promise() {
        let mut state = ModelState::new();
        state.insert(promise("a", PromiseState::Pending, 1_000_000));
        let output = Output::Get(promise("a", PromiseState::Pending, 1_000_000));
        let (call, ret) = events("a", Some(&output));
        assert!(verify(&mut state, &call, &ret).is_ok());
    }

    #[test]
    fn rejects_mismatched_existing_promise() {
        let mut state = ModelState::new();
        state.insert(promise("a", PromiseState::Pending, 1_000_000));
        let output = Output::Get(promise("a", PromiseState::Resolved, 1_000_000));
        let (call, ret) = events("a", Some(&output));
        assert!(matches!(
            verify(&mut state, &call, &ret),
            Err(ModelError::GetPromiseMismatch { .. })
        ));
    }

    #[test]
    fn accepts_and_rewrites_on_server_reported_timeout() {
        let mut state = ModelState::new();
        state.insert(promise("a", PromiseState::Pending, 1_000_000));
        let output = Output::Get(promise("a", PromiseState::RejectedTimedout, 1_000_000));
        let (call, ret) = events("a", Some(&output));
        assert!(verify(&mut state, &call, &ret).is_ok());
        assert_eq!(state.get("a").unwrap().state, PromiseState::RejectedTimedout);
    }
}
