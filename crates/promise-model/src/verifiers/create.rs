use promise_types::{Output, PromiseState, Status};

use crate::error::ModelError;
use crate::events::Event;
use crate::state::ModelState;

/// Possible outcomes: create a fresh id (201), idempotently re-create an
/// existing one (200), conflict with an existing one (403), or anything
/// else is a verifier error. A successful create always overwrites the
/// model's promise from the response -- that is the only way `param` and
/// `timeout` enter the model for a fresh id.
pub(crate) fn verify(state: &mut ModelState, call: &Event<'_>, ret: &Event<'_>) -> Result<(), ModelError> {
    let body = call
        .input
        .and_then(|i| i.as_create())
        .expect("Create operation always carries a CreateBody input");

    let at_ms = call.time.timestamp_millis();
    state.refresh(&body.id, at_ms);

    if ret.status == Status::Fail {
        return if ret.code == 403 && state.contains(&body.id) {
            Ok(())
        } else {
            Err(ModelError::CreateConflictWithoutPriorPromise {
                operation_id: call.operation_id.to_string(),
                id: body.id.clone(),
                code: ret.code,
            })
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
        Some(Output::Create(p)) => p,
        Some(_) => {
            return Err(ModelError::UnexpectedOutputShape {
                api: call.api,
                operation_id: call.operation_id.to_string(),
            });
        }
    };

    if observed.state != PromiseState::Pending {
        return Err(ModelError::CreateNotPending {
            operation_id: call.operation_id.to_string(),
            id: body.id.clone(),
            observed: observed.state,
        });
    }

    state.insert(observed.clone());

    Ok(())
}
