use promise_types::{Output, PromiseState, SearchStateFilter, Status};

use crate::error::ModelError;
use crate::events::Event;
use crate::state::{ModelState, promises_equal, summarize};

fn matches_id_pattern(pattern: &str, id: &str) -> bool {
    pattern == "*" || pattern == id
}

fn matches_state_query(query: SearchStateFilter, state: PromiseState) -> bool {
    match query {
        SearchStateFilter::Pending => state == PromiseState::Pending,
        SearchStateFilter::Resolved => state == PromiseState::Resolved,
        SearchStateFilter::Rejected => state.is_rejected_family(),
    }
}

/// Search never mutates the model beyond the implicit-timeout rewrite
/// applied by `refresh_all` as part of evaluating the query: the response is
/// compared against a local filter-and-sort of the current model state.
pub(crate) fn verify(state: &mut ModelState, call: &Event<'_>, ret: &Event<'_>) -> Result<(), ModelError> {
    let params = call
        .input
        .and_then(|i| i.as_search())
        .expect("Search operation always carries SearchParams input");

    if ret.status != Status::Ok || ret.code != 200 {
        return Err(ModelError::UnexpectedStatus {
            api: call.api,
            operation_id: call.operation_id.to_string(),
            status: ret.status,
            code: ret.code,
        });
    }

    let at_ms = call.time.timestamp_millis();
    state.refresh_all(at_ms);

    let mut expected: Vec<_> = state
        .values()
        .filter(|p| matches_id_pattern(&params.id, &p.id) && matches_state_query(params.state, p.state))
        .cloned()
        .collect();
    expected.sort_by(|a, b| a.id.cmp(&b.id));

    let observed = match ret.output {
        None => {
            return Err(ModelError::MissingOutput {
                api: call.api,
                operation_id: call.operation_id.to_string(),
            });
        }
        Some(Output::Search(promises)) => promises,
        Some(_) => {
            return Err(ModelError::UnexpectedOutputShape {
                api: call.api,
                operation_id: call.operation_id.to_string(),
            });
        }
    };
    let mut observed: Vec<_> = observed.clone();
    observed.sort_by(|a, b| a.id.cmp(&b.id));

    let equal = expected.len() == observed.len()
        && expected
            .iter()
            .zip(observed.iter())
            .all(|(e, o)| promises_equal(e, o));

    if !equal {
        return Err(ModelError::SearchResultMismatch {
            operation_id: call.operation_id.to_string(),
            expected: expected.iter().map(summarize).collect::<Vec<_>>().join(", "),
            observed: observed.iter().map(summarize).collect::<Vec<_>>().join(", "),
        });
    }

    Ok(())
}
