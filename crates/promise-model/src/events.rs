//! Derives the checker's (call, return) sequence from a recorded history.
//!
//! Events are not stored; they are computed at check time from each
//! `Operation`'s call and return halves. Pairing is done by operation id --
//! each `Operation` already carries both of its halves, so the pair falls
//! out directly without needing to re-associate events after sorting -- and
//! the resulting pairs are sorted by the tie-breaking rule the Checker uses
//! to impose a single total order (call time, then operation id).

use chrono::{DateTime, Utc};
use promise_types::{ApiKind, Input, Operation, Output, Status};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Call,
    Return,
}

/// One endpoint of an `Operation`. `input` is set on `Call`, `output` on
/// `Return` (and may be `None` there if the transport never produced a body).
#[derive(Clone, Debug)]
pub struct Event<'h> {
    pub kind: EventKind,
    pub time: DateTime<Utc>,
    pub operation_id: &'h str,
    pub client_id: u32,
    pub api: ApiKind,
    pub status: Status,
    pub code: i32,
    pub input: Option<&'h Input>,
    pub output: Option<&'h Output>,
}

fn call_event(op: &Operation) -> Event<'_> {
    Event {
        kind: EventKind::Call,
        time: op.call_event,
        operation_id: &op.id,
        client_id: op.client_id,
        api: op.api,
        status: op.status,
        code: op.code,
        input: Some(&op.input),
        output: None,
    }
}

fn return_event(op: &Operation) -> Event<'_> {
    Event {
        kind: EventKind::Return,
        time: op.return_event,
        operation_id: &op.id,
        client_id: op.client_id,
        api: op.api,
        status: op.status,
        code: op.code,
        input: None,
        output: op.output.as_ref(),
    }
}

/// Build the checker's (call, return) sequence for a history: one pair per
/// operation, ordered by call time and tie-broken by operation id ascending.
///
/// Pairing by operation id up front (rather than flattening into individual
/// events and re-associating adjacent entries after a global time sort)
/// matters once more than one client is in flight: a second client's call can
/// land between another operation's call and return, which would desync a
/// flat, position-based pairing.
pub fn make_events(history: &[Operation]) -> Vec<(Event<'_>, Event<'_>)> {
    let mut pairs: Vec<(Event<'_>, Event<'_>)> =
        history.iter().map(|op| (call_event(op), return_event(op))).collect();

    pairs.sort_by(|a, b| a.0.time.cmp(&b.0.time).then_with(|| a.0.operation_id.cmp(b.0.operation_id)));

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use promise_types::CompleteBody;

    fn op(id: &str, call_ms: i64, return_ms: i64) -> Operation {
        Operation {
            id: id.to_string(),
            client_id: 0,
            api: ApiKind::Cancel,
            input: Input::Complete(CompleteBody {
                id: "x".to_string(),
                value: Default::default(),
            }),
            output: None,
            call_event: Utc.timestamp_millis_opt(call_ms).unwrap(),
            return_event: Utc.timestamp_millis_opt(return_ms).unwrap(),
            status: Status::Ok,
            code: 200,
        }
    }

    #[test]
    fn sorts_by_call_time_then_id() {
        let history = vec![op("b", 10, 20), op("a", 10, 15)];
        let pairs = make_events(&history);

        // Both calls land at time 10; "a" sorts before "b" by id.
        assert_eq!(pairs[0].0.operation_id, "a");
        assert_eq!(pairs[1].0.operation_id, "b");
    }

    #[test]
    fn each_pair_keeps_its_own_call_and_return() {
        let history = vec![op("a", 10, 15), op("b", 20, 25)];
        let pairs = make_events(&history);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0.operation_id, "a");
        assert_eq!(pairs[0].0.kind, EventKind::Call);
        assert_eq!(pairs[0].1.operation_id, "a");
        assert_eq!(pairs[0].1.kind, EventKind::Return);
        assert_eq!(pairs[1].0.operation_id, "b");
        assert_eq!(pairs[1].1.operation_id, "b");
    }

    #[test]
    fn pairing_survives_an_overlapping_concurrent_operation() {
        // "a" (client 0) spans [10, 30]; "b" (client 1) calls and returns
        // entirely inside that span. A flat, position-based pairing would
        // desync here (a.call, b.call, b.return, a.return); pairing by
        // operation id does not.
        let mut history = vec![op("a", 10, 30)];
        history.push(Operation { client_id: 1, ..op("b", 15, 20) });
        let pairs = make_events(&history);

        assert_eq!(pairs.len(), 2);
        let a = pairs.iter().find(|(call, _)| call.operation_id == "a").unwrap();
        assert_eq!(a.0.time.timestamp_millis(), 10);
        assert_eq!(a.1.time.timestamp_millis(), 30);
        let b = pairs.iter().find(|(call, _)| call.operation_id == "b").unwrap();
        assert_eq!(b.0.time.timestamp_millis(), 15);
        assert_eq!(b.1.time.timestamp_millis(), 20);
    }
}
