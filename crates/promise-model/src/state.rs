//! The reference model's abstract view of the service: a map from promise id
//! to the last-known `Promise`, plus the implicit-timeout rewrite and the
//! clock-skew-tolerant equality comparator every verifier compares against.

use std::collections::HashMap;

use promise_types::{Promise, PromiseState};

/// One linearization attempt's worth of model state. Mutated in place: the
/// sequential-per-client checker (see `crate::checker`) never needs to
/// explore alternative linearizations, so there is nothing to clone-on-write
/// for (see the Design Notes on deep-copied state in the source material).
#[derive(Clone, Debug, Default)]
pub struct ModelState {
    promises: HashMap<String, Promise>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Promise> {
        self.promises.get(id)
    }

    pub fn insert(&mut self, promise: Promise) {
        self.promises.insert(promise.id.clone(), promise);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.promises.contains_key(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Promise> {
        self.promises.values()
    }

    /// Apply the time-driven implicit timeout rule to the promise at `id`,
    /// if present: once `promise.timeout <= at_ms`, the promise is considered
    /// `REJECTED_TIMEDOUT` regardless of what completion event was last seen.
    ///
    /// Called from every verifier's read path before comparing against the
    /// server's response, per the model's "implicit timeout as a read-through
    /// rewrite" design (kept in this one place rather than scattered per
    /// verifier).
    pub fn refresh(&mut self, id: &str, at_ms: i64) {
        if let Some(promise) = self.promises.get_mut(id)
            && promise.state == PromiseState::Pending
            && promise.is_past_deadline(at_ms)
        {
            promise.state = PromiseState::RejectedTimedout;
        }
    }

    /// Refresh every promise currently known to the model against `at_ms`.
    /// Used by the Search verifier, which filters across all promises rather
    /// than a single id.
    pub fn refresh_all(&mut self, at_ms: i64) {
        for promise in self.promises.values_mut() {
            if promise.state == PromiseState::Pending && promise.is_past_deadline(at_ms) {
                promise.state = PromiseState::RejectedTimedout;
            }
        }
    }
}

/// Compares a model promise against the server's response under the
/// clock-skew accommodation rule: if the server reports `REJECTED_TIMEDOUT`,
/// that is always accepted (the server's clock is authoritative for
/// timeout); otherwise `state` must match exactly. `id`, `param`, `timeout`,
/// `tags`, and `value` always require exact equality; `created_on` and
/// `completed_on` are ignored.
pub fn promises_equal(expected: &Promise, observed: &Promise) -> bool {
    if expected.id != observed.id {
        return false;
    }
    if expected.param != observed.param {
        return false;
    }
    if expected.timeout != observed.timeout {
        return false;
    }
    if expected.tags != observed.tags {
        return false;
    }
    if expected.value != observed.value {
        return false;
    }
    if observed.state == PromiseState::RejectedTimedout {
        return true;
    }
    expected.state == observed.state
}

/// Renders a promise's checker-relevant fields for error messages. Omits
/// `created_on`/`completed_on` since those are never part of the comparison
/// (see `promises_equal`).
pub fn summarize(promise: &Promise) -> String {
    format!(
        "{{id: {}, state: {:?}, timeout: {}, param: {:?}, value: {:?}, tags: {:?}}}",
        promise.id, promise.state, promise.timeout, promise.param, promise.value, promise.tags
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use promise_types::Value;

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

    #[test]
    fn refresh_rewrites_to_timedout_past_deadline() {
        let mut state = ModelState::new();
        state.insert(promise("a", PromiseState::Pending, 1000));
        state.refresh("a", 1000);
        assert_eq!(state.get("a").unwrap().state, PromiseState::RejectedTimedout);
    }

    #[test]
    fn refresh_leaves_pending_before_deadline() {
        let mut state = ModelState::new();
        state.insert(promise("a", PromiseState::Pending, 1000));
        state.refresh("a", 999);
        assert_eq!(state.get("a").unwrap().state, PromiseState::Pending);
    }

    #[test]
    fn refresh_does_not_resurrect_completed_states() {
        let mut state = ModelState::new();
        state.insert(promise("a", PromiseState::Resolved, 1000));
        state.refresh("a", 2000);
        // Already resolved before the deadline passed -- resolved wins, the
        // server would never report timeout for an already-completed promise.
        assert_eq!(state.get("a").unwrap().state, PromiseState::Resolved);
    }

    #[test]
    fn equality_ignores_created_and_completed_on() {
        let mut a = promise("a", PromiseState::Pending, 1000);
        let mut b = a.clone();
        a.created_on = Some(1);
        b.created_on = Some(2);
        a.completed_on = Some(3);
        b.completed_on = None;
        assert!(promises_equal(&a, &b));
    }

    #[test]
    fn equality_accepts_server_reported_timeout_override() {
        let expected = promise("a", PromiseState::Pending, 1000);
        let observed = promise("a", PromiseState::RejectedTimedout, 1000);
        assert!(promises_equal(&expected, &observed));
    }

    #[test]
    fn equality_rejects_mismatched_state_otherwise() {
        let expected = promise("a", PromiseState::Pending, 1000);
        let observed = promise("a", PromiseState::Resolved, 1000);
        assert!(!promises_equal(&expected, &observed));
    }

    #[test]
    fn equality_requires_exact_param_match() {
        let expected = promise("a", PromiseState::Pending, 1000);
        let mut observed = expected.clone();
        observed.param = Value::new("different");
        assert!(!promises_equal(&expected, &observed));
    }
}
