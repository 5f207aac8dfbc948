//! The reference model's public contract: `Init` / `Step` over the
//! per-api verifiers in `crate::verifiers`.
//!
//! The model carries no fields of its own -- verifier dispatch is an
//! exhaustive match on `ApiKind` rather than a map of trait objects (see the
//! Design Notes on the verifier dispatch table), so `Model` exists purely to
//! give that match a home with a stable, documented entry point.

use crate::error::ModelError;
use crate::events::Event;
use crate::state::ModelState;
use crate::verifiers;

#[derive(Clone, Copy, Debug, Default)]
pub struct Model;

impl Model {
    pub fn new() -> Self {
        Self
    }

    /// `Init() -> State` from the component design: a fresh, empty model.
    pub fn init(&self) -> ModelState {
        ModelState::new()
    }

    /// `Step(state, callEvent, returnEvent) -> (newState, Ok | Error)`.
    ///
    /// The sequential-per-client checker never needs to branch over
    /// alternative linearizations, so `state` is mutated in place rather
    /// than cloned-on-write (see the Design Notes on deep-copied state).
    pub fn step(&self, state: &mut ModelState, call: &Event<'_>, ret: &Event<'_>) -> Result<(), ModelError> {
        verifiers::verify(state, call, ret)
    }
}
