//! Per-api step verifiers for the reference model.
//!
//! Each sub-module owns one api's verification rule from the model's
//! specification (Search, Get, Create, and the shared Cancel/Resolve/Reject
//! "complete" rule) and exposes a single `verify(&mut ModelState, &Event,
//! &Event) -> Result<(), ModelError>` function. `Model::step` (see
//! `crate::model`) dispatches to these by matching on `ApiKind` rather than
//! through a trait object, since the api set is closed and known at compile
//! time -- an exhaustive match costs nothing and avoids boxing a verifier
//! per call.

mod complete;
mod create;
mod get;
mod search;

use promise_types::ApiKind;

use crate::error::ModelError;
use crate::events::Event;
use crate::state::ModelState;

pub(crate) fn verify(state: &mut ModelState, call: &Event<'_>, ret: &Event<'_>) -> Result<(), ModelError> {
    match call.api {
        ApiKind::Search => search::verify(state, call, ret),
        ApiKind::Get => get::verify(state, call, ret),
        ApiKind::Create => create::verify(state, call, ret),
        ApiKind::Cancel | ApiKind::Resolve | ApiKind::Reject => complete::verify(state, call, ret),
    }
}
