//! The sequential reference model for the promise service, and the
//! linearizability checker that drives a recorded history through it.
//!
//! This crate is the hardest part of the harness (see the purpose and
//! scope of the system this crate belongs to): it owns the per-api step
//! verifiers, the time-driven implicit-timeout rule, the clock-skew
//! accommodation between client- and server-observed time, and the
//! event-sequencing that turns an unordered history into the single total
//! order the model is checked against.

pub mod checker;
pub mod error;
pub mod events;
pub mod model;
pub mod state;
mod verifiers;

pub use checker::{CheckError, check};
pub use error::ModelError;
pub use events::{Event, EventKind, make_events};
pub use model::Model;
pub use state::{ModelState, promises_equal, summarize};
