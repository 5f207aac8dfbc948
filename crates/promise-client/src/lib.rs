//! The client adapter: the core's only dependency on the target service's
//! wire format. Turns an `Operation` carrying a typed `Input` into a wire
//! call and fills in timing, HTTP status, and decoded output.

mod adapter;
mod error;
pub mod readiness;

pub use adapter::{ClientAdapter, HttpClient};
pub use error::ClientError;
