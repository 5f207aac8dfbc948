pub mod api;
pub mod clock;
pub mod error;
pub mod operation;
pub mod promise;
pub mod value;

pub use api::ApiKind;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::DomainError;
pub use operation::{
    CompleteBody, CreateBody, Input, Operation, Output, SearchParams, SearchStateFilter, Status,
};
pub use promise::{Promise, PromiseState};
pub use value::Value;
