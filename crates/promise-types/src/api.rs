use std::fmt;

use serde::{Deserialize, Serialize};

/// The six operations the target service exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApiKind {
    Search,
    Get,
    Create,
    Cancel,
    Resolve,
    Reject,
}

impl ApiKind {
    /// All API kinds, in the order the generator draws them from (see
    /// `promise-harness::generator`).
    pub const ALL: [ApiKind; 6] = [
        ApiKind::Search,
        ApiKind::Get,
        ApiKind::Create,
        ApiKind::Cancel,
        ApiKind::Resolve,
        ApiKind::Reject,
    ];
}

impl fmt::Display for ApiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApiKind::Search => "SEARCH",
            ApiKind::Get => "GET",
            ApiKind::Create => "CREATE",
            ApiKind::Cancel => "CANCEL",
            ApiKind::Resolve => "RESOLVE",
            ApiKind::Reject => "REJECT",
        };
        write!(f, "{s}")
    }
}
