use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque payload envelope attached to a promise's `param` and `value` fields.
///
/// `data` is base64-encoded on the wire; this harness never decodes it, since
/// the model only ever needs to compare envelopes for equality, not interpret
/// their contents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Value {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            headers: None,
            data: Some(data.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}
