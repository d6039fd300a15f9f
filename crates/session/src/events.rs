#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Structural change broadcast by another session. JSON on the wire, tagged
/// by `type`:
///
/// ```json
/// {"type":"moved","page_id":"B","new_parent_id":"C","new_index":0}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuralEvent {
    Created {
        page_id: String,
        parent_id: String,
        #[serde(default)]
        index: Option<usize>,
        #[serde(default)]
        title: String,
        #[serde(default)]
        address_bound: bool,
    },
    Deleted {
        page_id: String,
    },
    Moved {
        page_id: String,
        new_parent_id: String,
        #[serde(default)]
        new_index: Option<usize>,
    },
}

impl StructuralEvent {
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
