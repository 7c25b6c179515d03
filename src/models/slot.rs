use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub time: String,
    pub staff_id: Option<String>,
    pub staff_name: Option<String>,
}
