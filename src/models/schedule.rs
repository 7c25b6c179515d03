use serde::{Deserialize, Serialize};

/// Recurring work window for one day of the week. `day_of_week` follows the
/// configured calendar policy (0 = week start).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    pub id: String,
    pub staff_id: Option<String>,
    pub day_of_week: u8,
    pub open_time: String,
    pub close_time: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    #[serde(default, alias = "stylistId")]
    pub staff_id: Option<String>,
    pub day_of_week: u8,
    pub open_time: String,
    pub close_time: String,
}
