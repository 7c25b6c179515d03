use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DayState {
    #[default]
    Open,
    Closed,
}

impl DayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayState::Open => "open",
            DayState::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(DayState::Open),
            "closed" => Some(DayState::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub status: DayState,
}

impl DayStatus {
    /// A date without a stored override is open.
    pub fn resolve(date: NaiveDate, stored: Option<DayStatus>) -> DayStatus {
        stored.unwrap_or(DayStatus {
            date,
            status: DayState::Open,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.status == DayState::Closed
    }
}
