use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::StaffKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub service_id: String,
    pub staff_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub date: NaiveDate,
    /// Start time as zero-padded "HH:MM".
    pub time: String,
    /// Snapshot of the service duration at booking time.
    pub duration_minutes: i32,
    pub status: BookingStatus,
    pub source: BookingSource,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    pub fn staff_key(&self) -> StaffKey {
        StaffKey::from_option(self.staff_id.as_deref())
    }
}

/// Everything needed to insert a booking; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub service_id: String,
    pub staff_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub date: NaiveDate,
    pub time: String,
    pub duration_minutes: i32,
    pub status: BookingStatus,
    pub source: BookingSource,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BookingSource {
    #[default]
    #[serde(rename = "online")]
    Online,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "offline-sync")]
    OfflineSync,
}

impl BookingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingSource::Online => "online",
            BookingSource::Admin => "admin",
            BookingSource::OfflineSync => "offline-sync",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(BookingSource::Online),
            "admin" => Some(BookingSource::Admin),
            "offline-sync" => Some(BookingSource::OfflineSync),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_matches_as_str() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("done"), None);
    }

    #[test]
    fn test_source_serializes_with_hyphen() {
        let json = serde_json::to_string(&BookingSource::OfflineSync).unwrap();
        assert_eq!(json, r#""offline-sync""#);
        assert_eq!(BookingSource::parse("offline-sync"), Some(BookingSource::OfflineSync));
        assert_eq!(BookingSource::parse("phone"), None);
    }

    #[test]
    fn test_source_defaults_to_online() {
        assert_eq!(BookingSource::default(), BookingSource::Online);
    }
}
