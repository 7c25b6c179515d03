use std::env;
use std::time::Duration;

use chrono::Weekday;

use crate::services::calendar::{parse_weekday, CalendarPolicy};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub store_timeout: Duration,
    pub week_start: Weekday,
    pub utc_offset_minutes: i32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "salonbook.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            store_timeout: Duration::from_millis(
                env::var("STORE_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5000),
            ),
            week_start: env::var("SCHEDULE_WEEK_START")
                .ok()
                .and_then(|v| parse_weekday(&v))
                .unwrap_or(Weekday::Sun),
            utc_offset_minutes: env::var("UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    pub fn calendar(&self) -> CalendarPolicy {
        CalendarPolicy::new(self.week_start, self.utc_offset_minutes)
    }
}
