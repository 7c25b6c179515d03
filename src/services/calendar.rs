use chrono::{Datelike, FixedOffset, NaiveDate, Offset, Utc, Weekday};

/// Maps calendar dates onto the weekly schedule key and defines the single
/// business-local zone. Schedules authored with day 0 = `week_start`.
#[derive(Debug, Clone, Copy)]
pub struct CalendarPolicy {
    pub week_start: Weekday,
    pub utc_offset: FixedOffset,
}

impl Default for CalendarPolicy {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
            utc_offset: Utc.fix(),
        }
    }
}

impl CalendarPolicy {
    pub fn new(week_start: Weekday, utc_offset_minutes: i32) -> Self {
        let utc_offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or(Utc.fix());
        Self {
            week_start,
            utc_offset,
        }
    }

    pub fn day_of_week(&self, date: NaiveDate) -> u8 {
        let day = date.weekday().num_days_from_monday();
        let start = self.week_start.num_days_from_monday();
        ((day + 7 - start) % 7) as u8
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset).date_naive()
    }
}

pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "sun" => Some(Weekday::Sun),
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        _ => None,
    }
}
