//! Minute-of-day arithmetic over half-open `[start, end)` intervals.

pub const MINUTES_PER_DAY: i32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    #[error("invalid time format: {0:?} (expected HH:MM)")]
    Format(String),

    #[error("minutes out of range: {0} (expected 0..=1439)")]
    Range(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: i32,
    pub end: i32,
}

impl Interval {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Touching intervals do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Parses zero-padded 24-hour "HH:MM" into minutes since midnight.
pub fn to_minutes(time: &str) -> Result<i32, TimeError> {
    let format_err = || TimeError::Format(time.to_string());

    let (hours, minutes) = time.split_once(':').ok_or_else(format_err)?;
    if hours.len() != 2
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(format_err());
    }

    let hours: i32 = hours.parse().map_err(|_| format_err())?;
    let minutes: i32 = minutes.parse().map_err(|_| format_err())?;
    if hours > 23 || minutes > 59 {
        return Err(format_err());
    }
    Ok(hours * 60 + minutes)
}

/// Request-side parse: also accepts a single-digit hour ("9:30").
pub fn parse_time_input(raw: &str) -> Result<i32, TimeError> {
    match raw.split_once(':') {
        Some((hours, _)) if hours.len() == 1 => {
            to_minutes(&format!("0{raw}")).map_err(|_| TimeError::Format(raw.to_string()))
        }
        _ => to_minutes(raw),
    }
}

/// Formats minutes since midnight as zero-padded "HH:MM".
pub fn to_time_of_day(minutes: i32) -> Result<String, TimeError> {
    if !(0..MINUTES_PER_DAY).contains(&minutes) {
        return Err(TimeError::Range(minutes));
    }
    Ok(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

/// Coalesces overlapping or touching intervals into a sorted, disjoint cover.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by_key(|i| i.start);

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i32, end: i32) -> Interval {
        Interval::new(start, end)
    }

    fn covered(intervals: &[Interval]) -> Vec<bool> {
        let mut minutes = vec![false; MINUTES_PER_DAY as usize + 120];
        for i in intervals {
            for m in i.start..i.end {
                minutes[m as usize] = true;
            }
        }
        minutes
    }

    #[test]
    fn test_to_minutes_valid() {
        assert_eq!(to_minutes("00:00"), Ok(0));
        assert_eq!(to_minutes("10:45"), Ok(645));
        assert_eq!(to_minutes("23:59"), Ok(1439));
    }

    #[test]
    fn test_single_digit_hour_only_at_input() {
        assert!(matches!(to_minutes("9:30"), Err(TimeError::Format(_))));
        assert_eq!(parse_time_input("9:30"), Ok(570));
        assert_eq!(parse_time_input("09:30"), Ok(570));
        assert_eq!(parse_time_input("9:5"), Err(TimeError::Format("9:5".to_string())));
        assert!(parse_time_input("-:30").is_err());
        assert!(parse_time_input(":30").is_err());
    }

    #[test]
    fn test_to_minutes_malformed() {
        for bad in ["", "10", "10:5", "24:00", "12:60", "ab:cd", "-1:00", "10:00:00", " 10:00", "+1:00"] {
            assert!(
                matches!(to_minutes(bad), Err(TimeError::Format(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_to_time_of_day_pads() {
        assert_eq!(to_time_of_day(0).unwrap(), "00:00");
        assert_eq!(to_time_of_day(645).unwrap(), "10:45");
        assert_eq!(to_time_of_day(1439).unwrap(), "23:59");
    }

    #[test]
    fn test_to_time_of_day_out_of_range() {
        assert_eq!(to_time_of_day(-1), Err(TimeError::Range(-1)));
        assert_eq!(to_time_of_day(1440), Err(TimeError::Range(1440)));
    }

    #[test]
    fn test_every_minute_roundtrips() {
        for m in 0..MINUTES_PER_DAY {
            let s = to_time_of_day(m).unwrap();
            assert_eq!(to_minutes(&s), Ok(m));
            assert_eq!(to_time_of_day(to_minutes(&s).unwrap()).unwrap(), s);
        }
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_intervals(vec![]).is_empty());
    }

    #[test]
    fn test_merge_overlapping_and_touching() {
        let merged = merge_intervals(vec![iv(700, 745), iv(600, 645), iv(645, 690), iv(680, 720)]);
        assert_eq!(merged, vec![iv(600, 745)]);
    }

    #[test]
    fn test_merge_keeps_gaps() {
        let merged = merge_intervals(vec![iv(900, 960), iv(600, 645), iv(646, 700)]);
        assert_eq!(merged, vec![iv(600, 645), iv(646, 700), iv(900, 960)]);
    }

    #[test]
    fn test_merge_contained_interval() {
        let merged = merge_intervals(vec![iv(600, 900), iv(650, 700)]);
        assert_eq!(merged, vec![iv(600, 900)]);
    }

    #[test]
    fn test_merge_output_sorted_disjoint_same_cover() {
        let cases = vec![
            vec![iv(10, 20), iv(5, 15), iv(30, 40), iv(40, 50), iv(0, 1)],
            vec![iv(600, 645), iv(600, 645), iv(600, 645)],
            vec![iv(1000, 1100), iv(0, 1439), iv(50, 60)],
            vec![iv(300, 345), iv(200, 245), iv(100, 145), iv(145, 200)],
        ];
        for input in cases {
            let merged = merge_intervals(input.clone());
            for pair in merged.windows(2) {
                assert!(pair[0].end < pair[1].start, "not disjoint: {merged:?}");
            }
            assert_eq!(covered(&merged), covered(&input));
        }
    }

    #[test]
    fn test_overlaps_half_open() {
        assert!(iv(600, 645).overlaps(&iv(630, 700)));
        assert!(iv(630, 700).overlaps(&iv(600, 645)));
        assert!(iv(600, 700).overlaps(&iv(620, 640)));
        assert!(!iv(600, 645).overlaps(&iv(645, 690)));
        assert!(!iv(645, 690).overlaps(&iv(600, 645)));
    }
}
