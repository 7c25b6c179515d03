//! Open-slot computation for a (date, service, optional staff) query.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{DayStatus, Slot, StaffKey};
use crate::services::calendar::CalendarPolicy;
use crate::services::interval::{merge_intervals, to_minutes, to_time_of_day, Interval};
use crate::store::RecordStore;

/// Candidate starts inside `window`, stepped by `duration` from the window
/// start, that do not overlap any `busy` block.
pub fn open_starts(window: Interval, duration: i32, busy: &[Interval]) -> Vec<i32> {
    let mut starts = Vec::new();
    if duration <= 0 {
        return starts;
    }

    let mut start = window.start;
    while start + duration <= window.end {
        let candidate = Interval::new(start, start + duration);
        if !busy.iter().any(|block| block.overlaps(&candidate)) {
            starts.push(start);
        }
        start += duration;
    }
    starts
}

pub async fn compute_slots(
    store: &dyn RecordStore,
    calendar: &CalendarPolicy,
    date: NaiveDate,
    service_id: &str,
    staff_id: Option<&str>,
) -> Result<Vec<Slot>, AppError> {
    let service = store
        .find_service(service_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

    let day = DayStatus::resolve(date, store.find_day_status(date).await?);
    if day.is_closed() {
        tracing::debug!(%date, "day closed, no slots");
        return Ok(vec![]);
    }

    let day_of_week = calendar.day_of_week(date);
    let schedules = store.find_schedules(day_of_week, staff_id).await?;
    if schedules.is_empty() {
        return Ok(vec![]);
    }

    let mut windows: BTreeMap<StaffKey, Vec<Interval>> = BTreeMap::new();
    for schedule in &schedules {
        let window = Interval::new(
            to_minutes(&schedule.open_time)?,
            to_minutes(&schedule.close_time)?,
        );
        windows
            .entry(StaffKey::from_option(schedule.staff_id.as_deref()))
            .or_default()
            .push(window);
    }

    let staff_filter = staff_id.map(|id| StaffKey::Specific(id.to_string()));
    let bookings = store
        .find_confirmed_bookings(date, staff_filter.as_ref())
        .await?;

    let mut booked: HashMap<StaffKey, Vec<Interval>> = HashMap::new();
    for booking in &bookings {
        let start = to_minutes(&booking.time)?;
        booked
            .entry(booking.staff_key())
            .or_default()
            .push(Interval::new(start, start + booking.duration_minutes));
    }
    let busy: HashMap<StaffKey, Vec<Interval>> = booked
        .into_iter()
        .map(|(key, intervals)| (key, merge_intervals(intervals)))
        .collect();

    let duration = service.duration_minutes;
    let mut found: Vec<(i32, Slot)> = Vec::new();
    for (key, staff_windows) in &windows {
        let staff_name = match key {
            StaffKey::Specific(id) => store.find_staff(id).await?.map(|s| s.name),
            StaffKey::Unassigned => None,
        };
        let blocks = busy.get(key).map(Vec::as_slice).unwrap_or(&[]);

        for window in staff_windows {
            for start in open_starts(*window, duration, blocks) {
                found.push((
                    start,
                    Slot {
                        time: to_time_of_day(start)?,
                        staff_id: key.staff_id().map(str::to_string),
                        staff_name: staff_name.clone(),
                    },
                ));
            }
        }
    }

    // Unnamed (unassigned or unknown staff) sorts before named staff at the same time.
    found.sort_by(|(a_start, a), (b_start, b)| {
        a_start
            .cmp(b_start)
            .then_with(|| a.staff_name.cmp(&b.staff_name))
    });

    tracing::debug!(%date, service_id, slots = found.len(), "computed availability");
    Ok(found.into_iter().map(|(_, slot)| slot).collect())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::{
        BookingDraft, BookingSource, BookingStatus, DayState, NewSchedule, NewService, NewStaff,
        Service, Staff,
    };
    use crate::store::SqliteStore;

    // 2025-06-16 is a Monday (day 1 with Sunday-first numbering)
    const MONDAY: u8 = 1;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
    }

    fn test_store() -> SqliteStore {
        SqliteStore::open(":memory:", Duration::from_secs(5)).unwrap()
    }

    async fn service(store: &SqliteStore, duration_minutes: i32) -> Service {
        store
            .insert_service(NewService {
                name: format!("{duration_minutes} min service"),
                description: None,
                duration_minutes,
                price: 500,
                active: true,
            })
            .await
            .unwrap()
    }

    async fn staff(store: &SqliteStore, name: &str) -> Staff {
        store
            .insert_staff(NewStaff {
                name: name.to_string(),
                specialties: vec![],
            })
            .await
            .unwrap()
    }

    async fn window(store: &SqliteStore, staff_id: Option<&str>, open: &str, close: &str) {
        store
            .insert_schedule(NewSchedule {
                staff_id: staff_id.map(str::to_string),
                day_of_week: MONDAY,
                open_time: open.to_string(),
                close_time: close.to_string(),
            })
            .await
            .unwrap();
    }

    async fn book(store: &SqliteStore, svc: &Service, staff_id: Option<&str>, time: &str, status: BookingStatus) {
        store
            .insert_booking(BookingDraft {
                service_id: svc.id.clone(),
                staff_id: staff_id.map(str::to_string),
                customer_name: "Alice".to_string(),
                customer_email: "alice@example.com".to_string(),
                customer_phone: String::new(),
                date: monday(),
                time: time.to_string(),
                duration_minutes: svc.duration_minutes,
                status,
                source: BookingSource::Online,
            })
            .await
            .unwrap();
    }

    async fn times(store: &SqliteStore, svc: &Service, staff_id: Option<&str>) -> Vec<String> {
        compute_slots(store, &CalendarPolicy::default(), monday(), &svc.id, staff_id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.time)
            .collect()
    }

    #[test]
    fn test_open_starts_steps_by_duration() {
        assert_eq!(open_starts(Interval::new(600, 690), 45, &[]), vec![600, 645]);
        assert_eq!(open_starts(Interval::new(600, 689), 45, &[]), vec![600]);
    }

    #[test]
    fn test_open_starts_short_window_is_empty() {
        assert!(open_starts(Interval::new(600, 630), 45, &[]).is_empty());
        assert!(open_starts(Interval::new(600, 600), 45, &[]).is_empty());
    }

    #[test]
    fn test_open_starts_skips_busy_blocks() {
        let busy = [Interval::new(630, 660)];
        assert_eq!(open_starts(Interval::new(600, 780), 30, &busy), vec![600, 660, 690, 720, 750]);
    }

    #[tokio::test]
    async fn test_scenario_a_window_fits_two_slots() {
        let store = test_store();
        let svc = service(&store, 45).await;
        window(&store, None, "10:00", "11:30").await;

        assert_eq!(times(&store, &svc, None).await, vec!["10:00", "10:45"]);
    }

    #[tokio::test]
    async fn test_scenario_b_booking_removes_slot() {
        let store = test_store();
        let svc = service(&store, 45).await;
        window(&store, None, "10:00", "11:30").await;
        book(&store, &svc, None, "10:45", BookingStatus::Confirmed).await;

        assert_eq!(times(&store, &svc, None).await, vec!["10:00"]);
    }

    #[tokio::test]
    async fn test_scenario_c_closed_day_has_no_slots() {
        let store = test_store();
        let svc = service(&store, 45).await;
        window(&store, None, "10:00", "11:30").await;
        store
            .upsert_day_status(monday(), DayState::Closed)
            .await
            .unwrap();

        assert!(times(&store, &svc, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_reopened_day_has_slots_again() {
        let store = test_store();
        let svc = service(&store, 45).await;
        window(&store, None, "10:00", "11:30").await;
        store.upsert_day_status(monday(), DayState::Closed).await.unwrap();
        store.upsert_day_status(monday(), DayState::Open).await.unwrap();

        assert_eq!(times(&store, &svc, None).await.len(), 2);
    }

    #[tokio::test]
    async fn test_pending_and_cancelled_bookings_do_not_block() {
        let store = test_store();
        let svc = service(&store, 45).await;
        window(&store, None, "10:00", "11:30").await;
        book(&store, &svc, None, "10:00", BookingStatus::Pending).await;
        book(&store, &svc, None, "10:45", BookingStatus::Cancelled).await;

        assert_eq!(times(&store, &svc, None).await, vec!["10:00", "10:45"]);
    }

    #[tokio::test]
    async fn test_unknown_service_is_not_found() {
        let store = test_store();
        let err = compute_slots(&store, &CalendarPolicy::default(), monday(), "missing", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_no_schedule_for_weekday_is_empty() {
        let store = test_store();
        let svc = service(&store, 45).await;
        window(&store, None, "10:00", "11:30").await;

        let tuesday = NaiveDate::from_ymd_opt(2025, 6, 17).unwrap();
        let slots = compute_slots(&store, &CalendarPolicy::default(), tuesday, &svc.id, None)
            .await
            .unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_bookings_only_block_their_own_staff() {
        let store = test_store();
        let svc = service(&store, 60).await;
        let aarav = staff(&store, "Aarav").await;
        let meera = staff(&store, "Meera").await;
        window(&store, Some(&aarav.id), "10:00", "12:00").await;
        window(&store, Some(&meera.id), "10:00", "12:00").await;
        book(&store, &svc, Some(&aarav.id), "10:00", BookingStatus::Confirmed).await;

        let slots = compute_slots(&store, &CalendarPolicy::default(), monday(), &svc.id, None)
            .await
            .unwrap();
        let shown: Vec<(String, Option<String>)> = slots
            .into_iter()
            .map(|s| (s.time, s.staff_name))
            .collect();
        assert_eq!(
            shown,
            vec![
                ("10:00".to_string(), Some("Meera".to_string())),
                ("11:00".to_string(), Some("Aarav".to_string())),
                ("11:00".to_string(), Some("Meera".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_staff_filter_limits_to_one_staff() {
        let store = test_store();
        let svc = service(&store, 60).await;
        let aarav = staff(&store, "Aarav").await;
        let meera = staff(&store, "Meera").await;
        window(&store, Some(&aarav.id), "10:00", "12:00").await;
        window(&store, Some(&meera.id), "14:00", "15:00").await;
        window(&store, None, "09:00", "10:00").await;

        let slots = compute_slots(
            &store,
            &CalendarPolicy::default(),
            monday(),
            &svc.id,
            Some(&meera.id),
        )
        .await
        .unwrap();
        assert_eq!(
            slots,
            vec![Slot {
                time: "14:00".to_string(),
                staff_id: Some(meera.id.clone()),
                staff_name: Some("Meera".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_unassigned_sorts_before_named_staff() {
        let store = test_store();
        let svc = service(&store, 30).await;
        let kabir = staff(&store, "Kabir").await;
        window(&store, Some(&kabir.id), "10:00", "10:30").await;
        window(&store, None, "10:00", "10:30").await;

        let slots = compute_slots(&store, &CalendarPolicy::default(), monday(), &svc.id, None)
            .await
            .unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].staff_id, None);
        assert_eq!(slots[0].staff_name, None);
        assert_eq!(slots[1].staff_name.as_deref(), Some("Kabir"));
    }

    #[tokio::test]
    async fn test_multiple_windows_per_day() {
        let store = test_store();
        let svc = service(&store, 60).await;
        window(&store, None, "14:00", "16:00").await;
        window(&store, None, "09:00", "10:30").await;

        assert_eq!(times(&store, &svc, None).await, vec!["09:00", "14:00", "15:00"]);
    }

    #[tokio::test]
    async fn test_slots_never_overlap_confirmed_bookings() {
        let store = test_store();
        let svc = service(&store, 40).await;
        window(&store, None, "10:00", "20:00").await;

        let long = service(&store, 90).await;
        book(&store, &long, None, "11:10", BookingStatus::Confirmed).await;
        book(&store, &svc, None, "15:00", BookingStatus::Confirmed).await;

        let busy = [Interval::new(670, 760), Interval::new(900, 940)];
        for time in times(&store, &svc, None).await {
            let start = to_minutes(&time).unwrap();
            let slot = Interval::new(start, start + 40);
            assert!(busy.iter().all(|b| !b.overlaps(&slot)), "{time} overlaps a booking");
        }
    }

    #[tokio::test]
    async fn test_repeated_queries_are_identical() {
        let store = test_store();
        let svc = service(&store, 45).await;
        let riya = staff(&store, "Riya").await;
        window(&store, Some(&riya.id), "10:00", "20:00").await;
        window(&store, None, "12:00", "18:00").await;
        book(&store, &svc, Some(&riya.id), "12:15", BookingStatus::Confirmed).await;

        let policy = CalendarPolicy::default();
        let first = compute_slots(&store, &policy, monday(), &svc.id, None).await.unwrap();
        let second = compute_slots(&store, &policy, monday(), &svc.id, None).await.unwrap();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
