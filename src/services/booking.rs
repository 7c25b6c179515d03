//! Reservation and status transitions. The read-side checks here reject any
//! overlap within a staff pool; the store's uniqueness guarantee is what
//! prevents two racing writers from confirming the same (date, time, staff) key.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::queries::DATE_FORMAT;
use crate::errors::AppError;
use crate::models::{Booking, BookingDraft, BookingSource, BookingStatus, DayStatus, StaffKey};
use crate::services::interval::{parse_time_input, to_minutes, to_time_of_day, Interval};
use crate::store::{RecordStore, StoreError};

const SLOT_TAKEN: &str = "Selected time is no longer available";
const DAY_CLOSED: &str = "Salon is closed for selected date";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub service_id: Option<String>,
    #[serde(alias = "stylistId")]
    pub staff_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub source: Option<String>,
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("invalid date: {raw} (expected YYYY-MM-DD)")))
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub async fn reserve(store: &dyn RecordStore, req: ReservationRequest) -> Result<Booking, AppError> {
    let (Some(service_id), Some(customer_name), Some(customer_email), Some(date), Some(time)) = (
        non_empty(&req.service_id),
        non_empty(&req.customer_name),
        non_empty(&req.customer_email),
        non_empty(&req.date),
        non_empty(&req.time),
    ) else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };

    let date = parse_date(date)?;
    let start = parse_time_input(time)
        .map_err(|_| AppError::Validation(format!("invalid time: {time} (expected HH:MM)")))?;
    let time = to_time_of_day(start)?;
    let source = match non_empty(&req.source) {
        Some(raw) => BookingSource::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("invalid source: {raw}")))?,
        None => BookingSource::default(),
    };
    let staff_id = non_empty(&req.staff_id).map(str::to_string);

    let service = store
        .find_service(service_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

    if let Some(id) = staff_id.as_deref() {
        if store.find_staff(id).await?.is_none() {
            return Err(AppError::NotFound("Stylist not found".to_string()));
        }
    }

    let day = DayStatus::resolve(date, store.find_day_status(date).await?);
    if day.is_closed() {
        return Err(AppError::Conflict(DAY_CLOSED.to_string()));
    }

    let key = StaffKey::from_option(staff_id.as_deref());
    let span = Interval::new(start, start + service.duration_minutes);
    ensure_pool_free(store, date, &key, span, None).await?;

    let draft = BookingDraft {
        service_id: service.id,
        staff_id,
        customer_name: customer_name.to_string(),
        customer_email: customer_email.to_string(),
        customer_phone: non_empty(&req.customer_phone).unwrap_or_default().to_string(),
        date,
        time,
        duration_minutes: service.duration_minutes,
        status: BookingStatus::Confirmed,
        source,
    };

    let booking = store.insert_booking(draft).await.map_err(|e| match e {
        StoreError::UniqueViolation { .. } => AppError::Conflict(SLOT_TAKEN.to_string()),
        other => AppError::Store(other),
    })?;

    tracing::info!(
        booking_id = %booking.id,
        date = %booking.date,
        time = %booking.time,
        source = booking.source.as_str(),
        "booking created"
    );
    Ok(booking)
}

/// Only the same staff pool conflicts: an unassigned booking never collides
/// with a staff-specific one.
async fn ensure_pool_free(
    store: &dyn RecordStore,
    date: NaiveDate,
    key: &StaffKey,
    span: Interval,
    exclude: Option<&str>,
) -> Result<(), AppError> {
    let same_pool = store.find_confirmed_bookings(date, Some(key)).await?;
    for booking in same_pool.iter().filter(|b| Some(b.id.as_str()) != exclude) {
        let taken_start = to_minutes(&booking.time)?;
        let taken = Interval::new(taken_start, taken_start + booking.duration_minutes);
        if taken.start == span.start || taken.overlaps(&span) {
            return Err(AppError::Conflict(SLOT_TAKEN.to_string()));
        }
    }
    Ok(())
}

async fn load(store: &dyn RecordStore, id: &str) -> Result<Booking, AppError> {
    store
        .find_booking(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

pub async fn cancel(store: &dyn RecordStore, id: &str) -> Result<Booking, AppError> {
    let booking = load(store, id).await?;
    if booking.status == BookingStatus::Cancelled {
        return Ok(booking);
    }

    let updated = store
        .update_booking_status(id, BookingStatus::Cancelled)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    tracing::info!(booking_id = %id, "booking cancelled");
    Ok(updated)
}

pub async fn confirm(store: &dyn RecordStore, id: &str) -> Result<Booking, AppError> {
    let booking = load(store, id).await?;
    match booking.status {
        BookingStatus::Confirmed => return Ok(booking),
        BookingStatus::Cancelled => {
            return Err(AppError::Conflict(
                "Cancelled booking cannot be confirmed".to_string(),
            ))
        }
        BookingStatus::Pending => {}
    }

    let day = DayStatus::resolve(booking.date, store.find_day_status(booking.date).await?);
    if day.is_closed() {
        return Err(AppError::Conflict(DAY_CLOSED.to_string()));
    }

    let start = to_minutes(&booking.time)?;
    let span = Interval::new(start, start + booking.duration_minutes);
    ensure_pool_free(store, booking.date, &booking.staff_key(), span, Some(&booking.id)).await?;

    let updated = store
        .update_booking_status(id, BookingStatus::Confirmed)
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation { .. } => AppError::Conflict(SLOT_TAKEN.to_string()),
            other => AppError::Store(other),
        })?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    tracing::info!(booking_id = %id, "booking confirmed");
    Ok(updated)
}
