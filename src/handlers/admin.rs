use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries::BookingDetails;
use crate::errors::AppError;
use crate::models::{
    Booking, BookingStatus, DayState, NewSchedule, NewService, NewStaff, Service, Staff,
    WeeklySchedule,
};
use crate::services::booking::{self as reservations, parse_date};
use crate::services::{catalog, days};
use crate::state::AppState;

const DEFAULT_BOOKINGS_LIMIT: i64 = 1000;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        tracing::warn!("rejected admin request with bad credentials");
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    #[serde(flatten)]
    booking: Booking,
    service_name: Option<String>,
    staff_name: Option<String>,
}

impl From<BookingDetails> for BookingResponse {
    fn from(details: BookingDetails) -> Self {
        Self {
            booking: details.booking,
            service_name: details.service_name,
            staff_name: details.staff_name,
        }
    }
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            BookingStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("invalid status filter: {raw}")))?,
        ),
        None => None,
    };
    let limit = query.limit.unwrap_or(DEFAULT_BOOKINGS_LIMIT).max(1);

    let bookings = state.store.list_bookings(status, limit).await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

// GET /api/admin/stats
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    total_bookings: i64,
    today_bookings: i64,
    pending_bookings: i64,
    total_revenue: i64,
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let stats = state.store.booking_stats(state.calendar.today()).await?;
    Ok(Json(StatsResponse {
        total_bookings: stats.total_bookings,
        today_bookings: stats.today_bookings,
        pending_bookings: stats.pending_bookings,
        total_revenue: stats.total_revenue,
    }))
}

// GET /api/admin/shop-status/:date
#[derive(Serialize)]
pub struct ShopStatusResponse {
    success: bool,
    date: String,
    status: DayState,
}

pub async fn get_shop_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(date): Path<String>,
) -> Result<Json<ShopStatusResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let day = days::day_status(state.store.as_ref(), parse_date(&date)?).await?;
    Ok(Json(ShopStatusResponse {
        success: true,
        date,
        status: day.status,
    }))
}

// POST /api/admin/shop-status/:date
#[derive(Deserialize)]
pub struct ShopStatusRequest {
    #[serde(default)]
    pub status: String,
}

pub async fn set_shop_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(date): Path<String>,
    Json(body): Json<ShopStatusRequest>,
) -> Result<Json<ShopStatusResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let day = days::set_day_status(state.store.as_ref(), parse_date(&date)?, &body.status).await?;
    Ok(Json(ShopStatusResponse {
        success: true,
        date,
        status: day.status,
    }))
}

// POST /api/admin/bookings/:id/cancel
// POST /api/admin/bookings/:id/confirm
#[derive(Serialize)]
pub struct TransitionResponse {
    success: bool,
    booking: Booking,
    message: String,
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<TransitionResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let booking = reservations::cancel(state.store.as_ref(), &id).await?;
    let message = format!(
        "Booking cancelled for {} on {} at {}",
        booking.customer_name, booking.date, booking.time
    );
    Ok(Json(TransitionResponse {
        success: true,
        booking,
        message,
    }))
}

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<TransitionResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let booking = reservations::confirm(state.store.as_ref(), &id).await?;
    let message = format!(
        "Booking confirmed for {} on {} at {}",
        booking.customer_name, booking.date, booking.time
    );
    Ok(Json(TransitionResponse {
        success: true,
        booking,
        message,
    }))
}

// GET /api/admin/bookings/:id/contact
#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactLinks {
    phone: String,
    email: String,
    whatsapp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    service: String,
    date: String,
    time: String,
    stylist: String,
    status: BookingStatus,
    contact_links: ContactLinks,
}

fn contact_links(booking: &Booking) -> ContactLinks {
    let digits: String = booking
        .customer_phone
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    ContactLinks {
        phone: format!("tel:{}", booking.customer_phone),
        email: format!("mailto:{}", booking.customer_email),
        whatsapp: format!(
            "https://wa.me/{digits}?text=Hi%20{}%2C%20regarding%20your%20booking%20on%20{}%20at%20{}",
            urlencoding::encode(&booking.customer_name),
            booking.date,
            urlencoding::encode(&booking.time),
        ),
    }
}

pub async fn get_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ContactResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let details = state
        .store
        .find_booking_details(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    let booking = details.booking;

    Ok(Json(ContactResponse {
        contact_links: contact_links(&booking),
        customer_name: booking.customer_name,
        customer_email: booking.customer_email,
        customer_phone: booking.customer_phone,
        service: details.service_name.unwrap_or_else(|| "N/A".to_string()),
        date: booking.date.to_string(),
        time: booking.time,
        stylist: details.staff_name.unwrap_or_else(|| "Any".to_string()),
        status: booking.status,
    }))
}

// POST /api/admin/services
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewService>,
) -> Result<Json<Service>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    Ok(Json(catalog::create_service(state.store.as_ref(), body).await?))
}

// POST /api/admin/stylists
pub async fn create_stylist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewStaff>,
) -> Result<Json<Staff>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    Ok(Json(catalog::create_staff(state.store.as_ref(), body).await?))
}

// POST /api/admin/schedules
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewSchedule>,
) -> Result<Json<WeeklySchedule>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    Ok(Json(catalog::create_schedule(state.store.as_ref(), body).await?))
}
