use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{DayStatus, Service, Slot, Staff};
use crate::services::availability::compute_slots;
use crate::services::booking::{self as reservations, parse_date, ReservationRequest};
use crate::services::days;
use crate::state::AppState;

// GET /api/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(state.store.list_services().await?))
}

// GET /api/stylists
pub async fn list_stylists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Staff>>, AppError> {
    Ok(Json(state.store.list_staff().await?))
}

// GET /api/availability
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: Option<String>,
    pub service_id: Option<String>,
    #[serde(alias = "stylistId")]
    pub staff_id: Option<String>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    slots: Vec<Slot>,
}

pub async fn availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let (Some(date), Some(service_id)) = (
        query.date.as_deref().filter(|v| !v.is_empty()),
        query.service_id.as_deref().filter(|v| !v.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "date and serviceId are required".to_string(),
        ));
    };
    let date = parse_date(date)?;
    let staff_id = query.staff_id.as_deref().filter(|v| !v.is_empty());

    let slots = compute_slots(
        state.store.as_ref(),
        &state.calendar,
        date,
        service_id,
        staff_id,
    )
    .await?;

    Ok(Json(SlotsResponse { slots }))
}

// POST /api/book
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    success: bool,
    booking_id: String,
}

pub async fn book(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReservationRequest>,
) -> Result<Json<BookResponse>, AppError> {
    let booking = reservations::reserve(state.store.as_ref(), body).await?;
    Ok(Json(BookResponse {
        success: true,
        booking_id: booking.id,
    }))
}

// GET /api/days/:date
pub async fn get_day(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<DayStatus>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(days::day_status(state.store.as_ref(), date).await?))
}
