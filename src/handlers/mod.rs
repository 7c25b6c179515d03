pub mod admin;
pub mod booking;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/services", get(booking::list_services))
        .route("/api/stylists", get(booking::list_stylists))
        .route("/api/availability", get(booking::availability))
        .route("/api/book", post(booking::book))
        .route("/api/days/:date", get(booking::get_day))
        .route("/api/admin/bookings", get(admin::get_bookings))
        .route(
            "/api/admin/bookings/:id/cancel",
            post(admin::cancel_booking),
        )
        .route(
            "/api/admin/bookings/:id/confirm",
            post(admin::confirm_booking),
        )
        .route(
            "/api/admin/bookings/:id/contact",
            get(admin::get_contact),
        )
        .route("/api/admin/stats", get(admin::get_stats))
        .route(
            "/api/admin/shop-status/:date",
            get(admin::get_shop_status).post(admin::set_shop_status),
        )
        .route("/api/admin/services", post(admin::create_service))
        .route("/api/admin/stylists", post(admin::create_stylist))
        .route("/api/admin/schedules", post(admin::create_schedule))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
