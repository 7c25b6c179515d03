use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{DayState, DayStatus};
use crate::store::RecordStore;

pub async fn day_status(store: &dyn RecordStore, date: NaiveDate) -> Result<DayStatus, AppError> {
    Ok(DayStatus::resolve(date, store.find_day_status(date).await?))
}

pub async fn set_day_status(
    store: &dyn RecordStore,
    date: NaiveDate,
    status: &str,
) -> Result<DayStatus, AppError> {
    let status = DayState::parse(status).ok_or_else(|| {
        AppError::Validation(r#"Invalid status. Must be "open" or "closed""#.to_string())
    })?;

    let updated = store.upsert_day_status(date, status).await?;
    tracing::info!(%date, status = status.as_str(), "day status updated");
    Ok(updated)
}
