use crate::errors::AppError;
use crate::models::{NewSchedule, NewService, NewStaff, Service, Staff, WeeklySchedule};
use crate::services::interval::{parse_time_input, to_time_of_day};
use crate::store::RecordStore;

pub async fn create_service(store: &dyn RecordStore, svc: NewService) -> Result<Service, AppError> {
    svc.validate().map_err(AppError::Validation)?;
    let created = store.insert_service(svc).await?;
    tracing::info!(service_id = %created.id, name = %created.name, "service created");
    Ok(created)
}

pub async fn create_staff(store: &dyn RecordStore, staff: NewStaff) -> Result<Staff, AppError> {
    if staff.name.trim().is_empty() {
        return Err(AppError::Validation("stylist name is required".to_string()));
    }
    let created = store.insert_staff(staff).await?;
    tracing::info!(staff_id = %created.id, name = %created.name, "stylist created");
    Ok(created)
}

pub async fn create_schedule(
    store: &dyn RecordStore,
    mut schedule: NewSchedule,
) -> Result<WeeklySchedule, AppError> {
    if schedule.day_of_week > 6 {
        return Err(AppError::Validation(
            "dayOfWeek must be between 0 and 6".to_string(),
        ));
    }

    let open = parse_time_input(&schedule.open_time)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let close = parse_time_input(&schedule.close_time)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if open >= close {
        return Err(AppError::Validation(
            "openTime must be before closeTime".to_string(),
        ));
    }
    schedule.open_time = to_time_of_day(open)?;
    schedule.close_time = to_time_of_day(close)?;

    if let Some(id) = schedule.staff_id.as_deref() {
        if store.find_staff(id).await?.is_none() {
            return Err(AppError::NotFound("Stylist not found".to_string()));
        }
    }

    Ok(store.insert_schedule(schedule).await?)
}
