use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::calendar::CalendarPolicy;
use crate::store::RecordStore;

pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: AppConfig,
    pub calendar: CalendarPolicy,
}
