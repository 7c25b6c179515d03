//! Record store boundary. The engine only talks to [`RecordStore`]; the
//! SQLite implementation runs every call on the blocking pool under a
//! deadline so a stuck database fails the request instead of hanging it.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, ErrorCode};

use crate::db::{self, queries};
use crate::db::queries::{BookingDetails, BookingStats};
use crate::models::{
    Booking, BookingDraft, BookingStatus, DayState, DayStatus, NewSchedule, NewService, NewStaff,
    Service, Staff, StaffKey, WeeklySchedule,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error during {op}: {source}")]
    Database {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("uniqueness constraint violated during {op}")]
    UniqueViolation { op: &'static str },

    #[error("store call {0} timed out")]
    Timeout(&'static str),

    #[error("store worker failed: {0}")]
    Worker(String),

    #[error("database connection lock poisoned")]
    Poisoned,
}

impl StoreError {
    fn from_sqlite(op: &'static str, source: rusqlite::Error) -> Self {
        match &source {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::UniqueViolation { op }
            }
            _ => StoreError::Database { op, source },
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_service(&self, id: &str) -> Result<Option<Service>, StoreError>;
    async fn list_services(&self) -> Result<Vec<Service>, StoreError>;
    async fn insert_service(&self, service: NewService) -> Result<Service, StoreError>;

    async fn find_staff(&self, id: &str) -> Result<Option<Staff>, StoreError>;
    async fn list_staff(&self) -> Result<Vec<Staff>, StoreError>;
    async fn insert_staff(&self, staff: NewStaff) -> Result<Staff, StoreError>;

    async fn find_schedules(
        &self,
        day_of_week: u8,
        staff_id: Option<&str>,
    ) -> Result<Vec<WeeklySchedule>, StoreError>;
    async fn insert_schedule(&self, schedule: NewSchedule) -> Result<WeeklySchedule, StoreError>;

    async fn find_day_status(&self, date: NaiveDate) -> Result<Option<DayStatus>, StoreError>;
    async fn upsert_day_status(
        &self,
        date: NaiveDate,
        status: DayState,
    ) -> Result<DayStatus, StoreError>;

    async fn find_confirmed_bookings(
        &self,
        date: NaiveDate,
        staff: Option<&StaffKey>,
    ) -> Result<Vec<Booking>, StoreError>;
    /// Must reject a second confirmed booking for the same (date, time, staff key)
    /// with [`StoreError::UniqueViolation`], across every writer sharing the store.
    async fn insert_booking(&self, draft: BookingDraft) -> Result<Booking, StoreError>;
    async fn find_booking(&self, id: &str) -> Result<Option<Booking>, StoreError>;
    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StoreError>;

    async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
        limit: i64,
    ) -> Result<Vec<BookingDetails>, StoreError>;
    async fn find_booking_details(&self, id: &str) -> Result<Option<BookingDetails>, StoreError>;
    async fn booking_stats(&self, today: NaiveDate) -> Result<BookingStats, StoreError>;
}

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    timeout: Duration,
}

impl SqliteStore {
    pub fn new(conn: Connection, timeout: Duration) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            timeout,
        }
    }

    pub fn open(path: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self::new(db::init_db(path)?, timeout))
    }

    /// Runs `f` on the blocking pool. If the deadline passes before the
    /// worker gets the connection, the call is abandoned and `f` never runs.
    /// Once `f` has started, its outcome is awaited and reported as-is so a
    /// committed write is never reported as a failure.
    async fn call<T, F>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let state = Arc::new(AtomicU8::new(CALL_PENDING));
        let worker_state = Arc::clone(&state);
        let mut task = tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            if worker_state
                .compare_exchange(CALL_PENDING, CALL_RUNNING, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return Err(StoreError::Timeout(op));
            }
            f(&guard).map_err(|e| StoreError::from_sqlite(op, e))
        });

        let joined = match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                if state
                    .compare_exchange(CALL_PENDING, CALL_ABANDONED, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    tracing::warn!(op, "store call abandoned before it started");
                    return Err(StoreError::Timeout(op));
                }
                task.await
            }
        };

        joined.unwrap_or_else(|join_err| Err(StoreError::Worker(join_err.to_string())))
    }
}

const CALL_PENDING: u8 = 0;
const CALL_RUNNING: u8 = 1;
const CALL_ABANDONED: u8 = 2;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn find_service(&self, id: &str) -> Result<Option<Service>, StoreError> {
        let id = id.to_string();
        self.call("find_service", move |conn| queries::get_service(conn, &id))
            .await
    }

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        self.call("list_services", queries::list_active_services).await
    }

    async fn insert_service(&self, service: NewService) -> Result<Service, StoreError> {
        self.call("insert_service", move |conn| {
            queries::insert_service(conn, &new_id(), &service)
        })
        .await
    }

    async fn find_staff(&self, id: &str) -> Result<Option<Staff>, StoreError> {
        let id = id.to_string();
        self.call("find_staff", move |conn| queries::get_staff(conn, &id))
            .await
    }

    async fn list_staff(&self) -> Result<Vec<Staff>, StoreError> {
        self.call("list_staff", queries::list_staff).await
    }

    async fn insert_staff(&self, staff: NewStaff) -> Result<Staff, StoreError> {
        self.call("insert_staff", move |conn| {
            queries::insert_staff(conn, &new_id(), &staff)
        })
        .await
    }

    async fn find_schedules(
        &self,
        day_of_week: u8,
        staff_id: Option<&str>,
    ) -> Result<Vec<WeeklySchedule>, StoreError> {
        let staff_id = staff_id.map(str::to_string);
        self.call("find_schedules", move |conn| {
            queries::get_schedules(conn, day_of_week, staff_id.as_deref())
        })
        .await
    }

    async fn insert_schedule(&self, schedule: NewSchedule) -> Result<WeeklySchedule, StoreError> {
        self.call("insert_schedule", move |conn| {
            queries::insert_schedule(conn, &new_id(), &schedule)
        })
        .await
    }

    async fn find_day_status(&self, date: NaiveDate) -> Result<Option<DayStatus>, StoreError> {
        self.call("find_day_status", move |conn| {
            queries::get_day_status(conn, date)
        })
        .await
    }

    async fn upsert_day_status(
        &self,
        date: NaiveDate,
        status: DayState,
    ) -> Result<DayStatus, StoreError> {
        self.call("upsert_day_status", move |conn| {
            queries::upsert_day_status(conn, date, status)
        })
        .await
    }

    async fn find_confirmed_bookings(
        &self,
        date: NaiveDate,
        staff: Option<&StaffKey>,
    ) -> Result<Vec<Booking>, StoreError> {
        let staff = staff.cloned();
        self.call("find_confirmed_bookings", move |conn| {
            queries::get_confirmed_bookings(conn, date, staff.as_ref())
        })
        .await
    }

    async fn insert_booking(&self, draft: BookingDraft) -> Result<Booking, StoreError> {
        let now = Utc::now().naive_utc();
        let booking = Booking {
            id: new_id(),
            service_id: draft.service_id,
            staff_id: draft.staff_id,
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            customer_phone: draft.customer_phone,
            date: draft.date,
            time: draft.time,
            duration_minutes: draft.duration_minutes,
            status: draft.status,
            source: draft.source,
            created_at: now,
            updated_at: now,
        };
        self.call("insert_booking", move |conn| {
            queries::create_booking(conn, &booking)?;
            Ok(booking)
        })
        .await
    }

    async fn find_booking(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        let id = id.to_string();
        self.call("find_booking", move |conn| {
            queries::get_booking_by_id(conn, &id)
        })
        .await
    }

    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StoreError> {
        let id = id.to_string();
        self.call("update_booking_status", move |conn| {
            if !queries::update_booking_status(conn, &id, status)? {
                return Ok(None);
            }
            queries::get_booking_by_id(conn, &id)
        })
        .await
    }

    async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
        limit: i64,
    ) -> Result<Vec<BookingDetails>, StoreError> {
        self.call("list_bookings", move |conn| {
            queries::get_all_bookings(conn, status, limit)
        })
        .await
    }

    async fn find_booking_details(&self, id: &str) -> Result<Option<BookingDetails>, StoreError> {
        let id = id.to_string();
        self.call("find_booking_details", move |conn| {
            queries::get_booking_details(conn, &id)
        })
        .await
    }

    async fn booking_stats(&self, today: NaiveDate) -> Result<BookingStats, StoreError> {
        self.call("booking_stats", move |conn| {
            queries::get_booking_stats(conn, today)
        })
        .await
    }
}
