use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{
    Booking, BookingSource, BookingStatus, DayState, DayStatus, NewSchedule, NewService, NewStaff,
    Service, Staff, StaffKey, WeeklySchedule,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Services ──

pub fn get_service(conn: &Connection, id: &str) -> rusqlite::Result<Option<Service>> {
    conn.query_row(
        "SELECT id, name, description, duration_minutes, price, active FROM services WHERE id = ?1",
        params![id],
        parse_service_row,
    )
    .optional()
}

pub fn list_active_services(conn: &Connection) -> rusqlite::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, duration_minutes, price, active
         FROM services WHERE active = 1 ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([], parse_service_row)?;
    rows.collect()
}

pub fn insert_service(conn: &Connection, id: &str, svc: &NewService) -> rusqlite::Result<Service> {
    conn.execute(
        "INSERT INTO services (id, name, description, duration_minutes, price, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            svc.name,
            svc.description,
            svc.duration_minutes,
            svc.price,
            svc.active as i32,
        ],
    )?;
    Ok(Service {
        id: id.to_string(),
        name: svc.name.clone(),
        description: svc.description.clone(),
        duration_minutes: svc.duration_minutes,
        price: svc.price,
        active: svc.active,
    })
}

fn parse_service_row(row: &Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        duration_minutes: row.get(3)?,
        price: row.get(4)?,
        active: row.get::<_, i32>(5)? != 0,
    })
}

// ── Staff ──

pub fn get_staff(conn: &Connection, id: &str) -> rusqlite::Result<Option<Staff>> {
    conn.query_row(
        "SELECT id, name, specialties FROM staff WHERE id = ?1",
        params![id],
        parse_staff_row,
    )
    .optional()
}

pub fn list_staff(conn: &Connection) -> rusqlite::Result<Vec<Staff>> {
    let mut stmt = conn.prepare("SELECT id, name, specialties FROM staff ORDER BY name ASC")?;
    let rows = stmt.query_map([], parse_staff_row)?;
    rows.collect()
}

pub fn insert_staff(conn: &Connection, id: &str, staff: &NewStaff) -> rusqlite::Result<Staff> {
    let specialties = serde_json::to_string(&staff.specialties)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    conn.execute(
        "INSERT INTO staff (id, name, specialties) VALUES (?1, ?2, ?3)",
        params![id, staff.name, specialties],
    )?;
    Ok(Staff {
        id: id.to_string(),
        name: staff.name.clone(),
        specialties: staff.specialties.clone(),
    })
}

fn parse_staff_row(row: &Row) -> rusqlite::Result<Staff> {
    let specialties_json: String = row.get(2)?;
    let specialties = serde_json::from_str(&specialties_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(Staff {
        id: row.get(0)?,
        name: row.get(1)?,
        specialties,
    })
}

// ── Schedules ──

pub fn get_schedules(
    conn: &Connection,
    day_of_week: u8,
    staff_id: Option<&str>,
) -> rusqlite::Result<Vec<WeeklySchedule>> {
    let mut stmt = match staff_id {
        Some(_) => conn.prepare(
            "SELECT id, staff_id, day_of_week, open_time, close_time FROM schedules
             WHERE day_of_week = ?1 AND staff_id = ?2 ORDER BY open_time ASC",
        )?,
        None => conn.prepare(
            "SELECT id, staff_id, day_of_week, open_time, close_time FROM schedules
             WHERE day_of_week = ?1 ORDER BY open_time ASC",
        )?,
    };
    let rows = match staff_id {
        Some(staff_id) => stmt.query_map(params![day_of_week, staff_id], parse_schedule_row)?,
        None => stmt.query_map(params![day_of_week], parse_schedule_row)?,
    };
    rows.collect()
}

pub fn insert_schedule(
    conn: &Connection,
    id: &str,
    schedule: &NewSchedule,
) -> rusqlite::Result<WeeklySchedule> {
    conn.execute(
        "INSERT INTO schedules (id, staff_id, day_of_week, open_time, close_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            schedule.staff_id,
            schedule.day_of_week,
            schedule.open_time,
            schedule.close_time,
        ],
    )?;
    Ok(WeeklySchedule {
        id: id.to_string(),
        staff_id: schedule.staff_id.clone(),
        day_of_week: schedule.day_of_week,
        open_time: schedule.open_time.clone(),
        close_time: schedule.close_time.clone(),
    })
}

fn parse_schedule_row(row: &Row) -> rusqlite::Result<WeeklySchedule> {
    Ok(WeeklySchedule {
        id: row.get(0)?,
        staff_id: row.get(1)?,
        day_of_week: row.get(2)?,
        open_time: row.get(3)?,
        close_time: row.get(4)?,
    })
}

// ── Day Status ──

pub fn get_day_status(conn: &Connection, date: NaiveDate) -> rusqlite::Result<Option<DayStatus>> {
    let date_str = date.format(DATE_FORMAT).to_string();
    let status = conn
        .query_row(
            "SELECT status FROM day_status WHERE date = ?1",
            params![date_str],
            |row| {
                let raw: String = row.get(0)?;
                DayState::parse(&raw).ok_or_else(|| invalid_text(0, "day status", &raw))
            },
        )
        .optional()?;
    Ok(status.map(|status| DayStatus { date, status }))
}

pub fn upsert_day_status(
    conn: &Connection,
    date: NaiveDate,
    status: DayState,
) -> rusqlite::Result<DayStatus> {
    conn.execute(
        "INSERT INTO day_status (date, status) VALUES (?1, ?2)
         ON CONFLICT(date) DO UPDATE SET status = excluded.status, updated_at = datetime('now')",
        params![date.format(DATE_FORMAT).to_string(), status.as_str()],
    )?;
    Ok(DayStatus { date, status })
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "b.id, b.service_id, b.staff_id, b.customer_name, b.customer_email, \
     b.customer_phone, b.date, b.time, b.duration_minutes, b.status, b.source, b.created_at, b.updated_at";

pub fn create_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, service_id, staff_id, customer_name, customer_email, customer_phone,
                               date, time, duration_minutes, status, source, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            booking.id,
            booking.service_id,
            booking.staff_id,
            booking.customer_name,
            booking.customer_email,
            booking.customer_phone,
            booking.date.format(DATE_FORMAT).to_string(),
            booking.time,
            booking.duration_minutes,
            booking.status.as_str(),
            booking.source.as_str(),
            booking.created_at.format(TIMESTAMP_FORMAT).to_string(),
            booking.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

/// Confirmed bookings on `date`. `staff` narrows to one pool; `None` returns every pool.
pub fn get_confirmed_bookings(
    conn: &Connection,
    date: NaiveDate,
    staff: Option<&StaffKey>,
) -> rusqlite::Result<Vec<Booking>> {
    let date_str = date.format(DATE_FORMAT).to_string();
    match staff {
        Some(key) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings b
                 WHERE b.date = ?1 AND b.status = 'confirmed' AND b.staff_id IS ?2
                 ORDER BY b.time ASC"
            ))?;
            let rows = stmt.query_map(params![date_str, key.staff_id()], parse_booking_row)?;
            rows.collect()
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings b
                 WHERE b.date = ?1 AND b.status = 'confirmed'
                 ORDER BY b.time ASC"
            ))?;
            let rows = stmt.query_map(params![date_str], parse_booking_row)?;
            rows.collect()
        }
    }
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<Booking>> {
    conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.id = ?1"),
        params![id],
        parse_booking_row,
    )
    .optional()
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> rusqlite::Result<bool> {
    let now = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

/// A booking with its service and staff resolved for display.
#[derive(Debug, Clone)]
pub struct BookingDetails {
    pub booking: Booking,
    pub service_name: Option<String>,
    pub staff_name: Option<String>,
}

const DETAILS_FROM: &str = "FROM bookings b
     LEFT JOIN services s ON s.id = b.service_id
     LEFT JOIN staff st ON st.id = b.staff_id";

pub fn get_all_bookings(
    conn: &Connection,
    status_filter: Option<BookingStatus>,
    limit: i64,
) -> rusqlite::Result<Vec<BookingDetails>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS}, s.name, st.name {DETAILS_FROM}
         WHERE ?1 IS NULL OR b.status = ?1
         ORDER BY b.date DESC, b.time DESC LIMIT ?2"
    ))?;
    let rows = stmt.query_map(
        params![status_filter.map(|s| s.as_str()), limit],
        parse_details_row,
    )?;
    rows.collect()
}

pub fn get_booking_details(conn: &Connection, id: &str) -> rusqlite::Result<Option<BookingDetails>> {
    conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS}, s.name, st.name {DETAILS_FROM} WHERE b.id = ?1"),
        params![id],
        parse_details_row,
    )
    .optional()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingStats {
    pub total_bookings: i64,
    pub today_bookings: i64,
    pub pending_bookings: i64,
    pub total_revenue: i64,
}

pub fn get_booking_stats(conn: &Connection, today: NaiveDate) -> rusqlite::Result<BookingStats> {
    conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(CASE WHEN b.date = ?1 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN b.status = 'pending' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN b.status != 'cancelled' THEN COALESCE(s.price, 0) ELSE 0 END), 0)
         FROM bookings b LEFT JOIN services s ON s.id = b.service_id",
        params![today.format(DATE_FORMAT).to_string()],
        |row| {
            Ok(BookingStats {
                total_bookings: row.get(0)?,
                today_bookings: row.get(1)?,
                pending_bookings: row.get(2)?,
                total_revenue: row.get(3)?,
            })
        },
    )
}

fn parse_booking_row(row: &Row) -> rusqlite::Result<Booking> {
    let date_str: String = row.get(6)?;
    let status_str: String = row.get(9)?;
    let source_str: String = row.get(10)?;
    let created_at_str: String = row.get(11)?;
    let updated_at_str: String = row.get(12)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e)))?;
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(12, Type::Text, Box::new(e)))?;

    Ok(Booking {
        id: row.get(0)?,
        service_id: row.get(1)?,
        staff_id: row.get(2)?,
        customer_name: row.get(3)?,
        customer_email: row.get(4)?,
        customer_phone: row.get(5)?,
        date,
        time: row.get(7)?,
        duration_minutes: row.get(8)?,
        status: BookingStatus::parse(&status_str)
            .ok_or_else(|| invalid_text(9, "booking status", &status_str))?,
        source: BookingSource::parse(&source_str)
            .ok_or_else(|| invalid_text(10, "booking source", &source_str))?,
        created_at,
        updated_at,
    })
}

fn parse_details_row(row: &Row) -> rusqlite::Result<BookingDetails> {
    Ok(BookingDetails {
        booking: parse_booking_row(row)?,
        service_name: row.get(13)?,
        staff_name: row.get(14)?,
    })
}

fn invalid_text(idx: usize, what: &str, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("invalid {what}: {raw}").into(),
    )
}

// ── Seeding ──

pub fn clear_catalog(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "DELETE FROM schedules;
         DELETE FROM staff WHERE id NOT IN (SELECT staff_id FROM bookings WHERE staff_id IS NOT NULL);
         DELETE FROM services WHERE id NOT IN (SELECT service_id FROM bookings);",
    )
}
