pub mod booking;
pub mod day_status;
pub mod schedule;
pub mod service;
pub mod slot;
pub mod staff;

pub use booking::{Booking, BookingDraft, BookingSource, BookingStatus};
pub use day_status::{DayState, DayStatus};
pub use schedule::{NewSchedule, WeeklySchedule};
pub use service::{NewService, Service};
pub use slot::Slot;
pub use staff::{NewStaff, Staff, StaffKey};
