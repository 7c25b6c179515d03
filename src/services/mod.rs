pub mod availability;
pub mod booking;
pub mod calendar;
pub mod catalog;
pub mod days;
pub mod interval;
