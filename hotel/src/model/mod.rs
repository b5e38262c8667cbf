//! Persisted hotel records.
//!
//! Each record implements [`hotel_orm::Entity`]; enumerations implement
//! [`hotel_orm::Enumerated`] and are stored by lowercase name.

mod booking;
mod customer;
mod room;
mod service;

pub use booking::{Booking, BookingStatus};
pub use customer::{Customer, Gender};
pub use room::{Room, RoomType};
pub use service::{BookingService, Service};
