//! Domain managers built on the [`Gateway`].
//!
//! Managers never touch statement text generation or row mapping directly;
//! they call the gateway's generic operations and its predicate `query`.
//! Multi-step workflows follow one shape:
//!
//! ```text
//! gateway.begin_transaction()
//! let result = <steps>;
//! finish(gateway, result)   // commit on Ok, roll back on Err, re-raise
//! ```

mod booking_manager;
mod booking_service_manager;
mod customer_manager;
mod room_manager;

pub use booking_manager::BookingManager;
pub(crate) use booking_manager::{insert_booking, validate_booking};
pub use booking_service_manager::BookingServiceManager;
pub use customer_manager::CustomerManager;
pub use room_manager::RoomManager;
pub(crate) use room_manager::check_new_room;

use hotel_orm::Gateway;

use crate::error::Result;
use crate::model::Booking;

pub(crate) const BOOKINGS_BY_CUSTOMER: &str =
    "SELECT * FROM booking WHERE customer_id = ? ORDER BY id";
pub(crate) const BOOKINGS_BY_ROOM: &str = "SELECT * FROM booking WHERE room_id = ? ORDER BY id";

/// Close the open transaction according to `result`.
///
/// The workflow's own error is returned even if the rollback also fails.
pub(crate) async fn finish<T>(gateway: &Gateway, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            if let Err(err) = gateway.commit().await {
                if let Err(rollback_err) = gateway.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback after failed commit failed");
                }
                return Err(err.into());
            }
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = gateway.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            tracing::warn!(error = %err, "transaction rolled back");
            Err(err)
        }
    }
}

/// Delete each booking individually. Used by the customer and room cascades.
pub(crate) async fn delete_bookings(gateway: &Gateway, bookings: &[Booking]) -> Result<usize> {
    let mut deleted = 0;
    for id in bookings.iter().filter_map(|b| b.id) {
        gateway.delete::<Booking>(id).await?;
        deleted += 1;
    }
    Ok(deleted)
}
