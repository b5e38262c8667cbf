//! Booking lifecycle: create, cancel, status changes and lookups.
//!
//! Every booking write that also touches the room runs inside one
//! transaction so the room's availability always agrees with its bookings.

use std::sync::Arc;

use chrono::NaiveDate;
use hotel_orm::{Enumerated, Gateway};

use super::{finish, BOOKINGS_BY_CUSTOMER, BOOKINGS_BY_ROOM};
use crate::error::{InvariantViolation, Result};
use crate::model::{Booking, BookingStatus, Customer, Room};

pub struct BookingManager {
    gateway: Arc<Gateway>,
}

impl BookingManager {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Book `room_id` for `customer_id` and mark the room unavailable.
    ///
    /// The booking is stored as [`BookingStatus::Active`]. On any failure
    /// neither the booking nor the room change is persisted.
    pub async fn create_booking(
        &self,
        customer_id: i64,
        room_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
        total_amount: f32,
    ) -> Result<Booking> {
        validate_booking(check_in, check_out, total_amount)?;

        self.gateway.begin_transaction().await?;
        let booking = Booking::new(customer_id, room_id, check_in, check_out, total_amount);
        let result = insert_booking(&self.gateway, booking).await;
        finish(&self.gateway, result).await
    }

    pub async fn get_booking(&self, id: i64) -> Result<Option<Booking>> {
        Ok(self.gateway.find(id).await?)
    }

    /// Release the room (if it still exists) and delete the booking.
    pub async fn cancel_booking(&self, booking_id: i64) -> Result<()> {
        self.gateway.begin_transaction().await?;
        let result = self.release_and_delete(booking_id).await;
        finish(&self.gateway, result).await
    }

    async fn release_and_delete(&self, booking_id: i64) -> Result<()> {
        let booking = self
            .gateway
            .find::<Booking>(booking_id)
            .await?
            .ok_or(InvariantViolation::BookingNotFound(booking_id))?;

        match self.gateway.find::<Room>(booking.room_id).await? {
            Some(mut room) => {
                room.available = true;
                self.gateway.update(&room).await?;
            }
            None => tracing::warn!(booking_id, room_id = booking.room_id, "booked room is gone"),
        }

        self.gateway.delete::<Booking>(booking_id).await?;
        tracing::info!(booking_id, room_id = booking.room_id, "booking cancelled");
        Ok(())
    }

    pub async fn bookings_for_customer(&self, customer_id: i64) -> Result<Vec<Booking>> {
        if self.gateway.find::<Customer>(customer_id).await?.is_none() {
            return Err(InvariantViolation::CustomerNotFound(customer_id).into());
        }
        Ok(self
            .gateway
            .query(BOOKINGS_BY_CUSTOMER, &[customer_id.into()])
            .await?)
    }

    pub async fn bookings_for_room(&self, room_id: i64) -> Result<Vec<Booking>> {
        Ok(self
            .gateway
            .query(BOOKINGS_BY_ROOM, &[room_id.into()])
            .await?)
    }

    /// Persist a new status and set the room's availability to match it.
    pub async fn update_status(&self, booking_id: i64, status: BookingStatus) -> Result<Booking> {
        self.gateway.begin_transaction().await?;
        let result = self.apply_status(booking_id, status).await;
        finish(&self.gateway, result).await
    }

    async fn apply_status(&self, booking_id: i64, status: BookingStatus) -> Result<Booking> {
        let mut booking = self
            .gateway
            .find::<Booking>(booking_id)
            .await?
            .ok_or(InvariantViolation::BookingNotFound(booking_id))?;
        let mut room = self
            .gateway
            .find::<Room>(booking.room_id)
            .await?
            .ok_or(InvariantViolation::RoomNotFound(booking.room_id))?;

        let previous = booking.status;
        booking.status = status;
        self.gateway.update(&booking).await?;

        room.available = status.room_available();
        self.gateway.update(&room).await?;

        tracing::info!(
            booking_id,
            from = previous.name(),
            to = status.name(),
            room_available = room.available,
            "booking status changed"
        );
        Ok(booking)
    }

    /// Fill the booking's transient customer and room from storage.
    pub async fn load_related(&self, booking: &mut Booking) -> Result<()> {
        booking.customer = self.gateway.find(booking.customer_id).await?;
        booking.room = self.gateway.find(booking.room_id).await?;
        Ok(())
    }

    /// Price of a stay: nights times the room's nightly rate.
    pub fn quote_total(room: &Room, check_in: NaiveDate, check_out: NaiveDate) -> Result<f32> {
        validate_stay(check_in, check_out)?;
        let nights = (check_out - check_in).num_days();
        Ok(nights as f32 * room.price_per_night)
    }
}

/// Stay dates must be ordered and the amount a non-negative number.
pub(crate) fn validate_booking(
    check_in: NaiveDate,
    check_out: NaiveDate,
    total_amount: f32,
) -> Result<()> {
    validate_stay(check_in, check_out)?;
    if !(total_amount >= 0.0) {
        return Err(InvariantViolation::NegativeAmount(total_amount).into());
    }
    Ok(())
}

/// Insert `booking` inside the caller's transaction. An active booking needs
/// an available room and leaves it unavailable.
pub(crate) async fn insert_booking(gateway: &Gateway, mut booking: Booking) -> Result<Booking> {
    if gateway.find::<Customer>(booking.customer_id).await?.is_none() {
        return Err(InvariantViolation::CustomerNotFound(booking.customer_id).into());
    }
    let mut room = gateway
        .find::<Room>(booking.room_id)
        .await?
        .ok_or(InvariantViolation::RoomNotFound(booking.room_id))?;
    let takes_room = booking.status == BookingStatus::Active;
    if takes_room && !room.available {
        return Err(InvariantViolation::RoomUnavailable(booking.room_id).into());
    }

    let id = gateway.create(&booking).await?;
    booking.id = Some(id);

    if takes_room {
        room.available = false;
        gateway.update(&room).await?;
    }

    tracing::info!(
        booking_id = id,
        customer_id = booking.customer_id,
        room_id = booking.room_id,
        status = booking.status.name(),
        nights = booking.nights(),
        "booking created"
    );
    Ok(booking)
}

fn validate_stay(check_in: NaiveDate, check_out: NaiveDate) -> Result<()> {
    if check_out > check_in {
        Ok(())
    } else {
        Err(InvariantViolation::InvalidStay {
            check_in,
            check_out,
        }
        .into())
    }
}
