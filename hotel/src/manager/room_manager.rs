//! Room lookup, maintenance and the room → bookings cascade.

use std::sync::Arc;

use hotel_orm::{Gateway, SqlValue};

use super::{delete_bookings, finish, BOOKINGS_BY_ROOM};
use crate::error::{InvariantViolation, Result};
use crate::model::{Booking, Room};

const ROOM_BY_NUMBER: &str = "SELECT * FROM room WHERE room_number = ?";

pub struct RoomManager {
    gateway: Arc<Gateway>,
}

impl RoomManager {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Persist a new room and return its id. Room numbers must be unique and
    /// prices positive.
    pub async fn add_room(&self, room: &Room) -> Result<i64> {
        check_new_room(&self.gateway, room).await?;
        let id = self.gateway.create(room).await?;
        tracing::info!(id, number = room.number, "room added");
        Ok(id)
    }

    pub async fn find_room(&self, id: i64) -> Result<Option<Room>> {
        Ok(self.gateway.find(id).await?)
    }

    pub async fn find_room_by_number(&self, number: i32) -> Result<Option<Room>> {
        let rooms: Vec<Room> = self
            .gateway
            .query(ROOM_BY_NUMBER, &[number.into()])
            .await?;
        Ok(rooms.into_iter().next())
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>> {
        Ok(self
            .gateway
            .query("SELECT * FROM room ORDER BY room_number", &[])
            .await?)
    }

    pub async fn list_available_rooms(&self) -> Result<Vec<Room>> {
        Ok(self
            .gateway
            .query(
                "SELECT * FROM room WHERE is_available = ? ORDER BY room_number",
                &[SqlValue::Boolean(true)],
            )
            .await?)
    }

    /// Overwrite a room. Changing its number to one already in use fails.
    pub async fn update_room(&self, room: &Room) -> Result<()> {
        validate_price(room.price_per_night)?;
        if let Some(existing) = self.find_room_by_number(room.number).await? {
            if existing.id != room.id {
                return Err(InvariantViolation::DuplicateRoomNumber(room.number).into());
            }
        }
        self.gateway.update(room).await?;
        Ok(())
    }

    /// Delete the room row only. Bookings that reference it are left alone;
    /// see [`RoomManager::delete_room_with_bookings`].
    pub async fn delete_room(&self, id: i64) -> Result<()> {
        self.gateway.delete::<Room>(id).await?;
        Ok(())
    }

    /// Delete every booking of the room, then the room, in one transaction.
    /// Returns the number of bookings removed.
    pub async fn delete_room_with_bookings(&self, room_id: i64) -> Result<usize> {
        self.gateway.begin_transaction().await?;
        let result = self.cascade_delete(room_id).await;
        finish(&self.gateway, result).await
    }

    async fn cascade_delete(&self, room_id: i64) -> Result<usize> {
        if self.gateway.find::<Room>(room_id).await?.is_none() {
            return Err(InvariantViolation::RoomNotFound(room_id).into());
        }

        let bookings: Vec<Booking> = self
            .gateway
            .query(BOOKINGS_BY_ROOM, &[room_id.into()])
            .await?;
        let deleted = delete_bookings(&self.gateway, &bookings).await?;
        self.gateway.delete::<Room>(room_id).await?;

        tracing::info!(room_id, bookings = deleted, "room deleted with bookings");
        Ok(deleted)
    }

    pub async fn mark_available(&self, room_id: i64) -> Result<()> {
        self.set_availability(room_id, true).await
    }

    pub async fn mark_unavailable(&self, room_id: i64) -> Result<()> {
        self.set_availability(room_id, false).await
    }

    async fn set_availability(&self, room_id: i64, available: bool) -> Result<()> {
        let mut room = self
            .gateway
            .find::<Room>(room_id)
            .await?
            .ok_or(InvariantViolation::RoomNotFound(room_id))?;
        room.available = available;
        self.gateway.update(&room).await?;
        Ok(())
    }
}

/// A new room needs a positive price and a number no other room uses.
pub(crate) async fn check_new_room(gateway: &Gateway, room: &Room) -> Result<()> {
    validate_price(room.price_per_night)?;
    let same_number: Vec<Room> = gateway
        .query(ROOM_BY_NUMBER, &[room.number.into()])
        .await?;
    if !same_number.is_empty() {
        return Err(InvariantViolation::DuplicateRoomNumber(room.number).into());
    }
    Ok(())
}

fn validate_price(price: f32) -> Result<()> {
    if price > 0.0 {
        Ok(())
    } else {
        Err(InvariantViolation::NonPositivePrice(price).into())
    }
}
