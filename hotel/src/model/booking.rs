use chrono::NaiveDate;
use hotel_orm::{unknown_field, Entity, Enumerated, FieldDef, FieldKind, MappingError, SqlValue};
use serde::{Deserialize, Serialize};

use super::{Customer, Room};

/// Booking lifecycle state.
///
/// Only two states affect room availability: `Active` keeps the room
/// unavailable and `Cancelled` releases it. Anything else (a completed stay)
/// passes through without touching the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Room availability implied by moving a booking into this status.
    pub fn room_available(self) -> bool {
        self == BookingStatus::Cancelled
    }
}

impl Enumerated for BookingStatus {
    const TYPE_NAME: &'static str = "BookingStatus";
    const VARIANTS: &'static [Self] = &[
        BookingStatus::Active,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    fn name(self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// A stay of one customer in one room.
///
/// The customer and room are referenced by id only. `customer` and `room`
/// are transient: never persisted, filled in on demand by
/// [`BookingManager::load_related`](crate::manager::BookingManager::load_related).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Booking {
    pub id: Option<i64>,
    pub customer_id: i64,
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_amount: f32,
    pub status: BookingStatus,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub room: Option<Room>,
}

impl Booking {
    pub fn new(
        customer_id: i64,
        room_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
        total_amount: f32,
    ) -> Self {
        Self {
            customer_id,
            room_id,
            check_in,
            check_out,
            total_amount,
            ..Self::default()
        }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

impl Entity for Booking {
    const ENTITY: &'static str = "Booking";
    const TABLE: &'static str = "booking";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::identity("id", "id"),
        FieldDef::new("customer_id", "customer_id", FieldKind::Long),
        FieldDef::new("room_id", "room_id", FieldKind::Long),
        FieldDef::new("check_in", "check_in_date", FieldKind::Date),
        FieldDef::new("check_out", "check_out_date", FieldKind::Date),
        FieldDef::new("total_amount", "total_amount", FieldKind::Float),
        FieldDef::new("status", "booking_status", FieldKind::Enumerated),
    ];

    fn get(&self, field: &str) -> Result<SqlValue, MappingError> {
        Ok(match field {
            "id" => self.id.into(),
            "customer_id" => self.customer_id.into(),
            "room_id" => self.room_id.into(),
            "check_in" => self.check_in.into(),
            "check_out" => self.check_out.into(),
            "total_amount" => self.total_amount.into(),
            "status" => SqlValue::from_enum(self.status),
            other => return Err(unknown_field::<Self>(other)),
        })
    }

    fn set(&mut self, field: &str, value: SqlValue) -> Result<(), MappingError> {
        match field {
            "id" => self.id = value.into_option(|v| v.into_i64("id"))?,
            "customer_id" => self.customer_id = value.into_i64("customer_id")?,
            "room_id" => self.room_id = value.into_i64("room_id")?,
            "check_in" => self.check_in = value.into_date("check_in")?,
            "check_out" => self.check_out = value.into_date("check_out")?,
            "total_amount" => self.total_amount = value.into_f32("total_amount")?,
            "status" => self.status = value.into_enum("status")?,
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }
}
