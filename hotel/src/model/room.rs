use hotel_orm::{unknown_field, Entity, Enumerated, FieldDef, FieldKind, MappingError, SqlValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    #[default]
    Single,
    Double,
    Suite,
}

impl Enumerated for RoomType {
    const TYPE_NAME: &'static str = "RoomType";
    const VARIANTS: &'static [Self] = &[RoomType::Single, RoomType::Double, RoomType::Suite];

    fn name(self) -> &'static str {
        match self {
            RoomType::Single => "single",
            RoomType::Double => "double",
            RoomType::Suite => "suite",
        }
    }
}

/// A bookable room. `number` is the business key; uniqueness is checked by
/// [`RoomManager`](crate::manager::RoomManager), not the schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Room {
    pub id: Option<i64>,
    pub number: i32,
    pub room_type: RoomType,
    pub price_per_night: f32,
    pub available: bool,
}

impl Room {
    /// A new, available room.
    pub fn new(number: i32, room_type: RoomType, price_per_night: f32) -> Self {
        Self {
            id: None,
            number,
            room_type,
            price_per_night,
            available: true,
        }
    }
}

impl Entity for Room {
    const ENTITY: &'static str = "Room";
    const TABLE: &'static str = "room";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::identity("id", "id"),
        FieldDef::new("number", "room_number", FieldKind::Integer),
        FieldDef::new("room_type", "room_type", FieldKind::Enumerated),
        FieldDef::new("price_per_night", "price_per_night", FieldKind::Float),
        FieldDef::new("available", "is_available", FieldKind::Boolean),
    ];

    fn get(&self, field: &str) -> Result<SqlValue, MappingError> {
        Ok(match field {
            "id" => self.id.into(),
            "number" => self.number.into(),
            "room_type" => SqlValue::from_enum(self.room_type),
            "price_per_night" => self.price_per_night.into(),
            "available" => self.available.into(),
            other => return Err(unknown_field::<Self>(other)),
        })
    }

    fn set(&mut self, field: &str, value: SqlValue) -> Result<(), MappingError> {
        match field {
            "id" => self.id = value.into_option(|v| v.into_i64("id"))?,
            "number" => self.number = value.into_i32("number")?,
            "room_type" => self.room_type = value.into_enum("room_type")?,
            "price_per_night" => self.price_per_night = value.into_f32("price_per_night")?,
            "available" => self.available = value.into_bool("available")?,
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }
}
