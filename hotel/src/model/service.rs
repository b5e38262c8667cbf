use hotel_orm::{unknown_field, Entity, FieldDef, FieldKind, MappingError, SqlValue};
use serde::{Deserialize, Serialize};

/// A billable extra (breakfast, parking, spa) that can be attached to bookings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Service {
    pub id: Option<i64>,
    pub name: String,
    pub price: f32,
}

impl Service {
    pub fn new(name: impl Into<String>, price: f32) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
        }
    }
}

impl Entity for Service {
    const ENTITY: &'static str = "Service";
    const TABLE: &'static str = "service";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::identity("id", "id"),
        FieldDef::new("name", "service_name", FieldKind::Text),
        FieldDef::new("price", "price", FieldKind::Float),
    ];

    fn get(&self, field: &str) -> Result<SqlValue, MappingError> {
        Ok(match field {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "price" => self.price.into(),
            other => return Err(unknown_field::<Self>(other)),
        })
    }

    fn set(&mut self, field: &str, value: SqlValue) -> Result<(), MappingError> {
        match field {
            "id" => self.id = value.into_option(|v| v.into_i64("id"))?,
            "name" => self.name = value.into_string("name")?,
            "price" => self.price = value.into_f32("price")?,
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }
}

/// Many-to-many link between a booking and a service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookingService {
    pub id: Option<i64>,
    pub booking_id: i64,
    pub service_id: i64,
}

impl Entity for BookingService {
    const ENTITY: &'static str = "BookingService";
    const TABLE: &'static str = "booking_service";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::identity("id", "id"),
        FieldDef::new("booking_id", "booking_id", FieldKind::Long),
        FieldDef::new("service_id", "service_id", FieldKind::Long),
    ];

    fn get(&self, field: &str) -> Result<SqlValue, MappingError> {
        Ok(match field {
            "id" => self.id.into(),
            "booking_id" => self.booking_id.into(),
            "service_id" => self.service_id.into(),
            other => return Err(unknown_field::<Self>(other)),
        })
    }

    fn set(&mut self, field: &str, value: SqlValue) -> Result<(), MappingError> {
        match field {
            "id" => self.id = value.into_option(|v| v.into_i64("id"))?,
            "booking_id" => self.booking_id = value.into_i64("booking_id")?,
            "service_id" => self.service_id = value.into_i64("service_id")?,
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }
}
