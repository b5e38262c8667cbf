use chrono::NaiveDate;
use hotel_orm::{unknown_field, Entity, Enumerated, FieldDef, FieldKind, MappingError, SqlValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Enumerated for Gender {
    const TYPE_NAME: &'static str = "Gender";
    const VARIANTS: &'static [Self] = &[Gender::Male, Gender::Female, Gender::Other];

    fn name(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// A hotel guest. Owns zero or more bookings through `booking.customer_id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Gender,
    pub birthdate: Option<NaiveDate>,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            gender,
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_birthdate(mut self, birthdate: NaiveDate) -> Self {
        self.birthdate = Some(birthdate);
        self
    }
}

impl Entity for Customer {
    const ENTITY: &'static str = "Customer";
    const TABLE: &'static str = "customer";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::identity("id", "id"),
        FieldDef::new("name", "customer_name", FieldKind::Text),
        FieldDef::new("email", "email", FieldKind::Text),
        FieldDef::new("phone", "phone_number", FieldKind::Text).nullable(),
        FieldDef::new("gender", "gender", FieldKind::Enumerated),
        FieldDef::new("birthdate", "birthdate", FieldKind::Date).nullable(),
    ];

    fn get(&self, field: &str) -> Result<SqlValue, MappingError> {
        Ok(match field {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.as_deref().into(),
            "gender" => SqlValue::from_enum(self.gender),
            "birthdate" => self.birthdate.into(),
            other => return Err(unknown_field::<Self>(other)),
        })
    }

    fn set(&mut self, field: &str, value: SqlValue) -> Result<(), MappingError> {
        match field {
            "id" => self.id = value.into_option(|v| v.into_i64("id"))?,
            "name" => self.name = value.into_string("name")?,
            "email" => self.email = value.into_string("email")?,
            "phone" => self.phone = value.into_option(|v| v.into_string("phone"))?,
            "gender" => self.gender = value.into_enum("gender")?,
            "birthdate" => self.birthdate = value.into_option(|v| v.into_date("birthdate"))?,
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }
}
