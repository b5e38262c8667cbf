//! Test-only entity shared by the unit tests in this crate.

use chrono::NaiveDate;

use crate::entity::{unknown_field, Entity, FieldDef, FieldKind};
use crate::error::MappingError;
use crate::value::{Enumerated, SqlValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold,
}

impl Enumerated for Tier {
    const TYPE_NAME: &'static str = "Tier";
    const VARIANTS: &'static [Self] = &[Tier::Bronze, Tier::Silver, Tier::Gold];

    fn name(self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Guest {
    pub id: Option<i64>,
    pub name: String,
    pub tier: Tier,
    pub visits: i32,
    pub balance: f32,
    pub first_visit: Option<NaiveDate>,
    /// Not persisted.
    pub scratch: Option<String>,
}

impl Guest {
    pub fn sample(name: &str, tier: Tier) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            tier,
            visits: 3,
            balance: 99.5,
            first_visit: NaiveDate::from_ymd_opt(2023, 6, 1),
            scratch: Some("ignored".to_string()),
        }
    }
}

impl Entity for Guest {
    const ENTITY: &'static str = "Guest";
    const TABLE: &'static str = "guest";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::identity("id", "id"),
        FieldDef::new("name", "guest_name", FieldKind::Text),
        FieldDef::new("tier", "tier", FieldKind::Enumerated),
        FieldDef::new("visits", "visits", FieldKind::Integer),
        FieldDef::new("balance", "balance", FieldKind::Float),
        FieldDef::new("first_visit", "first_visit", FieldKind::Date).nullable(),
    ];

    fn get(&self, field: &str) -> Result<SqlValue, MappingError> {
        Ok(match field {
            "id" => self.id.into(),
            "name" => self.name.clone().into(),
            "tier" => SqlValue::from_enum(self.tier),
            "visits" => self.visits.into(),
            "balance" => self.balance.into(),
            "first_visit" => self.first_visit.into(),
            other => return Err(unknown_field::<Self>(other)),
        })
    }

    fn set(&mut self, field: &str, value: SqlValue) -> Result<(), MappingError> {
        match field {
            "id" => self.id = value.into_option(|v| v.into_i64("id"))?,
            "name" => self.name = value.into_string("name")?,
            "tier" => self.tier = value.into_enum("tier")?,
            "visits" => self.visits = value.into_i32("visits")?,
            "balance" => self.balance = value.into_f32("balance")?,
            "first_visit" => {
                self.first_visit = value.into_option(|v| v.into_date("first_visit"))?
            }
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }
}

pub const GUEST_SCHEMA: &str = "CREATE TABLE guest (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    guest_name TEXT NOT NULL,
    tier TEXT NOT NULL,
    visits INTEGER NOT NULL,
    balance REAL NOT NULL,
    first_visit DATE
)";
