//! User records and persistence.

mod repository;
mod service;

pub use repository::UserRepository;
pub use service::UserService;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::UserRole;

/// Age from which the lifetime storefront benefit applies.
pub const SENIOR_AGE: i32 = 50;

/// User as saved in storage. Field names match the persisted JSON shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Normalized RUN: body digits plus uppercase check character.
    pub run: String,
    pub nombre: String,
    pub apellidos: String,
    /// Always lowercase; unique across users.
    pub correo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<NaiveDate>,
    /// Assigned once at creation; immutable for protected accounts.
    pub tipo_usuario: UserRole,
    pub region_id: String,
    pub region_nombre: String,
    pub comuna: String,
    pub direccion: String,
    /// SHA-256 hex digest, or empty for "no password".
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo_descuento: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellidos)
            .trim()
            .to_owned()
    }

    /// Age in whole years as of `today`.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.fecha_nacimiento
            .map(|born| years_between(born, today))
    }

    pub fn age(&self) -> Option<i32> {
        self.age_on(Utc::now().date_naive())
    }

    /// Whether the account qualifies for the lifetime senior benefit.
    pub fn senior_discount(&self) -> bool {
        self.age().is_some_and(|age| age >= SENIOR_AGE)
    }
}

/// Whole years elapsed between two dates.
pub(crate) fn years_between(born: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    years
}
