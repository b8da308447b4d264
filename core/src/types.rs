//! Descriptive records the API embeds in users and dashboard responses.
//!
//! Accounts and franchisors are never fetched by id here; they only arrive
//! nested in `User` payloads and are hydrated from there.

use serde::Serialize;

use crate::error::ApiError;
use crate::hydrate::{Attributes, Hydrate};

/// A single business location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub url: String,
    pub city: String,
    pub country_code: String,
    pub time_zone: String,
    pub franchisor_id: i64,
    pub franchisor_name: String,
}

impl Hydrate for Account {
    fn assign(&mut self, attrs: &Attributes<'_>) -> Result<(), ApiError> {
        attrs.read("id", &mut self.id)?;
        attrs.read("name", &mut self.name)?;
        attrs.read("short_name", &mut self.short_name)?;
        attrs.read("url", &mut self.url)?;
        attrs.read("city", &mut self.city)?;
        attrs.read("country_code", &mut self.country_code)?;
        attrs.read("time_zone", &mut self.time_zone)?;
        attrs.read("franchisor_id", &mut self.franchisor_id)?;
        attrs.read("franchisor_name", &mut self.franchisor_name)
    }
}

/// A brand grouping a set of accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Franchisor {
    pub id: i64,
    pub name: String,
}

impl Hydrate for Franchisor {
    fn assign(&mut self, attrs: &Attributes<'_>) -> Result<(), ApiError> {
        attrs.read("id", &mut self.id)?;
        attrs.read("name", &mut self.name)
    }
}

/// Request payload for `User::create`. Sent wrapped as `{"user": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}
