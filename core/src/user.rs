//! Rallio users and every operation performed on their behalf.
//!
//! # Design
//! A `User` is plain data plus one cache slot: the access token issued for
//! it. The slot sits behind a mutex that stays locked while a token is
//! being issued, so concurrent `access_token` calls on the same user issue
//! exactly one `AccessToken::create` and every caller gets the same token.
//! The token stays cached until `destroy_access_token` or
//! `set_access_token` replaces it.
//!
//! `dashboard` is a refresh-in-place: it overwrites the attributes present
//! in the response on `self` and hands back the same user.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::access_token::AccessToken;
use crate::client::RallioClient;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::hydrate::{hydrate_collection, unwrap_entity, Attributes, Hydrate};
use crate::ownership::{AccountOwnership, FranchisorOwnership};
use crate::sign_on_token::SignOnToken;
use crate::types::{Account, Franchisor, NewUser};

#[derive(Debug, Default, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Display name, as reported by the dashboard.
    pub name: String,
    pub accounts: Vec<Account>,
    pub franchisors: Vec<Franchisor>,
    #[serde(skip)]
    access_token: Mutex<Option<AccessToken>>,
}

impl Clone for User {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            name: self.name.clone(),
            accounts: self.accounts.clone(),
            franchisors: self.franchisors.clone(),
            access_token: Mutex::new(self.cached_access_token()),
        }
    }
}

impl Hydrate for User {
    fn assign(&mut self, attrs: &Attributes<'_>) -> Result<(), ApiError> {
        attrs.read("id", &mut self.id)?;
        attrs.read("email", &mut self.email)?;
        attrs.read("first_name", &mut self.first_name)?;
        attrs.read("last_name", &mut self.last_name)?;
        attrs.read("name", &mut self.name)?;
        attrs.read("accounts", &mut self.accounts)?;
        attrs.read("franchisors", &mut self.franchisors)
    }
}

impl User {
    /// Every user the configured application may act for.
    pub fn accessible_users(client: &RallioClient) -> Result<Vec<User>, ApiError> {
        let raw = client.call(Endpoint::AccessibleUsers, None, None)?;
        hydrate_collection(&raw, "users")
    }

    pub fn create(client: &RallioClient, input: &NewUser) -> Result<User, ApiError> {
        let user = serde_json::to_value(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let body = json!({ "user": user });
        let raw = client.call(Endpoint::CreateUser, None, Some(&body))?;
        User::hydrate(unwrap_entity(&raw, "user"))
    }

    pub fn sign_on_token(
        &self,
        client: &RallioClient,
        params: &Map<String, Value>,
    ) -> Result<SignOnToken, ApiError> {
        SignOnToken::create(client, self.id, params)
    }

    /// The cached access token, issuing and caching one on first use.
    pub fn access_token(&self, client: &RallioClient) -> Result<AccessToken, ApiError> {
        let mut slot = self.token_slot();
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }
        let token = AccessToken::create(client, self.id)?;
        *slot = Some(token.clone());
        Ok(token)
    }

    pub fn cached_access_token(&self) -> Option<AccessToken> {
        self.token_slot().clone()
    }

    /// Replace the cached token, e.g. with one persisted by the caller.
    pub fn set_access_token(&self, token: AccessToken) {
        *self.token_slot() = Some(token);
    }

    /// Destroy the cached token server-side and empty the slot. The slot is
    /// kept if the server refuses.
    pub fn destroy_access_token(&self, client: &RallioClient) -> Result<bool, ApiError> {
        let mut slot = self.token_slot();
        let token = slot.as_ref().ok_or_else(|| missing_token("destroy_access_token"))?;
        let destroyed = token.destroy(client)?;
        *slot = None;
        Ok(destroyed)
    }

    /// Requires a token established through `access_token` or
    /// `set_access_token`; never issues one.
    pub fn account_ownerships(&self, client: &RallioClient) -> Result<Vec<AccountOwnership>, ApiError> {
        let token = self
            .cached_access_token()
            .ok_or_else(|| missing_token("account_ownerships"))?;
        AccountOwnership::for_token(client, &token)
    }

    /// Requires a token established through `access_token` or
    /// `set_access_token`; never issues one.
    pub fn franchisor_ownerships(
        &self,
        client: &RallioClient,
    ) -> Result<Vec<FranchisorOwnership>, ApiError> {
        let token = self
            .cached_access_token()
            .ok_or_else(|| missing_token("franchisor_ownerships"))?;
        FranchisorOwnership::for_token(client, &token)
    }

    /// Fetch `/dashboard` as this user and overwrite `self` with it.
    ///
    /// Attributes under `me` plus the `accounts` and `franchisors` lists
    /// replace the current values; anything the response omits is kept.
    /// Nothing changes if the response fails to hydrate.
    pub fn dashboard(&mut self, client: &RallioClient) -> Result<&mut Self, ApiError> {
        let token = self.access_token(client)?;
        let raw = client.call(Endpoint::Dashboard, Some(&token.access_token), None)?;

        let attrs = Attributes::new(&raw)?;
        let mut staged = self.clone();
        attrs.read_into("me", &mut staged)?;
        attrs.read("accounts", &mut staged.accounts)?;
        attrs.read("franchisors", &mut staged.franchisors)?;
        *self = staged;
        Ok(self)
    }

    fn token_slot(&self) -> MutexGuard<'_, Option<AccessToken>> {
        self.access_token.lock().unwrap_or_else(|poisoned| {
            warn!(user_id = self.id, "recovering poisoned access token slot");
            poisoned.into_inner()
        })
    }
}

fn missing_token(operation: &str) -> ApiError {
    ApiError::MissingCredential(format!(
        "{operation} requires an access token; call access_token first"
    ))
}
