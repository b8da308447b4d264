//! Synchronous client for the Rallio API.
//!
//! # Overview
//! Maps the Rallio REST API (users, accounts, franchisors, access and
//! sign-on tokens, ownerships, dashboard) onto typed values. Every entity
//! operation follows the same path: build an `HttpRequest`, execute it
//! through a `Transport`, parse the JSON body and hydrate the entity.
//!
//! # Design
//! - `Config` carries the base URL and the application id/secret; it is
//!   passed into `RallioClient` once, there is no global state.
//! - Each `Endpoint` is tagged with a `CredentialClass`. `RallioClient::build`
//!   is the only place that turns that tag into headers: application
//!   credentials for calls made before a user is authenticated, the user's
//!   bearer token for everything done on their behalf.
//! - `Transport` is the I/O seam; `UreqTransport` is the real one, tests
//!   plug in recording stubs.
//! - Entities implement `Hydrate` with an explicit attribute list, so
//!   missing fields default, unknown fields are ignored and shape mismatches
//!   fail with the offending path.
//! - The only mutable shared state is the access token cached on a `User`,
//!   guarded so concurrent callers issue at most one token.
//!
//! ```no_run
//! use rallio_core::{Config, RallioClient, User};
//!
//! # fn main() -> Result<(), rallio_core::ApiError> {
//! let client = RallioClient::with_ureq(Config::from_env());
//! for mut user in User::accessible_users(&client)? {
//!     user.access_token(&client)?;
//!     let ownerships = user.account_ownerships(&client)?;
//!     user.dashboard(&client)?;
//!     println!("{} owns {} accounts", user.name, ownerships.len());
//!     user.destroy_access_token(&client)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod access_token;
pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod hydrate;
pub mod ownership;
pub mod sign_on_token;
pub mod transport;
pub mod types;
pub mod user;

#[cfg(test)]
mod testing;

pub use access_token::AccessToken;
pub use client::RallioClient;
pub use config::Config;
pub use credentials::CredentialClass;
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use hydrate::Hydrate;
pub use ownership::{AccountOwnership, FranchisorOwnership};
pub use sign_on_token::SignOnToken;
pub use transport::{Transport, UreqTransport};
pub use types::{Account, Franchisor, NewUser};
pub use user::User;
