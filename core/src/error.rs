//! Error types for the Rallio API client.
//!
//! # Design
//! Credential problems are split by cause: `Configuration` means the
//! application id/secret were never set, `MissingCredential` means a
//! user-scoped call ran before an access token was established, and
//! `InvalidCredential` means a token was present but unusable. Every
//! non-2xx response lands in `Transport` with the raw status and body.

use thiserror::Error;

/// Errors returned by `RallioClient` and the entity operations built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Application id or secret is unset or empty.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A bearer token was supplied but cannot be used (e.g. empty).
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// A user-scoped call was attempted without an access token.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    /// The transport could not complete the exchange at all.
    #[error("network error: {0}")]
    Network(String),

    /// A response value could not be coerced to the declared attribute type.
    #[error("cannot hydrate `{field}` as {expected_type}: got {actual_value}")]
    Hydration {
        field: String,
        expected_type: &'static str,
        actual_value: String,
    },

    /// The response body is not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
