//! Credential headers for the two authentication classes of the Rallio API.
//!
//! Calls made before a human user is authenticated carry the application
//! id/secret pair; calls made on behalf of a user carry that user's access
//! token as a bearer token. Which class applies is fixed per endpoint (see
//! `Endpoint::credential_class`), never inferred here.

use crate::config::Config;
use crate::error::ApiError;

pub const APPLICATION_ID_HEADER: &str = "X-Application-ID";
pub const APPLICATION_SECRET_HEADER: &str = "X-Application-Secret";
pub const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialClass {
    Application,
    Bearer,
}

impl CredentialClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialClass::Application => "application",
            CredentialClass::Bearer => "bearer",
        }
    }
}

pub fn application_headers(config: &Config) -> Result<Vec<(String, String)>, ApiError> {
    let id = non_empty(config.application_id.as_deref())
        .ok_or_else(|| ApiError::Configuration("application id is not set".to_string()))?;
    let secret = non_empty(config.application_secret.as_deref())
        .ok_or_else(|| ApiError::Configuration("application secret is not set".to_string()))?;
    Ok(vec![
        (APPLICATION_ID_HEADER.to_string(), id.to_string()),
        (APPLICATION_SECRET_HEADER.to_string(), secret.to_string()),
    ])
}

pub fn bearer_headers(token: &str) -> Result<Vec<(String, String)>, ApiError> {
    if token.is_empty() {
        return Err(ApiError::InvalidCredential("bearer token is empty".to_string()));
    }
    Ok(vec![(AUTHORIZATION_HEADER.to_string(), format!("Bearer {token}"))])
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
