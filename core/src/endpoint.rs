//! The fixed table of Rallio API operations.
//!
//! Every operation knows its verb, its path and the credential class it must
//! be called with. `RallioClient::build` consults this table and nothing
//! else when choosing headers.

use crate::credentials::CredentialClass;
use crate::http::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    AccessibleUsers,
    CreateUser,
    SignOnTokens { user_id: i64 },
    CreateAccessToken { user_id: i64 },
    DestroyAccessToken,
    AccountOwnerships,
    FranchisorOwnerships,
    Dashboard,
}

impl Endpoint {
    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::AccessibleUsers
            | Endpoint::AccountOwnerships
            | Endpoint::FranchisorOwnerships
            | Endpoint::Dashboard => HttpMethod::Get,
            Endpoint::CreateUser
            | Endpoint::SignOnTokens { .. }
            | Endpoint::CreateAccessToken { .. } => HttpMethod::Post,
            Endpoint::DestroyAccessToken => HttpMethod::Delete,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::AccessibleUsers => "/accessible_users".to_string(),
            Endpoint::CreateUser => "/users".to_string(),
            Endpoint::SignOnTokens { user_id } => format!("/users/{user_id}/sign_on_tokens"),
            Endpoint::CreateAccessToken { user_id } => format!("/users/{user_id}/access_token"),
            Endpoint::DestroyAccessToken => "/access_token".to_string(),
            Endpoint::AccountOwnerships => "/account_ownerships".to_string(),
            Endpoint::FranchisorOwnerships => "/franchisor_ownerships".to_string(),
            Endpoint::Dashboard => "/dashboard".to_string(),
        }
    }

    pub fn credential_class(&self) -> CredentialClass {
        match self {
            Endpoint::AccessibleUsers
            | Endpoint::CreateUser
            | Endpoint::SignOnTokens { .. }
            | Endpoint::CreateAccessToken { .. } => CredentialClass::Application,
            Endpoint::DestroyAccessToken
            | Endpoint::AccountOwnerships
            | Endpoint::FranchisorOwnerships
            | Endpoint::Dashboard => CredentialClass::Bearer,
        }
    }

    /// Stable name used in logs and test vectors.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::AccessibleUsers => "accessible_users",
            Endpoint::CreateUser => "create_user",
            Endpoint::SignOnTokens { .. } => "sign_on_tokens",
            Endpoint::CreateAccessToken { .. } => "create_access_token",
            Endpoint::DestroyAccessToken => "destroy_access_token",
            Endpoint::AccountOwnerships => "account_ownerships",
            Endpoint::FranchisorOwnerships => "franchisor_ownerships",
            Endpoint::Dashboard => "dashboard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_class_covers_unauthenticated_calls() {
        for endpoint in [
            Endpoint::AccessibleUsers,
            Endpoint::CreateUser,
            Endpoint::SignOnTokens { user_id: 1 },
            Endpoint::CreateAccessToken { user_id: 1 },
        ] {
            assert_eq!(endpoint.credential_class(), CredentialClass::Application, "{}", endpoint.name());
        }
    }

    #[test]
    fn bearer_class_covers_user_scoped_calls() {
        for endpoint in [
            Endpoint::DestroyAccessToken,
            Endpoint::AccountOwnerships,
            Endpoint::FranchisorOwnerships,
            Endpoint::Dashboard,
        ] {
            assert_eq!(endpoint.credential_class(), CredentialClass::Bearer, "{}", endpoint.name());
        }
    }

    #[test]
    fn user_scoped_paths_embed_id() {
        assert_eq!(Endpoint::SignOnTokens { user_id: 42 }.path(), "/users/42/sign_on_tokens");
        assert_eq!(Endpoint::CreateAccessToken { user_id: 42 }.path(), "/users/42/access_token");
    }

    #[test]
    fn destroy_uses_delete() {
        assert_eq!(Endpoint::DestroyAccessToken.method(), HttpMethod::Delete);
        assert_eq!(Endpoint::DestroyAccessToken.path(), "/access_token");
    }
}
