//! Join records telling which accounts and franchisors a user can access.
//!
//! Both are fetched with the user's own access token, never with
//! application credentials.

use serde::Serialize;

use crate::access_token::AccessToken;
use crate::client::RallioClient;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::hydrate::{hydrate_collection, Attributes, Hydrate};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountOwnership {
    pub user_id: i64,
    pub account_id: i64,
    pub account_name: String,
    pub account_franchisor_id: i64,
    pub account_franchisor_name: String,
}

impl Hydrate for AccountOwnership {
    fn assign(&mut self, attrs: &Attributes<'_>) -> Result<(), ApiError> {
        attrs.read("user_id", &mut self.user_id)?;
        attrs.read("account_id", &mut self.account_id)?;
        attrs.read("account_name", &mut self.account_name)?;
        attrs.read("account_franchisor_id", &mut self.account_franchisor_id)?;
        attrs.read("account_franchisor_name", &mut self.account_franchisor_name)
    }
}

impl AccountOwnership {
    pub fn for_token(client: &RallioClient, token: &AccessToken) -> Result<Vec<Self>, ApiError> {
        let raw = client.call(Endpoint::AccountOwnerships, Some(&token.access_token), None)?;
        hydrate_collection(&raw, "account_ownerships")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FranchisorOwnership {
    pub user_id: i64,
    pub franchisor_id: i64,
    pub franchisor_name: String,
}

impl Hydrate for FranchisorOwnership {
    fn assign(&mut self, attrs: &Attributes<'_>) -> Result<(), ApiError> {
        attrs.read("user_id", &mut self.user_id)?;
        attrs.read("franchisor_id", &mut self.franchisor_id)?;
        attrs.read("franchisor_name", &mut self.franchisor_name)
    }
}

impl FranchisorOwnership {
    pub fn for_token(client: &RallioClient, token: &AccessToken) -> Result<Vec<Self>, ApiError> {
        let raw = client.call(Endpoint::FranchisorOwnerships, Some(&token.access_token), None)?;
        hydrate_collection(&raw, "franchisor_ownerships")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{client, StubTransport};
    use serde_json::json;

    fn token() -> AccessToken {
        AccessToken {
            access_token: "tok123".to_string(),
            user_id: 1,
            ..AccessToken::default()
        }
    }

    #[test]
    fn account_ownerships_use_bearer_token() {
        let stub = StubTransport::new().respond(
            HttpMethod::Get,
            "/account_ownerships",
            200,
            json!([{"user_id": 1, "account_id": 100, "account_name": "Acme Downtown"}]),
        );
        let ownerships = AccountOwnership::for_token(&client(stub.clone()), &token()).unwrap();
        assert_eq!(ownerships.len(), 1);
        assert_eq!(ownerships[0].account_id, 100);

        let req = &stub.requests()[0];
        assert_eq!(req.header("Authorization"), Some("Bearer tok123"));
        assert_eq!(req.header("X-Application-ID"), None);
    }

    #[test]
    fn franchisor_ownerships_accept_wrapped_collection() {
        let stub = StubTransport::new().respond(
            HttpMethod::Get,
            "/franchisor_ownerships",
            200,
            json!({"franchisor_ownerships": [
                {"user_id": 1, "franchisor_id": 9, "franchisor_name": "Acme"},
                {"user_id": 1, "franchisor_id": 10, "franchisor_name": "Zenith"}
            ]}),
        );
        let ownerships = FranchisorOwnership::for_token(&client(stub), &token()).unwrap();
        let names: Vec<_> = ownerships.iter().map(|o| o.franchisor_name.as_str()).collect();
        assert_eq!(names, ["Acme", "Zenith"]);
    }

    #[test]
    fn rejected_token_surfaces_transport_error() {
        let stub = StubTransport::new().respond(
            HttpMethod::Get,
            "/account_ownerships",
            401,
            json!({"error": "invalid token"}),
        );
        let err = AccountOwnership::for_token(&client(stub), &token()).unwrap_err();
        assert!(matches!(err, ApiError::Transport { status: 401, .. }));
    }
}
