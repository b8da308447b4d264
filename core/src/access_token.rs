//! User access tokens: issued with application credentials, destroyed with
//! themselves as the bearer.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::client::RallioClient;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::hydrate::{unwrap_entity, Attributes, Hydrate};

#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub user_id: i64,
    pub expires_at: String,
    pub scopes: String,
}

impl Hydrate for AccessToken {
    fn assign(&mut self, attrs: &Attributes<'_>) -> Result<(), ApiError> {
        attrs.read("access_token", &mut self.access_token)?;
        attrs.read("user_id", &mut self.user_id)?;
        attrs.read("expires_at", &mut self.expires_at)?;
        attrs.read("scopes", &mut self.scopes)
    }
}

impl AccessToken {
    pub fn create(client: &RallioClient, user_id: i64) -> Result<Self, ApiError> {
        let raw = client.call(Endpoint::CreateAccessToken { user_id }, None, None)?;
        let token = Self::hydrate(unwrap_entity(&raw, "access_token"))?;
        info!(user_id, "issued access token");
        Ok(token)
    }

    /// Revoke this token server-side. Returns `true` on any 2xx answer,
    /// whatever its body.
    ///
    /// Destroying an already destroyed token is left to the server; whatever
    /// it answers is surfaced unchanged.
    pub fn destroy(&self, client: &RallioClient) -> Result<bool, ApiError> {
        client.send(Endpoint::DestroyAccessToken, Some(&self.access_token), None)?;
        info!(user_id = self.user_id, "destroyed access token");
        Ok(true)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{client, StubTransport};
    use serde_json::{json, Value};

    fn access_token_response() -> Value {
        json!({"access_token": "tok123", "user_id": 1, "expires_at": "2030-01-01T00:00:00Z", "scopes": "user"})
    }

    #[test]
    fn create_posts_to_user_access_token() {
        let stub = StubTransport::new().respond(
            HttpMethod::Post,
            "/users/1/access_token",
            201,
            access_token_response(),
        );
        let token = AccessToken::create(&client(stub.clone()), 1).unwrap();
        assert_eq!(serde_json::to_value(&token).unwrap(), access_token_response());

        let req = &stub.requests()[0];
        assert_eq!(req.header("X-Application-ID"), Some("foobar"));
        assert_eq!(req.header("X-Application-Secret"), Some("bizbaz"));
        assert!(req.body.is_none());
    }

    #[test]
    fn destroy_sends_own_secret_as_bearer() {
        let stub = StubTransport::new().respond(HttpMethod::Delete, "/access_token", 204, Value::Null);
        let token = AccessToken::hydrate(&access_token_response()).unwrap();
        assert!(token.destroy(&client(stub.clone())).unwrap());

        let req = &stub.requests()[0];
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.header("Authorization"), Some("Bearer tok123"));
        assert_eq!(req.header("X-Application-ID"), None);
    }

    #[test]
    fn destroy_accepts_plain_text_success() {
        let stub = StubTransport::new().respond_raw(HttpMethod::Delete, "/access_token", 200, "OK");
        let token = AccessToken::hydrate(&access_token_response()).unwrap();
        assert!(token.destroy(&client(stub)).unwrap());
    }

    #[test]
    fn destroy_twice_surfaces_server_answer() {
        let stub = StubTransport::new().respond(
            HttpMethod::Delete,
            "/access_token",
            401,
            json!({"error": "token revoked"}),
        );
        let token = AccessToken::hydrate(&access_token_response()).unwrap();
        let err = token.destroy(&client(stub)).unwrap_err();
        assert!(matches!(err, ApiError::Transport { status: 401, .. }));
    }

    #[test]
    fn destroy_with_empty_secret_never_reaches_transport() {
        let stub = StubTransport::new();
        let err = AccessToken::default().destroy(&client(stub.clone())).unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredential(_)));
        assert!(stub.requests().is_empty());
    }

    #[test]
    fn debug_hides_secret() {
        let token = AccessToken::hydrate(&access_token_response()).unwrap();
        assert!(!format!("{token:?}").contains("tok123"));
    }
}
