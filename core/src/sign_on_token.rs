//! Single sign-on tokens.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::RallioClient;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::hydrate::{unwrap_entity, Attributes, Hydrate};

/// A short-lived token that signs a user into the Rallio web app.
///
/// Every `create` may issue a new token server-side; nothing is cached and
/// there is no destroy operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignOnToken {
    pub token: String,
    pub user_id: i64,
    pub expires_at: String,
    pub url: String,
}

impl Hydrate for SignOnToken {
    fn assign(&mut self, attrs: &Attributes<'_>) -> Result<(), ApiError> {
        attrs.read("token", &mut self.token)?;
        attrs.read("user_id", &mut self.user_id)?;
        attrs.read("expires_at", &mut self.expires_at)?;
        attrs.read("url", &mut self.url)
    }
}

impl SignOnToken {
    /// Issue a token for `user_id`. `params` is sent as the JSON body unless
    /// it is empty.
    pub fn create(
        client: &RallioClient,
        user_id: i64,
        params: &Map<String, Value>,
    ) -> Result<Self, ApiError> {
        let body = (!params.is_empty()).then(|| Value::Object(params.clone()));
        let raw = client.call(Endpoint::SignOnTokens { user_id }, None, body.as_ref())?;
        Self::hydrate(unwrap_entity(&raw, "sign_on_token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{client, StubTransport};
    use serde_json::json;

    #[test]
    fn create_posts_with_application_headers() {
        let stub = StubTransport::new().respond(
            HttpMethod::Post,
            "/users/5/sign_on_tokens",
            201,
            json!({"sign_on_token": {"token": "sso-1", "user_id": 5, "url": "https://app/sso-1"}}),
        );
        let token = SignOnToken::create(&client(stub.clone()), 5, &Map::new()).unwrap();
        assert_eq!(token.token, "sso-1");
        assert_eq!(token.user_id, 5);

        let req = &stub.requests()[0];
        assert_eq!(req.header("X-Application-ID"), Some("foobar"));
        assert_eq!(req.header("X-Application-Secret"), Some("bizbaz"));
        assert!(req.body.is_none());
    }

    #[test]
    fn create_sends_params_as_body() {
        let stub = StubTransport::new().respond(
            HttpMethod::Post,
            "/users/5/sign_on_tokens",
            201,
            json!({"token": "sso-2"}),
        );
        let mut params = Map::new();
        params.insert("redirect_to".to_string(), json!("/reviews"));
        let token = SignOnToken::create(&client(stub.clone()), 5, &params).unwrap();
        assert_eq!(token.token, "sso-2");

        let sent: Value = serde_json::from_str(stub.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, json!({"redirect_to": "/reviews"}));
    }

    #[test]
    fn repeated_create_issues_repeated_calls() {
        let stub = StubTransport::new().respond(
            HttpMethod::Post,
            "/users/5/sign_on_tokens",
            201,
            json!({"token": "sso"}),
        );
        let c = client(stub.clone());
        SignOnToken::create(&c, 5, &Map::new()).unwrap();
        SignOnToken::create(&c, 5, &Map::new()).unwrap();
        assert_eq!(stub.calls_to(HttpMethod::Post, "/users/5/sign_on_tokens"), 2);
    }
}
