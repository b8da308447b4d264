//! Request building, dispatch and response parsing for the Rallio API.
//!
//! # Design
//! `RallioClient` holds the configuration and a shared `Transport`. Each
//! call is split the same way: `build` turns an `Endpoint` into an
//! `HttpRequest` (headers chosen by the endpoint's credential class),
//! the transport executes it, and `parse` turns the `HttpResponse` into a
//! `serde_json::Value` for hydration. `build` and `parse` are pure, so they
//! can be exercised without any transport at all.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::credentials::{application_headers, bearer_headers, CredentialClass};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

#[derive(Clone)]
pub struct RallioClient {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl RallioClient {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Client talking HTTP through a blocking ureq agent.
    pub fn with_ureq(config: Config) -> Self {
        Self::new(config, Arc::new(UreqTransport::new()))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the request for `endpoint`.
    ///
    /// `bearer` is only consulted for bearer-class endpoints; application
    /// endpoints always use the configured id/secret.
    pub fn build(
        &self,
        endpoint: Endpoint,
        bearer: Option<&str>,
        body: Option<&Value>,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = match endpoint.credential_class() {
            CredentialClass::Application => application_headers(&self.config)?,
            CredentialClass::Bearer => {
                let token = bearer.ok_or_else(|| {
                    ApiError::MissingCredential(format!("{} requires an access token", endpoint.name()))
                })?;
                bearer_headers(token)?
            }
        };

        let body = match body {
            Some(value) => {
                let encoded =
                    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))?;
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Some(encoded)
            }
            None => None,
        };

        Ok(HttpRequest {
            method: endpoint.method(),
            path: format!("{}{}", self.config.base_url, endpoint.path()),
            headers,
            body,
        })
    }

    /// Check the status and decode the body. An empty body parses as `null`.
    pub fn parse(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    /// Build and execute one call, checking the status but leaving the body
    /// undecoded.
    pub fn send(
        &self,
        endpoint: Endpoint,
        bearer: Option<&str>,
        body: Option<&Value>,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build(endpoint, bearer, body)?;
        debug!(
            endpoint = endpoint.name(),
            method = request.method.as_str(),
            path = %request.path,
            credentials = endpoint.credential_class().as_str(),
            "dispatching request"
        );
        let response = self.transport.execute(request)?;
        debug!(endpoint = endpoint.name(), status = response.status, "received response");
        check_status(&response)?;
        Ok(response)
    }

    /// Build, execute and parse one call.
    pub fn call(
        &self,
        endpoint: Endpoint,
        bearer: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let response = self.send(endpoint, bearer, body)?;
        decode(&response)
    }
}

impl fmt::Debug for RallioClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RallioClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Map non-2xx status codes to `ApiError::Transport`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Transport {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode(response: &HttpResponse) -> Result<Value, ApiError> {
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
