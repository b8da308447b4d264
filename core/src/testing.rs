//! Recording stub transport shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::Value;

use crate::client::RallioClient;
use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

pub const BASE_URL: &str = "http://rallio.test";

pub fn client(stub: Arc<StubTransport>) -> RallioClient {
    RallioClient::new(Config::new(BASE_URL).with_application("foobar", "bizbaz"), stub)
}

/// Answers requests from canned responses keyed by method and path and
/// records everything it receives. Unknown routes answer 404.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<(HttpMethod, String), (u16, String)>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(self: Arc<Self>, method: HttpMethod, path: &str, status: u16, body: Value) -> Arc<Self> {
        let body = if body.is_null() { String::new() } else { body.to_string() };
        self.respond_raw(method, path, status, &body)
    }

    /// Answer with `body` verbatim, JSON or not.
    pub fn respond_raw(self: Arc<Self>, method: HttpMethod, path: &str, status: u16, body: &str) -> Arc<Self> {
        self.routes
            .lock()
            .unwrap()
            .insert((method, format!("{BASE_URL}{path}")), (status, body.to_string()));
        self
    }

    /// Sleep inside every exchange, widening race windows.
    pub fn with_delay(self: Arc<Self>, delay: Duration) -> Arc<Self> {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: HttpMethod, path: &str) -> usize {
        let url = format!("{BASE_URL}{path}");
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == url)
            .count()
    }
}

impl Transport for StubTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        let (status, body) = self
            .routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or((404, r#"{"error":"no route"}"#.to_string()));
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}
