use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

pub const APPLICATION_ID: &str = "foobar";
pub const APPLICATION_SECRET: &str = "bizbaz";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub franchisor_id: i64,
    pub franchisor_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Franchisor {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub accounts: Vec<Account>,
    pub franchisors: Vec<Franchisor>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub user: NewUser,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

struct Store {
    users: HashMap<i64, User>,
    /// access token secret -> user id
    tokens: HashMap<String, i64>,
    next_id: i64,
}

struct Inner {
    application_id: String,
    application_secret: String,
    store: RwLock<Store>,
    issued_access_tokens: AtomicUsize,
}

/// Shared state of the mock API. Cloning shares the same store.
#[derive(Clone)]
pub struct MockState {
    inner: Arc<Inner>,
}

impl MockState {
    /// State accepting the given application credentials, seeded with two
    /// users.
    pub fn new(application_id: &str, application_secret: &str) -> Self {
        let users = seed_users().into_iter().map(|u| (u.id, u)).collect();
        Self {
            inner: Arc::new(Inner {
                application_id: application_id.to_string(),
                application_secret: application_secret.to_string(),
                store: RwLock::new(Store {
                    users,
                    tokens: HashMap::new(),
                    next_id: 3,
                }),
                issued_access_tokens: AtomicUsize::new(0),
            }),
        }
    }

    /// Number of access tokens issued since start.
    pub fn issued_access_tokens(&self) -> usize {
        self.inner.issued_access_tokens.load(Ordering::SeqCst)
    }

    pub async fn active_tokens(&self) -> usize {
        self.inner.store.read().await.tokens.len()
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(APPLICATION_ID, APPLICATION_SECRET)
    }
}

fn seed_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            accounts: vec![Account {
                id: 100,
                name: "Acme Downtown".to_string(),
                franchisor_id: 9,
                franchisor_name: "Acme".to_string(),
            }],
            franchisors: vec![Franchisor {
                id: 9,
                name: "Acme".to_string(),
            }],
        },
        User {
            id: 2,
            email: "john@example.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Roe".to_string(),
            accounts: vec![Account {
                id: 101,
                name: "Zenith Uptown".to_string(),
                franchisor_id: 10,
                franchisor_name: "Zenith".to_string(),
            }],
            franchisors: Vec::new(),
        },
    ]
}

type Rejection = (StatusCode, Json<Value>);

fn reject(status: StatusCode, message: &str) -> Rejection {
    (status, Json(json!({ "error": message })))
}

pub fn app() -> Router {
    app_with_state(MockState::default())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/accessible_users", get(accessible_users))
        .route("/users", post(create_user))
        .route("/users/{id}/sign_on_tokens", post(create_sign_on_token))
        .route("/users/{id}/access_token", post(create_access_token))
        .route("/access_token", delete(destroy_access_token))
        .route("/account_ownerships", get(account_ownerships))
        .route("/franchisor_ownerships", get(franchisor_ownerships))
        .route("/dashboard", get(dashboard))
        .with_state(state)
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn require_application(state: &MockState, headers: &HeaderMap) -> Result<(), Rejection> {
    let id = header_value(headers, "x-application-id");
    let secret = header_value(headers, "x-application-secret");
    if id == Some(state.inner.application_id.as_str()) && secret == Some(state.inner.application_secret.as_str()) {
        return Ok(());
    }
    warn!("rejected application credentials");
    Err(reject(StatusCode::UNAUTHORIZED, "invalid application credentials"))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Resolve the bearer token to `(token, user_id)`.
async fn require_bearer(state: &MockState, headers: &HeaderMap) -> Result<(String, i64), Rejection> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "missing bearer token"))?;
    let store = state.inner.store.read().await;
    match store.tokens.get(token) {
        Some(user_id) => Ok((token.to_string(), *user_id)),
        None => {
            warn!("rejected unknown access token");
            Err(reject(StatusCode::UNAUTHORIZED, "invalid access token"))
        }
    }
}

async fn find_user(state: &MockState, id: i64) -> Result<User, Rejection> {
    let store = state.inner.store.read().await;
    store
        .users
        .get(&id)
        .cloned()
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "user not found"))
}

async fn accessible_users(State(state): State<MockState>, headers: HeaderMap) -> Result<Json<Value>, Rejection> {
    require_application(&state, &headers)?;
    let store = state.inner.store.read().await;
    let mut users: Vec<User> = store.users.values().cloned().collect();
    users.sort_by_key(|u| u.id);
    Ok(Json(json!({ "users": users })))
}

async fn create_user(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<Value>), Rejection> {
    require_application(&state, &headers)?;
    let mut store = state.inner.store.write().await;
    let user = User {
        id: store.next_id,
        email: input.user.email,
        first_name: input.user.first_name,
        last_name: input.user.last_name,
        accounts: Vec::new(),
        franchisors: Vec::new(),
    };
    store.next_id += 1;
    store.users.insert(user.id, user.clone());
    debug!(user_id = user.id, "created user");
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

async fn create_sign_on_token(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: String,
) -> Result<(StatusCode, Json<Value>), Rejection> {
    require_application(&state, &headers)?;
    if !body.trim().is_empty() {
        serde_json::from_str::<Value>(&body)
            .map_err(|_| reject(StatusCode::BAD_REQUEST, "params must be JSON"))?;
    }
    let user = find_user(&state, id).await?;
    let token = Uuid::new_v4().simple().to_string();
    debug!(user_id = user.id, "issued sign-on token");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "sign_on_token": {
                "token": token,
                "user_id": user.id,
                "expires_at": "2099-01-01T00:00:00Z",
                "url": format!("https://app.rallio.com/api/v1/sign_on_tokens/{token}"),
            }
        })),
    ))
}

async fn create_access_token(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Value>), Rejection> {
    require_application(&state, &headers)?;
    let user = find_user(&state, id).await?;
    let token = Uuid::new_v4().simple().to_string();
    state.inner.store.write().await.tokens.insert(token.clone(), user.id);
    state.inner.issued_access_tokens.fetch_add(1, Ordering::SeqCst);
    debug!(user_id = user.id, "issued access token");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "access_token": token,
            "user_id": user.id,
            "scopes": "user",
        })),
    ))
}

async fn destroy_access_token(State(state): State<MockState>, headers: HeaderMap) -> Result<StatusCode, Rejection> {
    let (token, user_id) = require_bearer(&state, &headers).await?;
    state.inner.store.write().await.tokens.remove(&token);
    debug!(user_id, "destroyed access token");
    Ok(StatusCode::NO_CONTENT)
}

async fn account_ownerships(State(state): State<MockState>, headers: HeaderMap) -> Result<Json<Value>, Rejection> {
    let (_, user_id) = require_bearer(&state, &headers).await?;
    let user = find_user(&state, user_id).await?;
    let ownerships: Vec<Value> = user
        .accounts
        .iter()
        .map(|a| {
            json!({
                "user_id": user.id,
                "account_id": a.id,
                "account_name": a.name,
                "account_franchisor_id": a.franchisor_id,
                "account_franchisor_name": a.franchisor_name,
            })
        })
        .collect();
    Ok(Json(Value::Array(ownerships)))
}

async fn franchisor_ownerships(State(state): State<MockState>, headers: HeaderMap) -> Result<Json<Value>, Rejection> {
    let (_, user_id) = require_bearer(&state, &headers).await?;
    let user = find_user(&state, user_id).await?;
    let ownerships: Vec<Value> = user
        .franchisors
        .iter()
        .map(|f| {
            json!({
                "user_id": user.id,
                "franchisor_id": f.id,
                "franchisor_name": f.name,
            })
        })
        .collect();
    Ok(Json(Value::Array(ownerships)))
}

async fn dashboard(State(state): State<MockState>, headers: HeaderMap) -> Result<Json<Value>, Rejection> {
    let (_, user_id) = require_bearer(&state, &headers).await?;
    let user = find_user(&state, user_id).await?;
    Ok(Json(json!({
        "me": {
            "id": user.id,
            "email": user.email,
            "first_name": user.first_name,
            "last_name": user.last_name,
            "name": format!("{} {}", user.first_name, user.last_name),
        },
        "accounts": user.accounts,
        "franchisors": user.franchisors,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_nested_collections() {
        let user = &seed_users()[0];
        let json = serde_json::to_value(user).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["accounts"][0]["name"], "Acme Downtown");
        assert_eq!(json["franchisors"][0]["id"], 9);
    }

    #[test]
    fn create_user_requires_user_key() {
        let result: Result<CreateUser, _> = serde_json::from_str(r#"{"email":"a@b.com"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_user_defaults_names() {
        let input: CreateUser = serde_json::from_str(r#"{"user":{"email":"a@b.com"}}"#).unwrap();
        assert_eq!(input.user.email, "a@b.com");
        assert_eq!(input.user.first_name, "");
    }

    #[test]
    fn application_credentials_must_match() {
        let state = MockState::default();
        let mut headers = HeaderMap::new();
        headers.insert("x-application-id", APPLICATION_ID.parse().unwrap());
        assert!(require_application(&state, &headers).is_err());

        headers.insert("x-application-secret", APPLICATION_SECRET.parse().unwrap());
        assert!(require_application(&state, &headers).is_ok());

        headers.insert("x-application-secret", "wrong".parse().unwrap());
        assert!(require_application(&state, &headers).is_err());
    }

    #[tokio::test]
    async fn unknown_bearer_token_is_rejected() {
        let state = MockState::default();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer nope".parse().unwrap());
        let (status, _) = require_bearer(&state, &headers).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
