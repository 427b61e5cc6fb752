//! HTTP collaborator: every request that needs storage opens its own scope.
//!
//! ```text
//! GET  /user/:user_id   per-request MainDB + Cache scope
//! POST /test            request validation demo
//! ```

use crate::acquire_strategy;
use crate::database::{Faults, SimulatedDatabase};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::FutureExt;
use rescope_config::Settings;
use rescope_core::{Error, CACHE_RESOURCE, MAIN_DB_RESOURCE};
use rescope_scope::{AcquireStrategy, ScopeError, ScopedResourceGroup};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Router state shared by every handler
///
/// Cheap to clone; the fault table is reference counted.
#[derive(Clone)]
pub struct AppState {
    latency: Duration,
    open_timeout: Option<Duration>,
    acquire: AcquireStrategy,
    faults: Arc<HashMap<String, Faults>>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            latency: settings.latency,
            open_timeout: settings.open_timeout,
            acquire: acquire_strategy(settings.acquire),
            faults: Arc::default(),
        }
    }

    /// Inject failures into the resource registered under `key`
    #[must_use]
    pub fn with_faults(mut self, key: &str, faults: Faults) -> Self {
        Arc::make_mut(&mut self.faults).insert(key.to_string(), faults);
        self
    }

    fn database(&self, key: &str, display_name: &str) -> SimulatedDatabase {
        let faults = self.faults.get(key).copied().unwrap_or_default();
        SimulatedDatabase::new(display_name, self.latency).with_faults(faults)
    }

    /// The resources a `/user` request works with
    fn user_scope(&self) -> ScopedResourceGroup<SimulatedDatabase, Error> {
        let mut group = ScopedResourceGroup::new()
            .resource(self.database(MAIN_DB_RESOURCE, "MainDB").into_spec(MAIN_DB_RESOURCE))
            .resource(self.database(CACHE_RESOURCE, "Cache").into_spec(CACHE_RESOURCE))
            .acquire(self.acquire);
        if let Some(after) = self.open_timeout {
            group = group.open_timeout(after);
        }
        group
    }
}

/// Error payload shared by every failing route
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub msg: String,
    pub data: Value,
}

/// Failing responses carry their [`ErrorBody`] under `detail`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub detail: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: i64,
    pub cache: String,
    pub database: String,
}

#[derive(Debug, Deserialize)]
pub struct GreetingRequest {
    name: String,
    age: i64,
}

#[derive(Debug, Serialize)]
struct GreetingResponse {
    message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/user/:user_id", get(get_user))
        .route("/test", post(greet))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /user/:user_id
///
/// The scope runs on its own task so a client hanging up mid-request cannot
/// interrupt teardown.
async fn get_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> Response {
    let result = state
        .user_scope()
        .spawn(move |res| {
            async move {
                let cache = res[CACHE_RESOURCE]
                    .query(&format!("GET user:{user_id}"))
                    .await?;
                let database = res[MAIN_DB_RESOURCE]
                    .query(&format!("SELECT * FROM users WHERE id={user_id}"))
                    .await?;
                Ok(UserResponse {
                    user_id,
                    cache,
                    database,
                })
            }
            .boxed()
        })
        .await;

    match result {
        Ok(user) => Json(user).into_response(),
        Err(err) => scope_error_response(&err),
    }
}

/// POST /test
async fn greet(Json(request): Json<GreetingRequest>) -> Response {
    if request.name != "John" {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Name must be John",
            json!({ "test": "test11111" }),
        );
    }
    Json(GreetingResponse {
        message: format!(
            "Hello, {}! You are {} years old.",
            request.name, request.age
        ),
    })
    .into_response()
}

fn scope_error_response(err: &ScopeError<Error>) -> Response {
    let (status, data) = match err {
        ScopeError::Acquisition { name, .. } | ScopeError::OpenTimedOut { name, .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "resource": name.as_str() }),
        ),
        ScopeError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, json!({})),
        ScopeError::Teardown(failures) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "resources": failures.names().collect::<Vec<_>>() }),
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, json!({})),
    };
    warn!(status = %status, error = %err, "user request failed");
    error_response(status, err.to_string(), data)
}

fn error_response(status: StatusCode, msg: impl Into<String>, data: Value) -> Response {
    let detail = ErrorBody {
        msg: msg.into(),
        data,
    };
    (status, Json(ErrorEnvelope { detail })).into_response()
}
