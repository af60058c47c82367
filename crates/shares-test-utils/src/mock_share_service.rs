//! Configurable in-process mock of the share service v2 API.
//!
//! The mock keeps resources in memory and walks each one through a
//! configurable status script: successive GETs observe successive script
//! entries, and the final entry repeats forever. That is enough to
//! exercise the client's waiters against `creating` → `available`
//! transitions, `error` fast-fail paths, and deletion polls without a
//! real backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use shares_test_utils::{MockShareService, TestShareServer};
//!
//! let service = MockShareService::builder()
//!     .share_status_script(["creating", "creating", "available"])
//!     .build();
//! let server = TestShareServer::spawn(service).await?;
//! // point a SharesClient at server.url() ...
//! ```

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Correlation header the real service stamps on every response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Microversion header the client injects on every request.
pub const API_MICROVERSION_HEADER: &str = "x-shares-api-version";

/// Experimental-API header.
pub const API_EXPERIMENTAL_HEADER: &str = "x-shares-api-experimental";

/// One mocked resource: its representation plus remaining status script.
#[derive(Debug, Clone)]
struct MockResource {
    body: Value,
    script: VecDeque<String>,
}

impl MockResource {
    fn new(body: Value, script: &[String]) -> Self {
        Self {
            body,
            script: script.iter().cloned().collect(),
        }
    }

    /// Status visible to the next observer; advances the script unless
    /// only the terminal entry remains.
    fn observe_status(&mut self) -> String {
        let status = self
            .script
            .front()
            .cloned()
            .unwrap_or_else(|| "available".to_string());
        if self.script.len() > 1 {
            self.script.pop_front();
        }
        status
    }

    fn pin_status(&mut self, status: &str) {
        self.script = VecDeque::from([status.to_string()]);
    }

    fn rendered(&mut self) -> Value {
        let status = self.observe_status();
        let mut body = self.body.clone();
        body["status"] = json!(status);
        body
    }
}

/// Shared mutable state behind the mock routes.
#[derive(Debug)]
struct ServiceState {
    emit_request_id: bool,
    share_script: Vec<String>,
    snapshot_script: Vec<String>,
    shares: HashMap<String, MockResource>,
    snapshots: HashMap<String, MockResource>,
    access_rules: HashMap<String, Vec<Value>>,
    /// Headers seen on the most recent request, for envelope assertions.
    last_microversion: Option<String>,
    last_experimental: Option<String>,
}

type SharedState = Arc<Mutex<ServiceState>>;

/// Builder-configured mock share service.
#[derive(Debug)]
pub struct MockShareService {
    state: SharedState,
}

impl MockShareService {
    pub fn builder() -> MockShareServiceBuilder {
        MockShareServiceBuilder::default()
    }

    /// Mock where every resource is immediately `available`.
    pub fn available() -> Self {
        Self::builder().build()
    }

    pub(crate) fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Microversion header observed on the most recent request.
    pub fn last_microversion(&self) -> Option<String> {
        self.state.lock().unwrap().last_microversion.clone()
    }

    /// Experimental header observed on the most recent request.
    pub fn last_experimental(&self) -> Option<String> {
        self.state.lock().unwrap().last_experimental.clone()
    }

    /// Number of live (not yet deleted) shares.
    pub fn live_shares(&self) -> usize {
        self.state.lock().unwrap().shares.len()
    }

    /// Build the axum router serving the mock API.
    pub fn router(&self) -> Router {
        let state = self.state();
        Router::new()
            .route("/", get(discover_versions))
            .nest(
                "/v2",
                Router::new()
                    .route("/shares", post(create_share).get(list_shares))
                    .route("/shares/detail", get(list_shares))
                    .route("/shares/:id", get(get_share).delete(delete_share))
                    .route("/shares/:id/action", post(share_action))
                    .route("/share-access-rules", get(list_access_rules))
                    .route("/snapshots", post(create_snapshot))
                    .route("/snapshots/detail", get(list_snapshots))
                    .route("/snapshots/:id", get(get_snapshot).delete(delete_snapshot))
                    .route("/snapshots/:id/action", post(snapshot_action)),
            )
            .with_state(state)
    }
}

/// Builder for [`MockShareService`].
#[derive(Debug)]
pub struct MockShareServiceBuilder {
    emit_request_id: bool,
    share_script: Vec<String>,
    snapshot_script: Vec<String>,
}

impl Default for MockShareServiceBuilder {
    fn default() -> Self {
        Self {
            emit_request_id: true,
            share_script: vec!["available".to_string()],
            snapshot_script: vec!["available".to_string()],
        }
    }
}

impl MockShareServiceBuilder {
    /// Statuses successive GETs observe on every share; the final entry
    /// repeats forever.
    pub fn share_status_script<I, S>(mut self, script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.share_script = script.into_iter().map(Into::into).collect();
        self
    }

    /// Statuses successive GETs observe on every snapshot.
    pub fn snapshot_status_script<I, S>(mut self, script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.snapshot_script = script.into_iter().map(Into::into).collect();
        self
    }

    /// Drop the correlation header from every response, to exercise the
    /// client's envelope validation.
    pub fn without_request_id(mut self) -> Self {
        self.emit_request_id = false;
        self
    }

    pub fn build(self) -> MockShareService {
        MockShareService {
            state: Arc::new(Mutex::new(ServiceState {
                emit_request_id: self.emit_request_id,
                share_script: self.share_script,
                snapshot_script: self.snapshot_script,
                shares: HashMap::new(),
                snapshots: HashMap::new(),
                access_rules: HashMap::new(),
                last_microversion: None,
                last_experimental: None,
            })),
        }
    }
}

fn record_headers(state: &mut ServiceState, headers: &HeaderMap) {
    state.last_microversion = headers
        .get(API_MICROVERSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.last_experimental = headers
        .get(API_EXPERIMENTAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
}

fn respond(state: &ServiceState, status: StatusCode, body: Value) -> Response {
    let mut response = (status, Json(body)).into_response();
    if state.emit_request_id {
        let request_id = Uuid::new_v4().to_string();
        if let Ok(value) = request_id.parse() {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
    }
    response
}

async fn discover_versions(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);
    let body = json!({
        "versions": [{
            "id": "v2.0",
            "status": "CURRENT",
            "version": "2.55",
            "min_version": "2.0",
        }]
    });
    respond(&state, StatusCode::OK, body)
}

async fn create_share(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);

    let id = Uuid::new_v4().to_string();
    let request = payload.get("share").cloned().unwrap_or_else(|| json!({}));
    let body = json!({
        "id": id,
        "name": request.get("name").cloned().unwrap_or(Value::Null),
        "description": request.get("description").cloned().unwrap_or(Value::Null),
        "share_proto": request.get("share_proto").cloned().unwrap_or(Value::Null),
        "size": request.get("size").cloned().unwrap_or(Value::Null),
        "metadata": request.get("metadata").cloned().unwrap_or_else(|| json!({})),
        "share_group_id": request.get("share_group_id").cloned().unwrap_or(Value::Null),
        "status": "creating",
    });
    let script = state.share_script.clone();
    // The create response reports the first scripted status without
    // consuming it; only GETs advance the script.
    let mut rendered = body.clone();
    rendered["status"] = json!(script.first().cloned().unwrap_or_else(|| "creating".to_string()));
    state.shares.insert(id, MockResource::new(body, &script));
    respond(&state, StatusCode::OK, json!({ "share": rendered }))
}

async fn get_share(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);
    match state.shares.get_mut(&id) {
        Some(resource) => {
            let body = resource.rendered();
            respond(&state, StatusCode::OK, json!({ "share": body }))
        }
        None => respond(
            &state,
            StatusCode::NOT_FOUND,
            json!({ "itemNotFound": { "message": format!("share {id} could not be found") } }),
        ),
    }
}

async fn list_shares(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);
    let shares: Vec<Value> = state
        .shares
        .values_mut()
        .map(MockResource::rendered)
        .collect();
    respond(&state, StatusCode::OK, json!({ "shares": shares }))
}

async fn delete_share(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);
    if state.shares.remove(&id).is_none() {
        return respond(
            &state,
            StatusCode::NOT_FOUND,
            json!({ "itemNotFound": { "message": format!("share {id} could not be found") } }),
        );
    }
    state.access_rules.remove(&id);
    respond(&state, StatusCode::ACCEPTED, json!({}))
}

async fn share_action(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);

    if !state.shares.contains_key(&id) {
        return respond(
            &state,
            StatusCode::NOT_FOUND,
            json!({ "itemNotFound": { "message": format!("share {id} could not be found") } }),
        );
    }

    let action = payload
        .as_object()
        .and_then(|object| object.keys().next().cloned())
        .unwrap_or_default();
    let action = action.trim_start_matches("os-").to_string();
    let body = payload.get(action.as_str()).or_else(|| payload.get(format!("os-{action}").as_str()));

    match action.as_str() {
        "reset_status" => {
            let status = body
                .and_then(|value| value.get("status"))
                .and_then(Value::as_str)
                .unwrap_or("error")
                .to_string();
            if let Some(resource) = state.shares.get_mut(&id) {
                resource.pin_status(&status);
            }
            respond(&state, StatusCode::ACCEPTED, json!({}))
        }
        "force_delete" => {
            state.shares.remove(&id);
            state.access_rules.remove(&id);
            respond(&state, StatusCode::ACCEPTED, json!({}))
        }
        "extend" | "shrink" => {
            let new_size = body.and_then(|value| value.get("new_size")).cloned();
            if let (Some(resource), Some(size)) = (state.shares.get_mut(&id), new_size) {
                resource.body["size"] = size;
            }
            respond(&state, StatusCode::ACCEPTED, json!({}))
        }
        "allow_access" => {
            let rule = json!({
                "id": Uuid::new_v4().to_string(),
                "access_type": body.and_then(|b| b.get("access_type")).cloned().unwrap_or(Value::Null),
                "access_to": body.and_then(|b| b.get("access_to")).cloned().unwrap_or(Value::Null),
                "access_level": body.and_then(|b| b.get("access_level")).cloned().unwrap_or(Value::Null),
                "state": "active",
            });
            state.access_rules.entry(id).or_default().push(rule.clone());
            respond(&state, StatusCode::OK, json!({ "access": rule }))
        }
        "deny_access" => {
            let rule_id = body
                .and_then(|value| value.get("access_id"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if let Some(rules) = state.access_rules.get_mut(&id) {
                rules.retain(|rule| rule["id"] != json!(rule_id));
            }
            respond(&state, StatusCode::ACCEPTED, json!({}))
        }
        "access_list" => {
            let rules = state.access_rules.get(&id).cloned().unwrap_or_default();
            respond(&state, StatusCode::OK, json!({ "access_list": rules }))
        }
        _ => respond(
            &state,
            StatusCode::BAD_REQUEST,
            json!({ "badRequest": { "message": format!("unsupported action {action}") } }),
        ),
    }
}

async fn list_access_rules(
    State(state): State<SharedState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);
    let share_id = query.get("share_id").cloned().unwrap_or_default();
    let rules = state.access_rules.get(&share_id).cloned().unwrap_or_default();
    respond(&state, StatusCode::OK, json!({ "access_list": rules }))
}

async fn create_snapshot(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);

    let request = payload.get("snapshot").cloned().unwrap_or_else(|| json!({}));
    let share_id = request
        .get("share_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if !state.shares.contains_key(&share_id) {
        return respond(
            &state,
            StatusCode::NOT_FOUND,
            json!({ "itemNotFound": { "message": format!("share {share_id} could not be found") } }),
        );
    }

    let id = Uuid::new_v4().to_string();
    let body = json!({
        "id": id,
        "share_id": share_id,
        "name": request.get("name").cloned().unwrap_or(Value::Null),
        "description": request.get("description").cloned().unwrap_or(Value::Null),
        "status": "creating",
    });
    let script = state.snapshot_script.clone();
    let mut rendered = body.clone();
    rendered["status"] = json!(script.first().cloned().unwrap_or_else(|| "creating".to_string()));
    state.snapshots.insert(id, MockResource::new(body, &script));
    respond(&state, StatusCode::ACCEPTED, json!({ "snapshot": rendered }))
}

async fn get_snapshot(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);
    match state.snapshots.get_mut(&id) {
        Some(resource) => {
            let body = resource.rendered();
            respond(&state, StatusCode::OK, json!({ "snapshot": body }))
        }
        None => respond(
            &state,
            StatusCode::NOT_FOUND,
            json!({ "itemNotFound": { "message": format!("snapshot {id} could not be found") } }),
        ),
    }
}

async fn list_snapshots(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);
    let snapshots: Vec<Value> = state
        .snapshots
        .values_mut()
        .map(MockResource::rendered)
        .collect();
    respond(&state, StatusCode::OK, json!({ "snapshots": snapshots }))
}

async fn delete_snapshot(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);
    if state.snapshots.remove(&id).is_none() {
        return respond(
            &state,
            StatusCode::NOT_FOUND,
            json!({ "itemNotFound": { "message": format!("snapshot {id} could not be found") } }),
        );
    }
    respond(&state, StatusCode::ACCEPTED, json!({}))
}

async fn snapshot_action(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    record_headers(&mut state, &headers);

    if !state.snapshots.contains_key(&id) {
        return respond(
            &state,
            StatusCode::NOT_FOUND,
            json!({ "itemNotFound": { "message": format!("snapshot {id} could not be found") } }),
        );
    }

    let action = payload
        .as_object()
        .and_then(|object| object.keys().next().cloned())
        .unwrap_or_default();
    let body = payload.get(action.as_str()).cloned();
    let action = action.trim_start_matches("os-").to_string();

    match action.as_str() {
        "reset_status" => {
            let status = body
                .as_ref()
                .and_then(|value| value.get("status"))
                .and_then(Value::as_str)
                .unwrap_or("error")
                .to_string();
            if let Some(resource) = state.snapshots.get_mut(&id) {
                resource.pin_status(&status);
            }
            respond(&state, StatusCode::ACCEPTED, json!({}))
        }
        "force_delete" => {
            state.snapshots.remove(&id);
            respond(&state, StatusCode::ACCEPTED, json!({}))
        }
        _ => respond(
            &state,
            StatusCode::BAD_REQUEST,
            json!({ "badRequest": { "message": format!("unsupported action {action}") } }),
        ),
    }
}
