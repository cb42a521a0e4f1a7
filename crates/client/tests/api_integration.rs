use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use hivemon_client::editor::{RuleDraft, SubmitError};
use hivemon_client::registry::{spawn_refresh, AlertRegistry};
use hivemon_client::{ApiClient, ApiError};
use hivemon_common::codec;
use hivemon_common::condition::ConditionField;
use hivemon_common::rule::RuleStatus;

const TOKEN: &str = "test-session-token";

#[derive(Clone, Default)]
struct AppState {
    inner: Arc<Mutex<Store>>,
}

#[derive(Default)]
struct Store {
    next_id: u64,
    alerts: Vec<Value>,
}

impl AppState {
    fn seed_alert(&self, record: Value) {
        self.inner.lock().unwrap().alerts.push(record);
    }

    fn alert_count(&self) -> usize {
        self.inner.lock().unwrap().alerts.len()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response()
}

async fn list_alerts(State(s): State<AppState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let store = s.inner.lock().unwrap();
    Json(Value::Array(store.alerts.clone())).into_response()
}

async fn create_alert(
    State(s): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if body["hiveId"] == "missing" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Hive not found"})),
        )
            .into_response();
    }
    let mut store = s.inner.lock().unwrap();
    store.next_id += 1;
    let record = json!({
        "id": store.next_id.to_string(),
        "name": body["name"],
        "hiveId": body["hiveId"],
        "hiveName": "North field",
        "triggerConditions": body["triggerConditions"],
        "isTriggered": false,
        "createdAt": "2026-05-01T10:00:00",
    });
    store.alerts.push(record.clone());
    Json(record).into_response()
}

async fn get_alert(
    Path(id): Path<String>,
    State(s): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let store = s.inner.lock().unwrap();
    match store.alerts.iter().find(|a| a["id"] == id.as_str()) {
        Some(a) => Json(a.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_alert(
    Path(id): Path<String>,
    State(s): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut store = s.inner.lock().unwrap();
    match store.alerts.iter_mut().find(|a| a["id"] == id.as_str()) {
        Some(a) => {
            a["name"] = body["name"].clone();
            a["triggerConditions"] = body["triggerConditions"].clone();
            Json(a.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_alert(
    Path(id): Path<String>,
    State(s): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut store = s.inner.lock().unwrap();
    let before = store.alerts.len();
    store.alerts.retain(|a| a["id"] != id.as_str());
    if store.alerts.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn reset_alert(
    Path(id): Path<String>,
    State(s): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut store = s.inner.lock().unwrap();
    match store.alerts.iter_mut().find(|a| a["id"] == id.as_str()) {
        Some(a) => {
            a["isTriggered"] = json!(false);
            Json(a.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn list_hives(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        {"id": 1, "name": "Hive A", "location": "Orchard"},
        {"id": 2, "name": "Hive B", "location": "Meadow"},
    ]))
    .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Alert not found"})),
    )
        .into_response()
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/alerts", get(list_alerts).post(create_alert))
        .route(
            "/api/alerts/:id",
            get(get_alert).put(update_alert).delete(delete_alert),
        )
        .route("/api/alerts/:id/reset", post(reset_alert))
        .route("/api/hives", get(list_hives))
        .with_state(state)
}

async fn serve(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str) -> ApiClient {
    ApiClient::new(base, Some(TOKEN.to_string()))
}

fn triggered_record(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "hiveId": "h1",
        "hiveName": "North field",
        "triggerConditions": "[{\"parameter\":\"temperature\",\"operator\":\">\",\"value\":38}]",
        "isTriggered": true,
        "createdAt": "2026-05-01T10:00:00",
    })
}

#[tokio::test]
async fn create_overheat_rule_round_trips() {
    let state = AppState::default();
    let base = serve(state.clone()).await;
    let api = client(&base);

    let mut draft = RuleDraft::for_create();
    draft.set_name("Overheat");
    draft.set_hive("H1");
    draft.update_condition(0, ConditionField::Parameter, "temperature");
    draft.update_condition(0, ConditionField::Value, "38");

    let created = draft.submit(&api).await.unwrap();
    assert_eq!(created.name, "Overheat");
    assert_eq!(created.hive_id, "H1");
    assert_eq!(created.status(), RuleStatus::Normal);

    // the wire string the server stored decodes back to exactly one condition
    let stored = state.inner.lock().unwrap().alerts[0]["triggerConditions"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(
        stored,
        r#"[{"parameter":"temperature","operator":">","value":38}]"#
    );
    let decoded = codec::decode(Some(stored.as_str()));
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded.get(0).unwrap().parameter, "temperature");

    let listed = api.list_alerts().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].hive_name, "North field");
}

#[tokio::test]
async fn edit_keeps_hive_and_updates_conditions() {
    let state = AppState::default();
    state.seed_alert(triggered_record("a1", "Overheat"));
    let base = serve(state).await;
    let api = client(&base);

    let record = api.get_alert("a1").await.unwrap();
    let mut draft = RuleDraft::for_edit(&record);
    assert!(!draft.set_hive("h2"));
    draft.set_name("Overheat (day)");
    draft.update_condition(0, ConditionField::Value, "40");

    let updated = draft.submit(&api).await.unwrap();
    assert_eq!(updated.name, "Overheat (day)");
    assert_eq!(updated.hive_id, "h1");
    assert!(updated
        .trigger_conditions
        .as_deref()
        .unwrap()
        .contains("40"));
}

#[tokio::test]
async fn reset_refetches_authoritative_status() {
    let state = AppState::default();
    state.seed_alert(triggered_record("a1", "Overheat"));
    let base = serve(state).await;

    let mut registry = AlertRegistry::new(client(&base));
    registry.refresh().await;
    assert_eq!(registry.rules()[0].status(), RuleStatus::Triggered);

    registry.reset("a1").await.unwrap();
    assert_eq!(registry.rules()[0].status(), RuleStatus::Normal);
}

#[tokio::test]
async fn remove_failure_leaves_list_unchanged() {
    let state = AppState::default();
    state.seed_alert(triggered_record("a1", "Overheat"));
    let base = serve(state).await;

    let mut registry = AlertRegistry::new(client(&base));
    registry.refresh().await;
    assert_eq!(registry.rules().len(), 1);

    let err = registry.remove("ghost").await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 404, .. }));
    assert_eq!(registry.rules().len(), 1);

    registry.remove("a1").await.unwrap();
    assert!(registry.rules().is_empty());
}

#[tokio::test]
async fn rejection_message_surfaced_verbatim_and_draft_preserved() {
    let base = serve(AppState::default()).await;
    let api = client(&base);

    let mut draft = RuleDraft::for_create();
    draft.set_name("Overheat");
    draft.set_hive("missing");
    draft.update_condition(0, ConditionField::Parameter, "temperature");
    draft.update_condition(0, ConditionField::Value, "38");

    match draft.submit(&api).await {
        Err(SubmitError::Api(ApiError::Rejected { status, message })) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Hive not found");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(draft.last_error(), Some("Hive not found"));
    assert_eq!(draft.name(), "Overheat");
    assert_eq!(draft.conditions().get(0).unwrap().value, "38");
}

#[tokio::test]
async fn bad_token_maps_to_unauthorized() {
    let base = serve(AppState::default()).await;
    let api = ApiClient::new(&base, Some("stale-token".into()));
    assert!(matches!(
        api.list_alerts().await,
        Err(ApiError::Unauthorized)
    ));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    // bind then drop to find a port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(&format!("http://{addr}"), Some(TOKEN.to_string()));
    assert!(matches!(
        api.list_alerts().await,
        Err(ApiError::Transport(_))
    ));
}

#[tokio::test]
async fn registry_presents_empty_list_on_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut registry = AlertRegistry::new(ApiClient::new(
        &format!("http://{addr}"),
        Some(TOKEN.to_string()),
    ));
    registry.refresh().await;
    assert!(registry.rules().is_empty());

    // same for a missing credential: no data, no propagated error
    let mut registry = AlertRegistry::new(ApiClient::new("http://127.0.0.1:1", None));
    registry.refresh().await;
    assert!(registry.rules().is_empty());
}

#[tokio::test]
async fn periodic_refresh_applies_then_stops_after_abort() {
    let state = AppState::default();
    state.seed_alert(triggered_record("a1", "Overheat"));
    let base = serve(state.clone()).await;

    let registry = Arc::new(tokio::sync::Mutex::new(AlertRegistry::new(client(&base))));
    let handle = spawn_refresh(registry.clone(), Duration::from_millis(40));

    let mut seen = 0;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        seen = registry.lock().await.rules().len();
        if seen == 1 {
            break;
        }
    }
    assert_eq!(seen, 1);

    handle.abort();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(handle.is_finished());

    // new data after teardown must never be applied
    state.seed_alert(triggered_record("a2", "Damp"));
    assert_eq!(state.alert_count(), 2);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(registry.lock().await.rules().len(), 1);
}

#[tokio::test]
async fn hive_selector_data() {
    let base = serve(AppState::default()).await;
    let hives = client(&base).list_hives().await.unwrap();
    assert_eq!(hives.len(), 2);
    assert_eq!(hives[0].id, "1");
    assert_eq!(hives[0].selector_label(), "Hive A (Orchard)");
}
