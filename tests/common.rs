#![allow(dead_code)]

//! In-process stand-in for the FitTrack backend.
//!
//! Serves the `/api/v1` surface on an ephemeral port with the real response
//! envelope, counts every token refresh and rejected bearer, and exposes
//! switches for the failure modes the client has to survive: expired access
//! tokens, rejected refresh tokens, rotation, and a refresh that can be held
//! open while concurrent requests pile up.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use fittrack::ApiClient;
use fittrack::domain::log::DailyLogDraft;
use fittrack::domain::{days_ago, today_utc};
use fittrack::services::ServiceContainer;
use fittrack::storage::TokenStore;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Once};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Month};
use tokio::net::TcpListener;
use tokio::sync::watch;
use uuid::Uuid;

pub const EMAIL: &str = "ben@example.com";
pub const PASSWORD: &str = "Str0ng!pass";
pub const GOOGLE_TOKEN: &str = "good-google-token";
pub const CALORIE_TARGET: u32 = 2200;
pub const PROTEIN_TARGET: u32 = 140;

const USER_ID: &str = "7f1fd486-5b8a-4d8e-9ef0-08c93e64f0e1";
const TIMESTAMP: &str = "2025-03-09T12:00:00Z";
const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("fittrack=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

/// The stub server plus its observable state.
pub struct TestApp {
    pub api_base: String,
    pub state: StubState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        setup_tracing();
        let state = StubState::new();
        let router = router(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Self { api_base: format!("http://{addr}/api/v1"), state }
    }

    /// A client with a throwaway in-memory token store.
    pub fn client(&self) -> ApiClient {
        ApiClient::with_store(self.api_base.clone(), TokenStore::in_memory())
    }

    pub fn client_with_store(&self, store: TokenStore) -> ApiClient {
        ApiClient::with_store(self.api_base.clone(), store)
    }
}

/// Builds a signed-in client and service set against the stub account.
pub async fn sign_in(app: &TestApp) -> (ApiClient, ServiceContainer) {
    let client = app.client();
    let services = ServiceContainer::new(&client);
    services.session.login(EMAIL, PASSWORD).await.expect("login against the stub failed");
    (client, services)
}

/// A log draft that hits both targets.
pub fn draft(weight: f64, calories: u32, protein: u32) -> DailyLogDraft {
    DailyLogDraft {
        weight,
        calories,
        protein,
        steps: 8000,
        water: 2.0,
        sleep: 7.5,
        workout: false,
        cardio: false,
        carbs: None,
        fats: None,
        fruit: true,
    }
}

#[derive(Clone)]
pub struct StubState {
    inner: Arc<StubInner>,
}

struct StubInner {
    // An access token is "access-{n}" and valid only while n matches.
    generation: AtomicU64,
    refresh_calls: AtomicU64,
    rejected_calls: AtomicU64,
    logout_calls: AtomicU64,
    fail_refresh: AtomicBool,
    rotate_refresh: AtomicBool,
    reject_all_access: AtomicBool,
    fail_logout: AtomicBool,
    fail_alerts: AtomicBool,
    measurement_warning: AtomicBool,
    // false = refresh requests block until release_refresh().
    refresh_gate: watch::Sender<bool>,
    user: Mutex<Value>,
    targets: Mutex<Option<Value>>,
    logs: Mutex<BTreeMap<String, Value>>,
    measurements: Mutex<Vec<Value>>,
}

impl StubState {
    pub fn new() -> Self {
        let (refresh_gate, _) = watch::channel(true);
        Self {
            inner: Arc::new(StubInner {
                generation: AtomicU64::new(0),
                refresh_calls: AtomicU64::new(0),
                rejected_calls: AtomicU64::new(0),
                logout_calls: AtomicU64::new(0),
                fail_refresh: AtomicBool::new(false),
                rotate_refresh: AtomicBool::new(false),
                reject_all_access: AtomicBool::new(false),
                fail_logout: AtomicBool::new(false),
                fail_alerts: AtomicBool::new(false),
                measurement_warning: AtomicBool::new(false),
                refresh_gate,
                user: Mutex::new(initial_user()),
                targets: Mutex::new(Some(initial_targets())),
                logs: Mutex::new(BTreeMap::new()),
                measurements: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Invalidates every access token issued so far. The next authorized
    /// request will be rejected with a 401.
    pub fn expire_access(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn refresh_calls(&self) -> u64 {
        self.inner.refresh_calls.load(Ordering::SeqCst)
    }

    /// How many bearer-authenticated requests have been turned away.
    pub fn rejected_calls(&self) -> u64 {
        self.inner.rejected_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> u64 {
        self.inner.logout_calls.load(Ordering::SeqCst)
    }

    /// Makes refresh requests block until [`Self::release_refresh`].
    pub fn hold_refresh(&self) {
        self.inner.refresh_gate.send_replace(false);
    }

    pub fn release_refresh(&self) {
        self.inner.refresh_gate.send_replace(true);
    }

    /// When set, the refresh endpoint rejects every token.
    pub fn set_fail_refresh(&self, fail: bool) {
        self.inner.fail_refresh.store(fail, Ordering::SeqCst);
    }

    /// When set, a successful refresh also rotates the refresh token.
    pub fn set_rotate_refresh(&self, rotate: bool) {
        self.inner.rotate_refresh.store(rotate, Ordering::SeqCst);
    }

    /// When set, every bearer is rejected, including freshly issued ones.
    pub fn set_reject_all_access(&self, reject: bool) {
        self.inner.reject_all_access.store(reject, Ordering::SeqCst);
    }

    pub fn set_fail_logout(&self, fail: bool) {
        self.inner.fail_logout.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_alerts(&self, fail: bool) {
        self.inner.fail_alerts.store(fail, Ordering::SeqCst);
    }

    pub fn set_measurement_warning(&self, warn: bool) {
        self.inner.measurement_warning.store(warn, Ordering::SeqCst);
    }

    /// Resets the account to a just-registered state: empty profile, no
    /// targets, no history. The credentials stay the same.
    pub fn make_fresh_account(&self) {
        *self.inner.user.lock().unwrap() = json!({
            "id": USER_ID,
            "email": EMAIL,
            "name": "",
            "age": null,
            "gender": "",
            "height_cm": null,
            "diet_type": "",
            "avg_sitting_hours": null,
            "auth_provider": "email",
            "is_email_verified": true,
            "is_onboarded": false,
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        });
        *self.inner.targets.lock().unwrap() = None;
        self.inner.logs.lock().unwrap().clear();
        self.inner.measurements.lock().unwrap().clear();
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let expected = format!("Bearer access-{}", self.inner.generation.load(Ordering::SeqCst));
        let presented = headers.get("authorization").and_then(|value| value.to_str().ok());
        if self.inner.reject_all_access.load(Ordering::SeqCst) || presented != Some(expected.as_str()) {
            self.inner.rejected_calls.fetch_add(1, Ordering::SeqCst);
            return Err(fail(
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided.",
                Value::Null,
            ));
        }
        Ok(())
    }
}

fn initial_user() -> Value {
    json!({
        "id": USER_ID,
        "email": EMAIL,
        "name": "Ben",
        "age": 28,
        "gender": "Male",
        "height_cm": "180.0",
        "diet_type": "Non-Vegetarian",
        "avg_sitting_hours": "8.0",
        "auth_provider": "email",
        "is_email_verified": true,
        "is_onboarded": true,
        "created_at": "2025-01-04T09:30:00Z",
        "updated_at": "2025-02-11T18:00:00Z",
    })
}

fn initial_targets() -> Value {
    json!({
        "id": "0d5a9e6e-7c1b-4bfb-9a3e-52d1f1f6a402",
        "calorie_target": CALORIE_TARGET,
        "protein_target": PROTEIN_TARGET,
        "goal_weight": "75.0",
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}

fn router(state: StubState) -> Router {
    Router::new()
        .route("/api/v1/auth/login/", post(login))
        .route("/api/v1/auth/google/", post(google_login))
        .route("/api/v1/auth/register/", post(register))
        .route("/api/v1/auth/token/refresh/", post(refresh_token))
        .route("/api/v1/auth/logout/", post(logout))
        .route("/api/v1/auth/verify-email/", post(verify_email))
        .route("/api/v1/auth/verify-email/resend/", post(resend_verification))
        .route("/api/v1/auth/password-reset/", post(password_reset))
        .route("/api/v1/auth/password-reset/confirm/", post(password_reset_confirm))
        .route("/api/v1/auth/password-change/", put(password_change))
        .route("/api/v1/users/me/", get(me).patch(update_me).delete(deactivate))
        .route("/api/v1/logs/", get(list_logs).post(create_log))
        .route("/api/v1/logs/today/", get(today_log))
        .route("/api/v1/logs/{date}/", get(get_log).put(update_log).delete(delete_log))
        .route("/api/v1/measurements/", get(list_measurements).post(create_measurement))
        .route("/api/v1/measurements/latest/", get(latest_measurement))
        .route("/api/v1/measurements/{id}/", get(get_measurement))
        .route("/api/v1/dashboard/summary/", get(dashboard_summary))
        .route("/api/v1/dashboard/trends/", get(dashboard_trends))
        .route("/api/v1/dashboard/streaks/", get(dashboard_streaks))
        .route("/api/v1/dashboard/alerts/", get(dashboard_alerts))
        .route("/api/v1/dashboard/monthly/", get(dashboard_monthly))
        .route("/api/v1/onboarding/profile/", post(onboarding_profile))
        .route("/api/v1/onboarding/targets/", post(onboarding_targets))
        .route("/api/v1/onboarding/status/", get(onboarding_status))
        .route("/api/v1/settings/", get(get_settings).put(update_settings))
        .route("/api/v1/targets/", get(get_targets).put(put_targets))
        .with_state(state)
}

// ---- response envelope ----

fn reply(status: StatusCode, data: Value, message: Option<&str>, warning: Option<&str>) -> Response {
    let body = json!({
        "status": "success",
        "data": data,
        "message": message,
        "warning": warning,
        "errors": null,
        "meta": null,
    });
    (status, Json(body)).into_response()
}

fn ok(data: Value) -> Response {
    reply(StatusCode::OK, data, None, None)
}

fn fail(status: StatusCode, message: &str, errors: Value) -> Response {
    let body = json!({
        "status": "error",
        "data": null,
        "message": message,
        "warning": null,
        "errors": errors,
        "meta": null,
    });
    (status, Json(body)).into_response()
}

// ---- wire helpers ----

fn parse_date(input: &str) -> Option<Date> {
    Date::parse(input, DATE_FORMAT).ok()
}

/// Decimal fields leave the CRUD endpoints as quoted strings.
fn decimal_str(value: &Value) -> Value {
    match value {
        Value::Number(number) => {
            number.as_f64().map_or(Value::Null, |n| Value::String(format!("{n:.1}")))
        }
        Value::String(text) => Value::String(text.clone()),
        _ => Value::Null,
    }
}

/// The dashboard endpoints emit the same decimals as bare numbers.
fn bare_number(value: &Value) -> Value {
    match value {
        Value::String(text) => text.parse::<f64>().map_or(Value::Null, |n| json!(n)),
        Value::Number(_) => value.clone(),
        _ => Value::Null,
    }
}

fn bmi_category(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Normal"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    }
}

fn merge_profile(user: &mut Value, patch: &Value) {
    if let Some(map) = patch.as_object() {
        for (key, value) in map {
            let stored = match key.as_str() {
                "height_cm" | "avg_sitting_hours" => decimal_str(value),
                _ => value.clone(),
            };
            user[key.as_str()] = stored;
        }
    }
}

fn merge_targets(doc: &mut Value, patch: &Value) {
    if let Some(map) = patch.as_object() {
        for (key, value) in map {
            let stored = if key == "goal_weight" { decimal_str(value) } else { value.clone() };
            doc[key.as_str()] = stored;
        }
    }
}

fn build_log(date: &str, body: &Value, existing: Option<&Value>) -> Value {
    let calories = body["calories"].as_u64().unwrap_or(0);
    let protein = body["protein"].as_u64().unwrap_or(0);
    let target = f64::from(CALORIE_TARGET);
    let calories_ok = (calories as f64 - target).abs() <= target * 0.10;
    json!({
        "id": existing.map_or_else(
            || Uuid::new_v4().to_string(),
            |doc| doc["id"].as_str().unwrap_or_default().to_owned(),
        ),
        "date": date,
        "weight": decimal_str(&body["weight"]),
        "calories": calories,
        "protein": protein,
        "carbs": body.get("carbs").cloned().unwrap_or(Value::Null),
        "fats": body.get("fats").cloned().unwrap_or(Value::Null),
        "steps": body["steps"].as_u64().unwrap_or(0),
        "water": decimal_str(&body["water"]),
        "sleep": decimal_str(&body["sleep"]),
        "workout": body["workout"].as_bool().unwrap_or(false),
        "cardio": body["cardio"].as_bool().unwrap_or(false),
        "fruit": body["fruit"].as_bool().unwrap_or(false),
        "protein_hit": protein >= u64::from(PROTEIN_TARGET),
        "calories_ok": calories_ok,
        "created_at": existing.map_or(TIMESTAMP, |doc| doc["created_at"].as_str().unwrap_or(TIMESTAMP)),
        "updated_at": TIMESTAMP,
    })
}

// ---- auth handlers ----

async fn login(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    if body["email"].as_str() != Some(EMAIL) || body["password"].as_str() != Some(PASSWORD) {
        return fail(StatusCode::UNAUTHORIZED, "Invalid email or password.", Value::Null);
    }
    issue_tokens(&state)
}

async fn google_login(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    if body["token"].as_str() != Some(GOOGLE_TOKEN) {
        return fail(StatusCode::UNAUTHORIZED, "Invalid Google token.", Value::Null);
    }
    issue_tokens(&state)
}

fn issue_tokens(state: &StubState) -> Response {
    let generation = state.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
    ok(json!({
        "access": format!("access-{generation}"),
        "refresh": format!("refresh-{generation}"),
    }))
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"].as_str() == Some(EMAIL) {
        return fail(
            StatusCode::BAD_REQUEST,
            "Validation failed.",
            json!({"email": ["A user with this email already exists."]}),
        );
    }
    reply(
        StatusCode::CREATED,
        Value::Null,
        Some("Registration successful. Please check your email to verify your account."),
        None,
    )
}

async fn refresh_token(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    state.inner.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let mut gate = state.inner.refresh_gate.subscribe();
    let _ = gate.wait_for(|open| *open).await;

    let presented = body["refresh"].as_str().unwrap_or_default();
    if state.inner.fail_refresh.load(Ordering::SeqCst) || !presented.starts_with("refresh-") {
        return fail(StatusCode::UNAUTHORIZED, "Token is invalid or expired.", Value::Null);
    }
    let generation = state.inner.generation.load(Ordering::SeqCst);
    let mut data = json!({"access": format!("access-{generation}"), "refresh": null});
    if state.inner.rotate_refresh.load(Ordering::SeqCst) {
        data["refresh"] = json!(format!("refresh-{generation}"));
    }
    ok(data)
}

async fn logout(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    state.inner.logout_calls.fetch_add(1, Ordering::SeqCst);
    if state.inner.fail_logout.load(Ordering::SeqCst) {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.", Value::Null);
    }
    if body["refresh"].as_str().is_none() {
        return fail(
            StatusCode::BAD_REQUEST,
            "Validation failed.",
            json!({"refresh": ["This field is required."]}),
        );
    }
    reply(StatusCode::OK, Value::Null, Some("Logged out."), None)
}

async fn verify_email(Json(body): Json<Value>) -> Response {
    if body["token"].as_str() == Some("good-token") {
        return reply(StatusCode::OK, Value::Null, Some("Email verified."), None);
    }
    // Raw DRF-style error, no envelope.
    (StatusCode::BAD_REQUEST, Json(json!({"detail": "Invalid or expired token."}))).into_response()
}

async fn resend_verification(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    reply(StatusCode::OK, Value::Null, Some("Verification email sent."), None)
}

async fn password_reset(Json(_body): Json<Value>) -> Response {
    reply(
        StatusCode::OK,
        Value::Null,
        Some("If the email exists, a reset link has been sent."),
        None,
    )
}

async fn password_reset_confirm(Json(body): Json<Value>) -> Response {
    if body["token"].as_str() != Some("good-token") {
        return fail(
            StatusCode::BAD_REQUEST,
            "Validation failed.",
            json!({"token": ["Invalid or expired token."]}),
        );
    }
    reply(StatusCode::OK, Value::Null, Some("Password has been reset."), None)
}

async fn password_change(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    if body["current_password"].as_str() != Some(PASSWORD) {
        return fail(
            StatusCode::BAD_REQUEST,
            "Validation failed.",
            json!({"current_password": ["Current password is incorrect."]}),
        );
    }
    reply(StatusCode::OK, Value::Null, Some("Password changed."), None)
}

// ---- user handlers ----

async fn me(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let user = state.inner.user.lock().unwrap();
    ok(user.clone())
}

async fn update_me(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let mut user = state.inner.user.lock().unwrap();
    merge_profile(&mut user, &body);
    ok(user.clone())
}

async fn deactivate(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    StatusCode::NO_CONTENT.into_response()
}

// ---- log handlers ----

async fn create_log(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let Some(date) = body["date"].as_str().map(str::to_owned) else {
        return fail(
            StatusCode::BAD_REQUEST,
            "Validation failed.",
            json!({"date": ["This field is required."]}),
        );
    };
    let Some(day) = parse_date(&date) else {
        return fail(
            StatusCode::BAD_REQUEST,
            "Validation failed.",
            json!({"date": ["Date has wrong format."]}),
        );
    };
    if day > today_utc() {
        return fail(
            StatusCode::BAD_REQUEST,
            "Validation failed.",
            json!({"date": ["Future dates are not allowed."]}),
        );
    }
    let mut logs = state.inner.logs.lock().unwrap();
    let existing = logs.get(&date).cloned();
    let doc = build_log(&date, &body, existing.as_ref());
    let status = if existing.is_some() { StatusCode::OK } else { StatusCode::CREATED };
    logs.insert(date, doc.clone());
    reply(status, doc, None, None)
}

async fn today_log(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let logs = state.inner.logs.lock().unwrap();
    match logs.get(&today_utc().to_string()) {
        Some(doc) => ok(doc.clone()),
        None => fail(StatusCode::NOT_FOUND, "No log for today.", Value::Null),
    }
}

async fn list_logs(
    State(state): State<StubState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let page_size: usize = params.get("page_size").and_then(|raw| raw.parse().ok()).unwrap_or(30);
    let since = params.get("date__gte").and_then(|raw| parse_date(raw));
    let logs = state.inner.logs.lock().unwrap();
    let mut matching: Vec<Value> = logs
        .iter()
        .filter(|(date, _)| {
            let Some(cutoff) = since else { return true };
            parse_date(date).is_some_and(|day| day >= cutoff)
        })
        .map(|(_, doc)| doc.clone())
        .collect();
    matching.reverse();

    let count = matching.len();
    let next = (count > page_size)
        .then(|| format!("/api/v1/logs/?page=2&page_size={page_size}"));
    matching.truncate(page_size);
    ok(json!({"count": count, "next": next, "previous": null, "results": matching}))
}

async fn get_log(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(date): Path<String>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let logs = state.inner.logs.lock().unwrap();
    match logs.get(&date) {
        Some(doc) => ok(doc.clone()),
        None => fail(StatusCode::NOT_FOUND, "Log not found.", Value::Null),
    }
}

async fn update_log(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(date): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let Some(day) = parse_date(&date) else {
        return fail(StatusCode::NOT_FOUND, "Log not found.", Value::Null);
    };
    if day < days_ago(7) {
        return fail(
            StatusCode::FORBIDDEN,
            "Logs older than 7 days cannot be modified.",
            Value::Null,
        );
    }
    let mut logs = state.inner.logs.lock().unwrap();
    let Some(existing) = logs.get(&date).cloned() else {
        return fail(StatusCode::NOT_FOUND, "Log not found.", Value::Null);
    };
    let doc = build_log(&date, &body, Some(&existing));
    logs.insert(date, doc.clone());
    ok(doc)
}

async fn delete_log(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(date): Path<String>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    if parse_date(&date).is_some_and(|day| day < days_ago(7)) {
        return fail(
            StatusCode::FORBIDDEN,
            "Logs older than 7 days cannot be modified.",
            Value::Null,
        );
    }
    let mut logs = state.inner.logs.lock().unwrap();
    if logs.remove(&date).is_none() {
        return fail(StatusCode::NOT_FOUND, "Log not found.", Value::Null);
    }
    StatusCode::NO_CONTENT.into_response()
}

// ---- measurement handlers ----

async fn create_measurement(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let Some(date) = body["date"].as_str() else {
        return fail(
            StatusCode::BAD_REQUEST,
            "Validation failed.",
            json!({"date": ["This field is required."]}),
        );
    };
    let doc = json!({
        "id": Uuid::new_v4().to_string(),
        "date": date,
        "neck": decimal_str(&body["neck"]),
        "chest": decimal_str(&body["chest"]),
        "shoulders": decimal_str(&body["shoulders"]),
        "bicep": decimal_str(&body["bicep"]),
        "forearm": decimal_str(&body["forearm"]),
        "waist": decimal_str(&body["waist"]),
        "hips": decimal_str(&body["hips"]),
        "thigh": decimal_str(&body["thigh"]),
        "created_at": TIMESTAMP,
    });
    state.inner.measurements.lock().unwrap().insert(0, doc.clone());
    let warning = state
        .inner
        .measurement_warning
        .load(Ordering::SeqCst)
        .then_some("Last measurement was 45 days ago. Recommended frequency: every 30 days.");
    reply(StatusCode::CREATED, doc, None, warning)
}

async fn list_measurements(
    State(state): State<StubState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let page_size: usize = params.get("page_size").and_then(|raw| raw.parse().ok()).unwrap_or(30);
    let measurements = state.inner.measurements.lock().unwrap();
    let count = measurements.len();
    let results: Vec<Value> = measurements.iter().take(page_size).cloned().collect();
    let next = (count > page_size)
        .then(|| format!("/api/v1/measurements/?page=2&page_size={page_size}"));
    ok(json!({"count": count, "next": next, "previous": null, "results": results}))
}

async fn latest_measurement(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let measurements = state.inner.measurements.lock().unwrap();
    match measurements.first() {
        Some(doc) => ok(doc.clone()),
        None => fail(StatusCode::NOT_FOUND, "No measurements found.", Value::Null),
    }
}

async fn get_measurement(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let measurements = state.inner.measurements.lock().unwrap();
    match measurements.iter().find(|doc| doc["id"].as_str() == Some(id.as_str())) {
        Some(doc) => ok(doc.clone()),
        None => fail(StatusCode::NOT_FOUND, "Measurement not found.", Value::Null),
    }
}

// ---- dashboard handlers ----

async fn dashboard_summary(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let logs = state.inner.logs.lock().unwrap();
    let today = logs.get(&today_utc().to_string()).map(|doc| {
        json!({
            "weight": bare_number(&doc["weight"]),
            "calories": doc["calories"].clone(),
            "protein": doc["protein"].clone(),
            "steps": doc["steps"].clone(),
            "water": bare_number(&doc["water"]),
            "sleep": bare_number(&doc["sleep"]),
            "workout": doc["workout"].clone(),
            "protein_hit": doc["protein_hit"].clone(),
            "calories_ok": doc["calories_ok"].clone(),
        })
    });
    let targets = state.inner.targets.lock().unwrap();
    let targets = targets.as_ref().map(|doc| {
        json!({
            "calorie_target": doc["calorie_target"].clone(),
            "protein_target": doc["protein_target"].clone(),
            "goal_weight": bare_number(&doc["goal_weight"]),
        })
    });
    let has_logged_today = today.is_some();
    ok(json!({"today": today, "targets": targets, "has_logged_today": has_logged_today}))
}

async fn dashboard_trends(
    State(state): State<StubState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    // Only the documented windows are honored; anything else falls back to 7.
    let days = match params.get("days").and_then(|raw| raw.parse::<i64>().ok()) {
        Some(days @ (7 | 14 | 30)) => days,
        _ => 7,
    };
    let cutoff = days_ago(days - 1);
    let logs = state.inner.logs.lock().unwrap();
    let points: Vec<Value> = logs
        .iter()
        .filter(|(date, _)| parse_date(date).is_some_and(|day| day >= cutoff))
        .map(|(date, doc)| json!({"date": date, "weight": bare_number(&doc["weight"])}))
        .collect();
    ok(json!(points))
}

async fn dashboard_streaks(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let logs = state.inner.logs.lock().unwrap();
    let start = if logs.contains_key(&today_utc().to_string()) { today_utc() } else { days_ago(1) };
    ok(json!({
        "protein_streak": streak(&logs, start, "protein_hit"),
        "calorie_streak": streak(&logs, start, "calories_ok"),
        "workout_streak": streak(&logs, start, "workout"),
    }))
}

fn streak(logs: &BTreeMap<String, Value>, start: Date, key: &str) -> u64 {
    let mut count = 0;
    let mut day = start;
    while let Some(doc) = logs.get(&day.to_string()) {
        if doc[key].as_bool() != Some(true) {
            break;
        }
        count += 1;
        match day.previous_day() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    count
}

async fn dashboard_alerts(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    if state.inner.fail_alerts.load(Ordering::SeqCst) {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.", Value::Null);
    }
    ok(json!([
        {"type": "info", "message": "Log every day to keep your streaks alive."}
    ]))
}

async fn dashboard_monthly(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let year = today_utc().year();
    let logs = state.inner.logs.lock().unwrap();
    let months: Vec<Value> = (1..=12u8)
        .map(|month| {
            let month = Month::try_from(month).unwrap();
            let first = Date::from_calendar_date(year, month, 1).unwrap();
            let total = time::util::days_in_year_month(year, month);
            let in_month: Vec<&Value> = logs
                .iter()
                .filter(|(date, _)| {
                    parse_date(date).is_some_and(|day| day.year() == year && day.month() == month)
                })
                .map(|(_, doc)| doc)
                .collect();
            if in_month.is_empty() {
                return json!({
                    "month": first.to_string(),
                    "avg_weight": null,
                    "bmi": null,
                    "bmi_category": "",
                    "weight_change": null,
                    "consistency_score": 0,
                    "days_logged": 0,
                    "protein_hit_days": 0,
                    "workout_days": 0,
                    "total_days_in_month": total,
                });
            }
            let weights: Vec<f64> = in_month
                .iter()
                .filter_map(|doc| bare_number(&doc["weight"]).as_f64())
                .collect();
            let avg = weights.iter().sum::<f64>() / weights.len() as f64;
            let bmi = avg / (1.8 * 1.8);
            json!({
                "month": first.to_string(),
                "avg_weight": (avg * 10.0).round() / 10.0,
                "bmi": (bmi * 10.0).round() / 10.0,
                "bmi_category": bmi_category(bmi),
                "weight_change": null,
                "consistency_score": in_month.len() * 100 / usize::from(total),
                "days_logged": in_month.len(),
                "protein_hit_days": in_month.iter().filter(|doc| doc["protein_hit"] == json!(true)).count(),
                "workout_days": in_month.iter().filter(|doc| doc["workout"] == json!(true)).count(),
                "total_days_in_month": total,
            })
        })
        .collect();
    ok(json!(months))
}

// ---- onboarding handlers ----

async fn onboarding_profile(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let mut user = state.inner.user.lock().unwrap();
    if user["gender"].as_str().is_some_and(|gender| !gender.is_empty()) {
        return fail(StatusCode::BAD_REQUEST, "Profile has already been submitted.", Value::Null);
    }
    merge_profile(&mut user, &body);
    if state.inner.targets.lock().unwrap().is_some() {
        user["is_onboarded"] = json!(true);
    }
    reply(StatusCode::CREATED, Value::Null, Some("Profile saved."), None)
}

async fn onboarding_targets(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let mut user = state.inner.user.lock().unwrap();
    let Some(height_cm) = user["height_cm"].as_str().and_then(|raw| raw.parse::<f64>().ok())
    else {
        return fail(StatusCode::BAD_REQUEST, "Complete your profile first.", Value::Null);
    };
    let mut targets = state.inner.targets.lock().unwrap();
    if targets.is_some() {
        return fail(StatusCode::BAD_REQUEST, "Targets have already been submitted.", Value::Null);
    }
    *targets = Some(json!({
        "id": Uuid::new_v4().to_string(),
        "calorie_target": body["calorie_target"].clone(),
        "protein_target": body["protein_target"].clone(),
        "goal_weight": decimal_str(&body["goal_weight"]),
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    }));
    user["is_onboarded"] = json!(true);

    // The starting weight seeds the first daily log.
    let weight = body["weight"].as_f64().unwrap_or(0.0);
    let today = today_utc().to_string();
    let seeded = build_log(
        &today,
        &json!({
            "weight": weight, "calories": 0, "protein": 0, "steps": 0,
            "water": 0.0, "sleep": 0.0, "workout": false, "cardio": false, "fruit": false,
        }),
        None,
    );
    state.inner.logs.lock().unwrap().insert(today, seeded);

    let height_m = height_cm / 100.0;
    let bmi = ((weight / (height_m * height_m)) * 10.0).round() / 10.0;
    reply(
        StatusCode::CREATED,
        json!({"bmi": bmi, "bmi_category": bmi_category(bmi)}),
        None,
        None,
    )
}

async fn onboarding_status(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let user = state.inner.user.lock().unwrap();
    let targets = state.inner.targets.lock().unwrap();
    let has_profile = user["gender"].as_str().is_some_and(|gender| !gender.is_empty());
    ok(json!({
        "is_onboarded": user["is_onboarded"].clone(),
        "has_profile": has_profile,
        "has_targets": targets.is_some(),
    }))
}

// ---- settings handlers ----

async fn get_settings(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let user = state.inner.user.lock().unwrap();
    let targets = state.inner.targets.lock().unwrap();
    ok(json!({"profile": user.clone(), "targets": targets.clone()}))
}

async fn update_settings(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let mut user = state.inner.user.lock().unwrap();
    let mut targets = state.inner.targets.lock().unwrap();
    if let Some(profile) = body.get("profile") {
        merge_profile(&mut user, profile);
    }
    if let Some(patch) = body.get("targets") {
        match targets.as_mut() {
            Some(doc) => merge_targets(doc, patch),
            None => {
                return fail(
                    StatusCode::BAD_REQUEST,
                    "Set initial targets during onboarding first.",
                    Value::Null,
                );
            }
        }
    }
    ok(json!({"profile": user.clone(), "targets": targets.clone()}))
}

async fn get_targets(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let targets = state.inner.targets.lock().unwrap();
    match targets.as_ref() {
        Some(doc) => ok(doc.clone()),
        None => fail(StatusCode::NOT_FOUND, "No targets set.", Value::Null),
    }
}

async fn put_targets(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let mut targets = state.inner.targets.lock().unwrap();
    let id = targets
        .as_ref()
        .and_then(|doc| doc["id"].as_str().map(str::to_owned))
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let doc = json!({
        "id": id,
        "calorie_target": body["calorie_target"].clone(),
        "protein_target": body["protein_target"].clone(),
        "goal_weight": decimal_str(&body["goal_weight"]),
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    });
    *targets = Some(doc.clone());
    ok(doc)
}
