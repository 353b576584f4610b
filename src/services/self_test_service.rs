//! Self-test harness.
//!
//! Drives every route over HTTP, one call at a time, and reports the status
//! each call came back with. The only cross-call state is the [`Accumulator`]:
//! the identifier returned by the create-user call, plus the queue of calls
//! still to run, which that identifier rewrites.

use std::collections::VecDeque;

use actix_web::http::Method;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::constants;

const USER_ID_FIELD: &str = "user_id";
const INSERT_ID_FIELD: &str = "insertId";

/// One request in the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    /// Whether a successful response carries the identifier later calls need.
    pub yields_user_id: bool,
}

impl HarnessCall {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            yields_user_id: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn yielding_user_id(mut self) -> Self {
        self.yields_user_id = true;
        self
    }

    /// Whether the body holds a `user_id` still waiting for the created user.
    fn awaits_user_id(&self) -> bool {
        matches!(
            self.body.as_ref().and_then(|body| body.get(USER_ID_FIELD)),
            Some(Value::Null)
        )
    }

    fn fill_user_id(&mut self, user_id: &str) {
        if !self.awaits_user_id() {
            return;
        }
        if let Some(Value::Object(body)) = self.body.as_mut() {
            body.insert(USER_ID_FIELD.to_string(), Value::String(user_id.to_string()));
        }
    }
}

/// What a call came back with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// The server answered, with any status.
    Status(u16),
    /// The call could not be completed at all.
    Error,
}

impl Serialize for CallOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CallOutcome::Status(status) => serializer.serialize_u16(*status),
            CallOutcome::Error => serializer.serialize_str(constants::SELF_TEST_ERROR_SENTINEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarnessReport {
    pub endpoint: String,
    pub method: String,
    pub status: CallOutcome,
}

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn insert_id(&self) -> Option<String> {
        let body: Value = serde_json::from_slice(&self.body).ok()?;
        match body.get(INSERT_ID_FIELD)? {
            Value::Number(id) => Some(id.to_string()),
            Value::String(id) => Some(id.clone()),
            _ => None,
        }
    }
}

/// How the harness reaches the server. Errors are transport failures only;
/// any HTTP answer, whatever its status, is a response.
#[async_trait(?Send)]
pub trait HarnessTransport {
    async fn send(&self, call: &HarnessCall) -> Result<TransportResponse, String>;
}

/// Harness state threaded from one call to the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulator {
    pub user_id: Option<String>,
    pub pending: VecDeque<HarnessCall>,
}

impl Accumulator {
    pub fn new(plan: Vec<HarnessCall>) -> Self {
        Self {
            user_id: None,
            pending: plan.into(),
        }
    }

    /// Records the created user's id: fills it into every queued call that
    /// awaits it and appends the update/delete calls for that user.
    pub fn with_created_user(mut self, user_id: String, stamp: i64) -> Self {
        for call in self.pending.iter_mut() {
            call.fill_user_id(&user_id);
        }
        self.pending.extend(user_followups(&user_id, stamp));
        self.user_id = Some(user_id);
        self
    }
}

fn user_followups(user_id: &str, stamp: i64) -> [HarnessCall; 2] {
    [
        HarnessCall::put(format!("/users/{}", user_id)).json(json!({
            "username": format!("updateduser{}", stamp),
            "password": "Updated1234",
            "first_name": "Updated",
            "last_name": "User",
        })),
        HarnessCall::delete(format!("/users/{}", user_id)),
    ]
}

/// The fixed call sequence, stamped so each run creates a fresh username.
pub fn default_plan(stamp: i64) -> Vec<HarnessCall> {
    let username = format!("testuser{}", stamp);
    vec![
        HarnessCall::post("/createUser")
            .json(json!({
                "username": &username,
                "password": "Test1234",
                "first_name": "Test",
                "last_name": "User",
            }))
            .yielding_user_id(),
        HarnessCall::get("/users"),
        HarnessCall::get("/users/search").param("username", &username),
        HarnessCall::get("/users/searchByDetails")
            .param("username", &username)
            .param("first_name", "Test")
            .param("last_name", "User"),
        HarnessCall::get("/statistics"),
        HarnessCall::post("/addStatistics")
            .json(json!({ "user_id": null, "kills": 10, "date": "2023-01-01" })),
        HarnessCall::put("/statistics/1")
            .json(json!({ "user_id": null, "kills": 20, "date": "2023-01-02" })),
        HarnessCall::delete("/statistics/1"),
        HarnessCall::get("/statistics/paginate")
            .param("limit", 10)
            .param("offset", 0),
        HarnessCall::get("/statistics/search")
            .param("start_date", "2023-01-01")
            .param("end_date", "2023-01-31"),
        HarnessCall::get("/statistics/searchByDate").param("date", "2023-01-01"),
        HarnessCall::get("/testRunning"),
        HarnessCall::delete("/deleteUsersBelowKills").param("kills", 10),
    ]
}

/// Runs one call and returns its report with the updated accumulator.
pub async fn step<T>(
    call: HarnessCall,
    acc: Accumulator,
    transport: &T,
    stamp: i64,
) -> (HarnessReport, Accumulator)
where
    T: HarnessTransport + ?Sized,
{
    let outcome = transport.send(&call).await;
    let status = match &outcome {
        Ok(response) => {
            if !response.is_success() {
                log::error!(
                    "Self-test {} {} answered {}: {}",
                    call.method,
                    call.path,
                    response.status,
                    String::from_utf8_lossy(&response.body)
                );
            }
            CallOutcome::Status(response.status)
        }
        Err(e) => {
            log::error!("Self-test {} {} failed: {}", call.method, call.path, e);
            CallOutcome::Error
        }
    };

    let acc = match outcome {
        Ok(response) if call.yields_user_id && response.is_success() => match response.insert_id() {
            Some(user_id) => {
                log::debug!("Self-test created user {}", user_id);
                acc.with_created_user(user_id, stamp)
            }
            None => acc,
        },
        _ => acc,
    };

    let report = HarnessReport {
        endpoint: call.path,
        method: call.method.as_str().to_lowercase(),
        status,
    };
    (report, acc)
}

/// Runs `plan` to completion, one call at a time, never aborting early.
pub async fn run<T>(plan: Vec<HarnessCall>, transport: &T, stamp: i64) -> Vec<HarnessReport>
where
    T: HarnessTransport + ?Sized,
{
    let mut acc = Accumulator::new(plan);
    let mut reports = Vec::new();

    while let Some(call) = acc.pending.pop_front() {
        let (report, next) = step(call, acc, transport, stamp).await;
        reports.push(report);
        acc = next;
    }
    reports
}

/// Runs the default plan against `transport`.
pub async fn run_default<T>(transport: &T) -> Vec<HarnessReport>
where
    T: HarnessTransport + ?Sized,
{
    let stamp = Utc::now().timestamp();
    log::info!("Running self-test against all endpoints (stamp {})", stamp);
    run(default_plan(stamp), transport, stamp).await
}

/// `awc` transport against a running server.
pub struct AwcTransport {
    client: awc::Client,
    base_url: String,
}

impl AwcTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: awc::Client::default(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait(?Send)]
impl HarnessTransport for AwcTransport {
    async fn send(&self, call: &HarnessCall) -> Result<TransportResponse, String> {
        let url = format!("{}{}", self.base_url, call.path);
        let request = self
            .client
            .request(call.method.clone(), url)
            .query(&call.query)
            .map_err(|e| e.to_string())?;

        let mut response = match &call.body {
            Some(body) => request.send_json(body).await,
            None => request.send().await,
        }
        .map_err(|e| e.to_string())?;

        // A completed call is reported by status alone; the body is only read
        // when a later call needs it or a failure should be logged.
        let status = response.status();
        let body = if call.yields_user_id || !status.is_success() {
            match response.body().await {
                Ok(body) => body.to_vec(),
                Err(e) => {
                    log::warn!("Self-test {} {} body unreadable: {}", call.method, call.path, e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}
