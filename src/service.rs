//! Transport-agnostic request dispatch
//!
//! Maps an HTTP-style method, path and JSON body onto the projection,
//! sensitivity and timeline operations. The Lambda handler and any other
//! front end only translate their own request/response types.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::assumptions::AssumptionOverrides;
use crate::projection::Horizon;
use crate::scenario::ScenarioRunner;
use crate::timeline::{check_timeline, today_or_now, RunwayAssumptions};

/// Version string reported by `/version`
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Status code and JSON body for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub status: u16,
    /// `None` for bodiless responses (CORS preflight)
    pub body: Option<Value>,
}

impl ServiceResponse {
    fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(json!({ "ok": false, "error": message.into() })),
        }
    }

    fn empty() -> Self {
        Self {
            status: 200,
            body: None,
        }
    }
}

/// Successful payload wrapped with `"ok": true`
#[derive(Debug, Serialize)]
struct Envelope<T: Serialize> {
    ok: bool,
    #[serde(flatten)]
    body: T,
}

/// `/sensitivity` request: projection overrides plus an optional horizon
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SensitivityRequest {
    years: Option<u32>,
    #[serde(flatten)]
    overrides: AssumptionOverrides,
}

/// `/timeline_check` request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TimelineRequest {
    today: Option<String>,
    target_start: Option<String>,
    assumptions: RunwayAssumptions,
}

#[derive(Debug, Clone, Copy)]
enum Route {
    Root,
    Health,
    Version,
    Projection(Horizon),
    Sensitivity,
    TimelineCheck,
}

impl Route {
    fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Route::Root,
            "/health" => Route::Health,
            "/version" => Route::Version,
            "/projection_1yr" => Route::Projection(Horizon::OneYear),
            "/projection_3yr" => Route::Projection(Horizon::ThreeYear),
            "/projection_5yr" => Route::Projection(Horizon::FiveYear),
            "/sensitivity" => Route::Sensitivity,
            "/timeline_check" => Route::TimelineCheck,
            _ => return None,
        };
        Some(route)
    }

    fn method(&self) -> &'static str {
        match self {
            Route::Root | Route::Health | Route::Version => "GET",
            _ => "POST",
        }
    }
}

/// Dispatch one request against `runner`'s base assumptions
pub fn handle(runner: &ScenarioRunner, method: &str, path: &str, body: Option<&str>) -> ServiceResponse {
    let method = method.to_ascii_uppercase();
    if method == "OPTIONS" {
        return ServiceResponse::empty();
    }

    let Some(route) = Route::from_path(path) else {
        return ServiceResponse::error(404, format!("No route for {}", path));
    };
    if method != route.method() {
        return ServiceResponse::error(405, format!("{} not allowed on {}", method, path));
    }
    debug!("{} {} -> {:?}", method, path, route);

    let body = body.map(str::trim).filter(|b| !b.is_empty()).unwrap_or("{}");

    match route {
        Route::Root => ServiceResponse::ok(json!({
            "greeting": "Hello, World",
            "message": "Welcome to the enrollment projection service!"
        })),
        Route::Health => ServiceResponse::ok(json!({ "ok": true })),
        Route::Version => ServiceResponse::ok(json!({ "version": SERVICE_VERSION })),
        Route::Projection(horizon) => {
            let overrides: AssumptionOverrides = match parse_body(body) {
                Ok(o) => o,
                Err(response) => return response,
            };
            match runner.run(horizon, &overrides) {
                Ok(result) => envelope(result),
                Err(e) => ServiceResponse::error(422, e.to_string()),
            }
        }
        Route::Sensitivity => {
            let request: SensitivityRequest = match parse_body(body) {
                Ok(r) => r,
                Err(response) => return response,
            };
            let years = request.years.unwrap_or(1);
            let Some(horizon) = Horizon::from_years(years) else {
                return ServiceResponse::error(422, format!("Unsupported horizon: {} years", years));
            };
            match runner.sensitivity(horizon, &request.overrides) {
                Ok(report) => envelope(report),
                Err(e) => ServiceResponse::error(422, e.to_string()),
            }
        }
        Route::TimelineCheck => {
            let request: TimelineRequest = match parse_body(body) {
                Ok(r) => r,
                Err(response) => return response,
            };
            let today = today_or_now(request.today.as_deref());
            let target = request.target_start.unwrap_or_default();
            envelope(check_timeline(today, &target, &request.assumptions))
        }
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ServiceResponse> {
    serde_json::from_str(body).map_err(|e| {
        warn!("Rejecting request body: {}", e);
        ServiceResponse::error(400, format!("Invalid JSON: {}", e))
    })
}

fn envelope<T: Serialize>(body: T) -> ServiceResponse {
    match serde_json::to_value(Envelope { ok: true, body }) {
        Ok(value) => ServiceResponse::ok(value),
        Err(e) => ServiceResponse::error(500, format!("Failed to encode response: {}", e)),
    }
}
