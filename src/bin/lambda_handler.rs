//! AWS Lambda handler for the projection service
//!
//! Accepts Lambda Function URL requests, dispatches them to the projection,
//! sensitivity and timeline routes, and returns JSON with CORS headers.
//!
//! Priors load once per cold start from `ENROLLMENT_PRIORS_PATH` when set,
//! otherwise the built-in defaults are used.

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use base64::Engine;
use enrollment_projection::{service, ScenarioRunner};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::{json, Value};

const PRIORS_PATH_ENV: &str = "ENROLLMENT_PRIORS_PATH";

const BASE64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

fn load_runner() -> Result<ScenarioRunner, Error> {
    match std::env::var(PRIORS_PATH_ENV) {
        Ok(path) => {
            log::info!("Loading priors from {}", path);
            Ok(ScenarioRunner::from_csv_path(std::path::Path::new(&path))?)
        }
        Err(_) => Ok(ScenarioRunner::new()),
    }
}

fn http_response(status: u16, body: Option<Value>) -> Value {
    json!({
        "statusCode": status,
        "headers": {
            "Content-Type": "application/json",
            "Access-Control-Allow-Origin": "*",
            "Access-Control-Allow-Methods": "GET, POST, OPTIONS",
            "Access-Control-Allow-Headers": "Content-Type"
        },
        "body": body.map(|b| b.to_string()).unwrap_or_default(),
    })
}

/// Request body as text, decoding it first when the Function URL marked it base64
fn decode_body(body: Option<&str>, is_base64_encoded: bool) -> Result<Option<String>, String> {
    let Some(body) = body else {
        return Ok(None);
    };
    if !is_base64_encoded {
        return Ok(Some(body.to_string()));
    }

    let bytes = BASE64
        .decode(body.trim())
        .map_err(|e| format!("Invalid base64 body: {}", e))?;
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| format!("Request body is not UTF-8: {}", e))
}

/// Lambda handler function
async fn handler(runner: &ScenarioRunner, event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<Value, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    let method = request.request_context.http.method.as_deref().unwrap_or("GET");
    let path = request.raw_path.as_deref().unwrap_or("/");

    let body = match decode_body(request.body.as_deref(), request.is_base64_encoded) {
        Ok(body) => body,
        Err(message) => {
            log::warn!("{} {} -> 400: {}", method, path, message);
            return Ok(http_response(400, Some(json!({ "ok": false, "error": message }))));
        }
    };

    let response = service::handle(runner, method, path, body.as_deref());
    log::info!(
        "{} {} -> {} in {}ms",
        method,
        path,
        response.status,
        start.elapsed().as_millis()
    );

    Ok(http_response(response.status, response.body))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let runner = load_runner()?;
    let runner = &runner;
    run(service_fn(move |event| async move { handler(runner, event).await })).await
}
