//! AWS Lambda handler for IRR calculations
//!
//! Accepts Lambda Function URL events and routes them to the calculator:
//! `POST .../calculate`, `POST .../equipment-cost`, `GET .../health`.
//! Solver settings come from the `IRR_*` environment variables.

use aws_lambda_events::event::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::json;
use solar_irr::{
    calculator::{route, ApiReply},
    projection::SolverConfig,
    IrrCalculator,
};

fn to_response(reply: ApiReply) -> Result<LambdaFunctionUrlResponse, Error> {
    let mut response = LambdaFunctionUrlResponse {
        status_code: i64::from(reply.status),
        headers: Default::default(),
        body: Some(reply.body.to_string()),
        is_base64_encoded: false,
        cookies: Vec::new(),
    };
    response.headers.insert("content-type", "application/json".parse()?);
    response.headers.insert("access-control-allow-origin", "*".parse()?);
    response.headers.insert("access-control-allow-methods", "GET, POST, OPTIONS".parse()?);
    response.headers.insert("access-control-allow-headers", "Content-Type".parse()?);
    Ok(response)
}

async fn handler(
    calculator: &IrrCalculator,
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let request = event.payload;
    let http = &request.request_context.http;
    let method = http.method.as_deref().unwrap_or("GET");
    let path = http
        .path
        .as_deref()
        .or(request.raw_path.as_deref())
        .unwrap_or("/");

    // CORS preflight
    if method.eq_ignore_ascii_case("OPTIONS") {
        return to_response(ApiReply { status: 200, body: json!({}) });
    }

    if request.is_base64_encoded {
        return to_response(ApiReply {
            status: 400,
            body: json!({ "success": false, "error": "Binary request bodies are not supported" }),
        });
    }

    log::debug!("{} {}", method, path);
    to_response(route(calculator, method, path, request.body.as_deref()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let calculator = IrrCalculator::new(SolverConfig::from_env());
    let calculator = &calculator;
    run(service_fn(move |event| async move { handler(calculator, event).await })).await
}
