//! Top of the pipeline: full calculation, equipment-only quote, health check
//!
//! `IrrCalculator::calculate` always returns a response. Any error raised on
//! the way becomes the uniform failure shape instead of propagating.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::equipment::format_currency;
use crate::error::{CalcError, CalcResult};
use crate::inputs::{parse_request, CalculationRequest, EquipmentParams};
use crate::projection::{
    build_statement, project_request, solve_irr_with, IrrAnalysis, SolverConfig, StatementRow,
    YearRecord,
};

pub const SERVICE_NAME: &str = "IRR Calculator API";

/// Result of a full calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub success: bool,
    /// Project IRR (%) from the IRR-convention cash flows
    pub irr: Option<f64>,
    pub error: Option<String>,
    pub equipment_cost: f64,
    pub cash_flows: Vec<YearRecord>,
    pub cash_flow_statement: Vec<StatementRow>,
    pub irr_analysis: IrrAnalysis,
    pub years: Vec<i32>,
}

impl CalculationResponse {
    /// Uniform failure shape: no partial results
    pub fn failure(err: &CalcError) -> Self {
        Self {
            success: false,
            irr: None,
            error: Some(format!("Calculation failed: {}", err)),
            equipment_cost: 0.0,
            cash_flows: Vec::new(),
            cash_flow_statement: Vec::new(),
            irr_analysis: IrrAnalysis::default(),
            years: Vec::new(),
        }
    }
}

/// Result of the equipment-only entry point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCostResponse {
    pub success: bool,
    pub equipment_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
}

pub fn health() -> HealthStatus {
    HealthStatus {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Runs calculations with a fixed solver configuration
#[derive(Debug, Clone, Default)]
pub struct IrrCalculator {
    config: SolverConfig,
}

impl IrrCalculator {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Run the whole pipeline for one request
    pub fn calculate(&self, request: &CalculationRequest) -> CalculationResponse {
        match self.try_calculate(request) {
            Ok(response) => response,
            Err(err) => {
                warn!("IRR calculation failed: {}", err);
                CalculationResponse::failure(&err)
            }
        }
    }

    fn try_calculate(&self, request: &CalculationRequest) -> CalcResult<CalculationResponse> {
        request.validate()?;

        let equipment_cost = request.equipment_params.total_cost()?;
        let years = request.years();
        debug!(
            "Equipment cost {:.2} over {} years ({}-{})",
            equipment_cost,
            years.len(),
            request.start_year,
            request.end_year
        );

        let projection = project_request(request, &years, equipment_cost)?;
        let irr = solve_irr_with(&projection.cash_flows, &self.config)?;

        let statement = build_statement(
            &projection.records,
            equipment_cost,
            &years,
            &request.cash_flow_params,
            &request.interest,
            &self.config,
        )?;

        info!(
            "IRR {:.4}% (cost method {:?}, equity method {:?})",
            irr, statement.analysis.cost_method_irr, statement.analysis.equity_method_irr
        );

        Ok(CalculationResponse {
            success: true,
            irr: Some(irr),
            error: None,
            equipment_cost,
            cash_flows: projection.records,
            cash_flow_statement: statement.rows,
            irr_analysis: statement.analysis,
            years,
        })
    }

    /// Equipment cost model in isolation
    pub fn equipment_cost(&self, params: &EquipmentParams) -> EquipmentCostResponse {
        match params.total_cost() {
            Ok(cost) => EquipmentCostResponse {
                success: true,
                equipment_cost: cost,
                formatted_cost: Some(format_currency(cost)),
                error: None,
            },
            Err(err) => {
                warn!("Equipment cost failed: {}", err);
                EquipmentCostResponse {
                    success: false,
                    equipment_cost: 0.0,
                    formatted_cost: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

/// Boundary reply: HTTP status plus JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

fn reply<T: Serialize>(status: u16, body: &T) -> ApiReply {
    match serde_json::to_value(body) {
        Ok(body) => ApiReply { status, body },
        Err(err) => error_reply(500, &format!("Failed to serialize response: {}", err)),
    }
}

fn error_reply(status: u16, message: &str) -> ApiReply {
    ApiReply {
        status,
        body: json!({ "success": false, "error": message }),
    }
}

/// Dispatch a request by method and path suffix.
///
/// `/calculate` and `/equipment-cost` take POST bodies, `/health` takes GET.
pub fn route(calculator: &IrrCalculator, method: &str, path: &str, body: Option<&str>) -> ApiReply {
    let path = path.trim_end_matches('/');
    let endpoint = path.rsplit('/').next().unwrap_or_default();

    match (method.to_ascii_uppercase().as_str(), endpoint) {
        ("GET", "health") => reply(200, &health()),
        ("POST", "calculate") => {
            let body = match body.filter(|b| !b.trim().is_empty()) {
                Some(body) => body,
                None => return error_reply(400, "Request body is empty"),
            };
            match parse_request(body) {
                Ok(request) => reply(200, &calculator.calculate(&request)),
                Err(err) => ApiReply {
                    status: err.status_code(),
                    body: json!({
                        "success": false,
                        "error": format!("Invalid request: {}", err),
                        "code": err.error_code(),
                    }),
                },
            }
        }
        ("POST", "equipment-cost") => {
            let body = match body.filter(|b| !b.trim().is_empty()) {
                Some(body) => body,
                None => return error_reply(400, "Request body is empty"),
            };
            match serde_json::from_str::<EquipmentParams>(body) {
                Ok(params) => {
                    let response = calculator.equipment_cost(&params);
                    let status = if response.success { 200 } else { 400 };
                    reply(status, &response)
                }
                Err(err) => error_reply(400, &format!("Invalid equipment parameters: {}", err)),
            }
        }
        (_, "health" | "calculate" | "equipment-cost") => error_reply(405, "Method not allowed"),
        _ => error_reply(404, "Endpoint not found"),
    }
}
