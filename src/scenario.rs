//! Batch evaluation of independent requests
//!
//! Each request is evaluated on its own with no shared mutable state, so
//! batches fan out across the rayon pool and come back in input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calculator::{CalculationResponse, IrrCalculator};
use crate::inputs::CalculationRequest;
use crate::projection::SolverConfig;

/// One point of a tax-rate sensitivity sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRatePoint {
    pub tax_rate: f64,
    pub irr: Option<f64>,
    pub cost_method_irr: Option<f64>,
    pub equity_method_irr: Option<f64>,
}

/// Runs many calculations with one solver configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let responses = runner.run_batch(&requests);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    calculator: IrrCalculator,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            calculator: IrrCalculator::new(config),
        }
    }

    pub fn calculator(&self) -> &IrrCalculator {
        &self.calculator
    }

    /// Run every request in parallel, preserving order
    pub fn run_batch(&self, requests: &[CalculationRequest]) -> Vec<CalculationResponse> {
        requests
            .par_iter()
            .map(|request| self.calculator.calculate(request))
            .collect()
    }

    /// Re-run one request across several display tax rates.
    ///
    /// Only the display convention and the investor series react to the tax
    /// rate; the project IRR uses the fixed IRR tax rate.
    pub fn tax_rate_sweep(&self, request: &CalculationRequest, tax_rates: &[f64]) -> Vec<TaxRatePoint> {
        tax_rates
            .par_iter()
            .map(|&tax_rate| {
                let scenario = CalculationRequest { tax_rate, ..request.clone() };
                let response = self.calculator.calculate(&scenario);
                TaxRatePoint {
                    tax_rate,
                    irr: response.irr,
                    cost_method_irr: response.irr_analysis.cost_method_irr,
                    equity_method_irr: response.irr_analysis.equity_method_irr,
                }
            })
            .collect()
    }
}
