//! Solar IRR - cash-flow projection engine for renewable-energy equipment financing
//!
//! This library provides:
//! - Normalization of per-category revenue/expense inputs into yearly vectors
//! - Straight-line bank loan interest schedules
//! - Equipment cost quotes from capacity, price, margin and development fee
//! - Year-by-year projection under the display and IRR tax conventions
//! - Cash-flow statements with cost-method and equity-method investor returns
//! - IRR solving and parallel batch evaluation

pub mod error;
pub mod inputs;
pub mod equipment;
pub mod financing;
pub mod projection;
pub mod calculator;
pub mod scenario;

// Re-export commonly used types
pub use error::{CalcError, CalcResult};
pub use inputs::{CalculationRequest, CategorySeries, InterestInput, LoanTerms};
pub use equipment::equipment_cost;
pub use financing::interest_schedule;
pub use projection::{solve_irr, IrrAnalysis, SolverConfig, StatementRow, YearRecord};
pub use calculator::{CalculationResponse, IrrCalculator};
pub use scenario::ScenarioRunner;
