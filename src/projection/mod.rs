//! Cash-flow projection: yearly records, statement, and rate of return

mod cashflows;
mod engine;
mod irr;
mod statement;

pub use cashflows::{ProjectionResult, ProjectionSummary, YearInputs, YearRecord, IRR_TAX_RATE};
pub use engine::{project, project_request, CategoryVectors};
pub use irr::{npv_at_rate, solve_irr, solve_irr_with, IrrResult, SolverConfig};
pub use statement::{
    build_statement, CashFlowStatement, FinancingPlan, IrrAnalysis, StatementRow, StatementSummary,
};
