//! Per-year projection records

use serde::{Deserialize, Serialize};

/// Fixed tax rate applied under the IRR convention, independent of the
/// request's display tax rate
pub const IRR_TAX_RATE: f64 = 0.20;

/// Normalized category amounts for one year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearInputs {
    pub income: f64,
    pub interest: f64,
    pub rent: f64,
    pub maintenance: f64,
    pub insurance: f64,
    pub recycling: f64,
}

impl YearInputs {
    /// Rent + maintenance + insurance + recycling
    pub fn operating_expenses(&self) -> f64 {
        self.rent + self.maintenance + self.insurance + self.recycling
    }
}

/// One projected year under both tax conventions.
///
/// The display figures are accounting net income (depreciation and interest
/// deducted, request tax rate). The IRR figures are project-level returns
/// before financing: the tax base excludes interest, the tax rate is
/// `IRR_TAX_RATE`, and the cash flow adds back depreciation. The two are
/// expected to disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: i32,
    pub income: f64,
    pub equipment_depreciation: f64,
    pub interest: f64,
    pub rent: f64,
    pub maintenance: f64,
    pub insurance: f64,
    pub recycling: f64,

    // Display convention
    /// Pre-tax net profit
    #[serde(rename = "net_cash_flow")]
    pub pretax_net_profit: f64,
    #[serde(rename = "tax_amount")]
    pub display_tax: f64,
    /// After-tax net profit
    #[serde(rename = "after_tax_cash_flow")]
    pub aftertax_net_profit: f64,

    // IRR convention
    pub irr_tax_base: f64,
    pub irr_tax_amount: f64,
    pub irr_cash_flow: f64,
}

impl YearRecord {
    pub fn compute(year: i32, inputs: YearInputs, depreciation: f64, tax_rate_pct: f64) -> Self {
        let expenses = inputs.operating_expenses();

        let pretax_net_profit = inputs.income - depreciation - inputs.interest - expenses;
        let display_tax = if pretax_net_profit > 0.0 {
            pretax_net_profit * tax_rate_pct / 100.0
        } else {
            0.0
        };

        let irr_tax_base = inputs.income - depreciation - expenses;
        let irr_tax_amount = if irr_tax_base > 0.0 { irr_tax_base * IRR_TAX_RATE } else { 0.0 };

        Self {
            year,
            income: inputs.income,
            equipment_depreciation: depreciation,
            interest: inputs.interest,
            rent: inputs.rent,
            maintenance: inputs.maintenance,
            insurance: inputs.insurance,
            recycling: inputs.recycling,
            pretax_net_profit,
            display_tax,
            aftertax_net_profit: pretax_net_profit - display_tax,
            irr_tax_base,
            irr_tax_amount,
            irr_cash_flow: inputs.income - expenses - irr_tax_amount,
        }
    }
}

/// Output of the year-by-year projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// One record per year, ascending
    pub records: Vec<YearRecord>,

    /// Leading `-equipment_cost` followed by each year's IRR cash flow
    pub cash_flows: Vec<f64>,
}

impl ProjectionResult {
    pub fn horizon(&self) -> usize {
        self.records.len()
    }

    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary {
            years: self.records.len() as u32,
            total_income: self.records.iter().map(|r| r.income).sum(),
            total_interest: self.records.iter().map(|r| r.interest).sum(),
            total_display_tax: self.records.iter().map(|r| r.display_tax).sum(),
            total_aftertax_profit: self.records.iter().map(|r| r.aftertax_net_profit).sum(),
            total_irr_cash_flow: self.records.iter().map(|r| r.irr_cash_flow).sum(),
        }
    }
}

/// Totals across the projection horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub total_income: f64,
    pub total_interest: f64,
    pub total_display_tax: f64,
    pub total_aftertax_profit: f64,
    pub total_irr_cash_flow: f64,
}
